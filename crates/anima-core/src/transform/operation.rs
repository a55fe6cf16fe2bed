// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A single primitive transform operation and its blend rules.

use crate::math::{Mat4, Vec3, EPSILON};
use crate::transform::decompose;

/// One primitive step of a transform pipeline.
///
/// Each variant carries the parameters of its operation; the matrix form is
/// computed on demand through [`to_matrix`](TransformOperation::to_matrix).
/// `Undefined` is the neutral placeholder a pipeline substitutes for a
/// missing operation.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum TransformOperation {
    /// No operation; blends as the identity of whatever it is paired with.
    #[default]
    Undefined,
    /// Translation along x, y, z.
    Translate {
        /// Offset along the x axis.
        dx: f32,
        /// Offset along the y axis.
        dy: f32,
        /// Offset along the z axis.
        dz: f32,
    },
    /// Non-uniform scale.
    Scale {
        /// Scale factor along the x axis.
        x: f32,
        /// Scale factor along the y axis.
        y: f32,
        /// Scale factor along the z axis.
        z: f32,
    },
    /// Two-axis shear.
    Skew {
        /// Shear coefficient applied to x by y.
        x: f32,
        /// Shear coefficient applied to y by x.
        y: f32,
    },
    /// Rotation around an arbitrary axis by an angle in radians.
    Rotate {
        /// X component of the rotation axis.
        dx: f32,
        /// Y component of the rotation axis.
        dy: f32,
        /// Z component of the rotation axis.
        dz: f32,
        /// Rotation angle in radians.
        angle: f32,
    },
    /// An arbitrary pre-composed matrix.
    Matrix(Mat4),
    /// Single-point perspective with the given focal distance.
    Perspective {
        /// Focal distance; near zero means no perspective.
        distance: f32,
    },
}

impl TransformOperation {
    /// Returns `true` for the `Undefined` placeholder.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Computes the matrix form of this operation.
    ///
    /// `Undefined` and degenerate parameters (zero rotation axis, near-zero
    /// perspective distance) all produce the identity matrix.
    pub fn to_matrix(&self) -> Mat4 {
        match *self {
            Self::Undefined => Mat4::IDENTITY,
            Self::Translate { dx, dy, dz } => Mat4::from_translation(Vec3::new(dx, dy, dz)),
            Self::Scale { x, y, z } => Mat4::from_scale(Vec3::new(x, y, z)),
            Self::Skew { x, y } => Mat4::from_skew(x, y),
            Self::Rotate { dx, dy, dz, angle } => {
                Mat4::from_axis_angle(Vec3::new(dx, dy, dz), angle)
            }
            Self::Matrix(m) => m,
            Self::Perspective { distance } => Mat4::from_perspective(distance),
        }
    }

    /// Returns the identity-valued operation of the same kind as `self`.
    ///
    /// Used as the substitute endpoint when one side of a blend is
    /// `Undefined`.
    fn identity_variant(&self) -> Self {
        match *self {
            Self::Undefined => Self::Undefined,
            Self::Translate { .. } => Self::Translate {
                dx: 0.0,
                dy: 0.0,
                dz: 0.0,
            },
            Self::Scale { .. } => Self::Scale {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
            Self::Skew { .. } => Self::Skew { x: 0.0, y: 0.0 },
            Self::Rotate { .. } => Self::Rotate {
                dx: 0.0,
                dy: 0.0,
                dz: 0.0,
                angle: 0.0,
            },
            Self::Matrix(_) => Self::Matrix(Mat4::IDENTITY),
            Self::Perspective { .. } => Self::Perspective { distance: 0.0 },
        }
    }

    /// Blends two operations of the same kind at the given progress.
    ///
    /// An `Undefined` endpoint is substituted with the identity of the
    /// other side's kind. Primitive kinds interpolate their parameters
    /// linearly (`to * progress + from * (1 - progress)`); the rotation
    /// axis comes from `to` unless it is the zero vector. Two `Matrix`
    /// operations blend through decomposition; if either matrix does not
    /// decompose, the blend degrades to the default operation after
    /// logging.
    pub fn blend(to: &Self, from: &Self, progress: f32) -> Self {
        if to.is_undefined() && from.is_undefined() {
            return Self::Undefined;
        }
        let to_filled = if to.is_undefined() {
            from.identity_variant()
        } else {
            *to
        };
        let from_filled = if from.is_undefined() {
            to.identity_variant()
        } else {
            *from
        };
        Self::blend_defined(&to_filled, &from_filled, progress)
    }

    fn blend_defined(to: &Self, from: &Self, progress: f32) -> Self {
        let inverse = 1.0 - progress;
        match (*to, *from) {
            (
                Self::Translate { dx, dy, dz },
                Self::Translate {
                    dx: fx,
                    dy: fy,
                    dz: fz,
                },
            ) => Self::Translate {
                dx: dx * progress + fx * inverse,
                dy: dy * progress + fy * inverse,
                dz: dz * progress + fz * inverse,
            },
            (
                Self::Scale { x, y, z },
                Self::Scale {
                    x: fx,
                    y: fy,
                    z: fz,
                },
            ) => Self::Scale {
                x: x * progress + fx * inverse,
                y: y * progress + fy * inverse,
                z: z * progress + fz * inverse,
            },
            (Self::Skew { x, y }, Self::Skew { x: fx, y: fy }) => Self::Skew {
                x: x * progress + fx * inverse,
                y: y * progress + fy * inverse,
            },
            (
                Self::Rotate { dx, dy, dz, angle },
                Self::Rotate {
                    dx: fdx,
                    dy: fdy,
                    dz: fdz,
                    angle: fangle,
                },
            ) => {
                // A zero axis carries no direction; fall back to `from`'s.
                let axis = Vec3::new(dx, dy, dz);
                let axis = if axis.length_squared() > EPSILON * EPSILON {
                    axis
                } else {
                    Vec3::new(fdx, fdy, fdz)
                };
                Self::Rotate {
                    dx: axis.x,
                    dy: axis.y,
                    dz: axis.z,
                    angle: angle * progress + fangle * inverse,
                }
            }
            (Self::Perspective { distance }, Self::Perspective { distance: fdistance }) => {
                Self::Perspective {
                    distance: distance * progress + fdistance * inverse,
                }
            }
            (Self::Matrix(to_matrix), Self::Matrix(from_matrix)) => {
                let mut result = Self::default();
                match (
                    decompose::decompose(&to_matrix),
                    decompose::decompose(&from_matrix),
                ) {
                    (Some(to_decomposed), Some(from_decomposed)) => {
                        let blended =
                            decompose::blend(&to_decomposed, &from_decomposed, progress);
                        result = Self::Matrix(decompose::compose(&blended));
                    }
                    _ => {
                        log::warn!("matrix blend skipped: operand does not decompose");
                    }
                }
                result
            }
            // Mismatched kinds never reach here through a pipeline blend;
            // the sequence layer collapses them to Matrix pairs first.
            _ => Self::Undefined,
        }
    }
}
