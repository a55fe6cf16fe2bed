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

//! Provides a Quaternion type for representing and blending 3D rotations.

use serde::{Deserialize, Serialize};

use super::{Vec3, EPSILON};
use std::ops::{Add, Mul, Neg};

/// Represents a quaternion used for 3D rotation blending.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the
/// "vector" part and `w` is the "scalar" part. The default value is the
/// all-zero quaternion, which is **not** a valid rotation; callers that feed
/// quaternions into [`slerp`](Quaternion::slerp) or a rotation matrix are
/// expected to supply unit quaternions (as produced by matrix decomposition
/// or [`from_axis_angle`](Quaternion::from_axis_angle)).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating
    /// rotations, prefer `from_axis_angle`.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a quaternion representing a rotation around a given axis by a given angle.
    ///
    /// # Arguments
    ///
    /// * `axis`: The axis of rotation. It is normalized before use.
    /// * `angle_radians`: The angle of rotation in radians.
    #[inline]
    pub fn from_axis_angle(axis: Vec3, angle_radians: f32) -> Self {
        let normalized_axis = axis.normalize();
        let half_angle = angle_radians * 0.5;
        let s = half_angle.sin();
        let c = half_angle.cos();
        Self {
            x: normalized_axis.x * s,
            y: normalized_axis.y * s,
            z: normalized_axis.z * s,
            w: c,
        }
    }

    /// Computes the inverse of the quaternion by negating the vector part.
    ///
    /// This is the conjugate, which equals the inverse only for unit
    /// quaternions; inputs are assumed to be unit quaternions.
    #[inline]
    pub fn inverse(&self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Computes the dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Performs a spherical linear interpolation (slerp) from `self` towards `to`.
    ///
    /// Follows the shortest path on the rotation sphere: when the two
    /// quaternions are more than 90 degrees apart, the `self` operand is
    /// flipped (same rotation, opposite sign) before interpolating.
    ///
    /// Degenerate inputs fall back to returning `self` unchanged:
    /// * `t` outside `[0.0, 1.0]`: no extrapolation and no clamping, the
    ///   call is a passthrough;
    /// * nearly identical (or, after the flip, nearly opposite) quaternions,
    ///   where the interpolation denominator vanishes.
    pub fn slerp(&self, to: Self, t: f32) -> Self {
        if !(0.0..=1.0).contains(&t) {
            return *self;
        }

        let mut from = *self;
        let mut cos_half_angle = from.dot(to);
        if cos_half_angle < 0.0 {
            // More than 90 degrees apart: flip to take the shortest path.
            from = -from;
            cos_half_angle = -cos_half_angle;
        }
        // Floating-point overshoot would take acos out of its domain.
        if cos_half_angle > 1.0 {
            cos_half_angle = 1.0;
        }

        let sin_half_angle = (1.0 - cos_half_angle * cos_half_angle).sqrt();
        if sin_half_angle < EPSILON {
            return *self;
        }

        let half_angle = cos_half_angle.acos();
        let scale_from = ((1.0 - t) * half_angle).sin() / sin_half_angle;
        let scale_to = (t * half_angle).sin() / sin_half_angle;
        from * scale_from + to * scale_to
    }
}

// --- Operator Overloads ---

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a standard rotation operation.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
            w: self.w + rhs.w,
        }
    }
}

impl Mul<Quaternion> for Quaternion {
    type Output = Self;
    /// Combines two rotations using the Hamilton product.
    /// Note that quaternion multiplication is not commutative.
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
            w: self.w * scalar,
        }
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;
    /// Scales all components of a quaternion by a scalar.
    #[inline]
    fn mul(self, rhs: Quaternion) -> Self::Output {
        rhs * self
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all four components (the "flip"), which represents the same
    /// rotation with the opposite sign convention.
    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: -self.w,
        }
    }
}
