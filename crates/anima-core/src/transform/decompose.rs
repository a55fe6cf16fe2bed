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

//! Decomposes 4x4 transform matrices into independent geometric channels,
//! blends decompositions by a progress fraction, and recomposes matrices.
//!
//! The decomposition follows the standard unmatrix algorithm: normalize by
//! the homogeneous scale, solve for the perspective row, read the
//! translation column, then run a column-wise Gram-Schmidt pass over the
//! upper-left 3x3 to separate scale and shear from a pure rotation, which
//! is finally converted to a quaternion.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::math::{approx_eq, Mat4, Quaternion, Vec3};

/// One 4x4 matrix split into independent geometric channels.
///
/// Produced by [`decompose`]; the channels recombine through [`compose`]
/// into a matrix equal (within floating-point tolerance) to the one that
/// was decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTransform {
    /// Translation along x, y, z.
    pub translate: [f32; 3],
    /// Scale factors along x, y, z. Signs carry reflection information.
    pub scale: [f32; 3],
    /// Shear coefficients: xy, xz, yz.
    pub skew: [f32; 3],
    /// The bottom row of the normalized homogeneous matrix.
    pub perspective: [f32; 4],
    /// The rotation component as a unit quaternion.
    pub quaternion: Quaternion,
}

impl Default for DecomposedTransform {
    /// Returns the decomposition of the identity matrix.
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            scale: [1.0; 3],
            skew: [0.0; 3],
            perspective: [0.0, 0.0, 0.0, 1.0],
            quaternion: Quaternion::IDENTITY,
        }
    }
}

impl fmt::Display for DecomposedTransform {
    /// Human-readable dump of all channels, for logging and debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate: ({}, {}, {}), scale: ({}, {}, {}), skew: ({}, {}, {}), \
             perspective: ({}, {}, {}, {}), quaternion: ({}, {}, {}, {})",
            self.translate[0],
            self.translate[1],
            self.translate[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.skew[0],
            self.skew[1],
            self.skew[2],
            self.perspective[0],
            self.perspective[1],
            self.perspective[2],
            self.perspective[3],
            self.quaternion.x,
            self.quaternion.y,
            self.quaternion.z,
            self.quaternion.w,
        )
    }
}

/// Decomposes a 4x4 matrix into translation, scale, skew, perspective, and
/// rotation channels.
///
/// Returns `None` when the matrix cannot be decomposed: the homogeneous
/// scale element `(3, 3)` is near zero, or the matrix left after stripping
/// the perspective row is singular.
pub fn decompose(matrix: &Mat4) -> Option<DecomposedTransform> {
    let homogeneous_scale = matrix.get(3, 3);
    if approx_eq(homogeneous_scale, 0.0) {
        return None;
    }

    // Normalize so that (3, 3) becomes 1.
    let mut m = *matrix;
    let inv_scale = 1.0 / homogeneous_scale;
    for col in m.cols.iter_mut() {
        *col = *col * inv_scale;
    }

    // The perspective-stripped matrix doubles as the singularity probe for
    // the affine part.
    let mut perspective_matrix = m;
    for i in 0..3 {
        perspective_matrix.set(3, i, 0.0);
    }
    perspective_matrix.set(3, 3, 1.0);
    if approx_eq(perspective_matrix.determinant(), 0.0) {
        return None;
    }

    let mut out = DecomposedTransform::default();

    // Isolate the perspective row by solving against the stripped matrix.
    if m.get(3, 0) != 0.0 || m.get(3, 1) != 0.0 || m.get(3, 2) != 0.0 {
        let rhs = m.get_row(3);
        let inverse_transpose = perspective_matrix.inverse()?.transpose();
        let solved = inverse_transpose * rhs;
        out.perspective = [solved.x, solved.y, solved.z, solved.w];
    } else {
        out.perspective = [0.0, 0.0, 0.0, 1.0];
    }

    // Translation is the last column.
    out.translate = [m.cols[3].x, m.cols[3].y, m.cols[3].z];

    // Gram-Schmidt over the upper-left 3x3 columns: peel off scale and
    // shear, leaving an orthonormal rotation basis.
    let mut column = [
        m.cols[0].truncate(),
        m.cols[1].truncate(),
        m.cols[2].truncate(),
    ];

    out.scale[0] = column[0].length();
    if out.scale[0] != 0.0 {
        column[0] = column[0] / out.scale[0];
    }
    out.skew[0] = column[0].dot(column[1]);
    column[1] = column[1] - column[0] * out.skew[0];
    out.scale[1] = column[1].length();
    if out.scale[1] != 0.0 {
        column[1] = column[1] / out.scale[1];
    }
    out.skew[0] /= out.scale[1];

    out.skew[1] = column[0].dot(column[2]);
    column[2] = column[2] - column[0] * out.skew[1];
    out.skew[2] = column[1].dot(column[2]);
    column[2] = column[2] - column[1] * out.skew[2];
    out.scale[2] = column[2].length();
    if out.scale[2] != 0.0 {
        column[2] = column[2] / out.scale[2];
    }
    out.skew[1] /= out.scale[2];
    out.skew[2] /= out.scale[2];

    // A negative triple product means the basis encodes a reflection.
    // All three scales and all nine basis entries are negated, matching the
    // reference unmatrix behavior.
    let pdum = column[1].cross(column[2]);
    if column[0].dot(pdum) < 0.0 {
        for i in 0..3 {
            out.scale[i] = -out.scale[i];
            column[i] = -column[i];
        }
    }

    // Convert the orthonormal basis to a quaternion, branching on the
    // largest diagonal contribution for numerical stability.
    let q_xx = column[0].x;
    let q_xy = column[1].x;
    let q_xz = column[2].x;
    let q_yx = column[0].y;
    let q_yy = column[1].y;
    let q_yz = column[2].y;
    let q_zx = column[0].z;
    let q_zy = column[1].z;
    let q_zz = column[2].z;

    let trace = q_xx + q_yy + q_zz;
    out.quaternion = if trace > 0.0 {
        let r = (1.0 + trace).sqrt();
        let s = 0.5 / r;
        Quaternion::new(
            (q_zy - q_yz) * s,
            (q_xz - q_zx) * s,
            (q_yx - q_xy) * s,
            0.5 * r,
        )
    } else if q_xx > q_yy && q_xx > q_zz {
        let r = (1.0 + q_xx - q_yy - q_zz).sqrt();
        let s = 0.5 / r;
        Quaternion::new(
            0.5 * r,
            (q_xy + q_yx) * s,
            (q_xz + q_zx) * s,
            (q_zy - q_yz) * s,
        )
    } else if q_yy > q_zz {
        let r = (1.0 - q_xx + q_yy - q_zz).sqrt();
        let s = 0.5 / r;
        Quaternion::new(
            (q_xy + q_yx) * s,
            0.5 * r,
            (q_yz + q_zy) * s,
            (q_xz - q_zx) * s,
        )
    } else {
        let r = (1.0 - q_xx - q_yy + q_zz).sqrt();
        let s = 0.5 / r;
        Quaternion::new(
            (q_xz + q_zx) * s,
            (q_yz + q_zy) * s,
            0.5 * r,
            (q_yx - q_xy) * s,
        )
    };

    Some(out)
}

/// Blends two decompositions at the given progress fraction.
///
/// The translation, scale, skew, and perspective channels interpolate
/// linearly as `to * progress + from * (1 - progress)` and extrapolate
/// freely outside `[0, 1]`. The rotation channel uses
/// [`Quaternion::slerp`], whose out-of-range passthrough leaves it frozen
/// at `from` while the linear channels keep extrapolating.
pub fn blend(
    to: &DecomposedTransform,
    from: &DecomposedTransform,
    progress: f32,
) -> DecomposedTransform {
    let mut out = DecomposedTransform::default();
    for i in 0..3 {
        out.translate[i] = to.translate[i] * progress + from.translate[i] * (1.0 - progress);
        out.scale[i] = to.scale[i] * progress + from.scale[i] * (1.0 - progress);
        out.skew[i] = to.skew[i] * progress + from.skew[i] * (1.0 - progress);
    }
    for i in 0..4 {
        out.perspective[i] = to.perspective[i] * progress + from.perspective[i] * (1.0 - progress);
    }
    out.quaternion = from.quaternion.slerp(to.quaternion, progress);
    out
}

/// Recombines a decomposition into a 4x4 matrix.
///
/// The channels multiply back in the fixed order
/// `perspective * translation * rotation * skew * scale`, the reverse of
/// the order [`decompose`] peeled them off.
pub fn compose(decomposed: &DecomposedTransform) -> Mat4 {
    let mut perspective = Mat4::IDENTITY;
    for (i, value) in decomposed.perspective.iter().enumerate() {
        perspective.set(3, i, *value);
    }

    let [tx, ty, tz] = decomposed.translate;
    let translation = if approx_eq(tx, 0.0) && approx_eq(ty, 0.0) && approx_eq(tz, 0.0) {
        Mat4::IDENTITY
    } else {
        Mat4::from_translation(Vec3::new(tx, ty, tz))
    };

    let rotation = Mat4::from_quat(decomposed.quaternion);

    // Shears recombine in the reverse of extraction order: yz, then xz,
    // then xy.
    let mut skew = Mat4::IDENTITY;
    if decomposed.skew[2] != 0.0 {
        let mut shear = Mat4::IDENTITY;
        shear.set(1, 2, decomposed.skew[2]);
        skew = skew * shear;
    }
    if decomposed.skew[1] != 0.0 {
        let mut shear = Mat4::IDENTITY;
        shear.set(0, 2, decomposed.skew[1]);
        skew = skew * shear;
    }
    if decomposed.skew[0] != 0.0 {
        let mut shear = Mat4::IDENTITY;
        shear.set(0, 1, decomposed.skew[0]);
        skew = skew * shear;
    }

    let scale = Mat4::from_scale(Vec3::new(
        decomposed.scale[0],
        decomposed.scale[1],
        decomposed.scale[2],
    ));

    Mat4::IDENTITY * perspective * translation * rotation * skew * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Vec4, EPSILON, FRAC_PI_2, PI};
    use approx::assert_relative_eq;

    fn assert_mat4_eq(a: &Mat4, b: &Mat4, epsilon: f32) {
        for col in 0..4 {
            for row in 0..4 {
                assert_relative_eq!(a.get(row, col), b.get(row, col), epsilon = epsilon);
            }
        }
    }

    fn assert_round_trips(m: &Mat4) {
        let decomposed = decompose(m).expect("matrix should decompose");
        let recomposed = compose(&decomposed);
        assert_mat4_eq(m, &recomposed, 1e-4);
    }

    #[test]
    fn identity_decomposes_to_defaults() {
        let d = decompose(&Mat4::IDENTITY).expect("identity should decompose");
        assert_eq!(d.translate, [0.0, 0.0, 0.0]);
        assert_eq!(d.scale, [1.0, 1.0, 1.0]);
        assert_eq!(d.skew, [0.0, 0.0, 0.0]);
        assert_eq!(d.perspective, [0.0, 0.0, 0.0, 1.0]);
        assert_relative_eq!(d.quaternion.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.quaternion.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.quaternion.z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.quaternion.w, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn translate_rotate_scale_round_trips() {
        let m = Mat4::from_translation(Vec3::new(10.0, -4.0, 2.5))
            * Mat4::from_axis_angle(Vec3::new(1.0, 2.0, -1.0), 0.7)
            * Mat4::from_scale(Vec3::new(2.0, 0.5, 3.0));
        assert_round_trips(&m);
    }

    #[test]
    fn skewed_matrix_round_trips() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_axis_angle(Vec3::Z, 0.4)
            * Mat4::from_skew(0.5, 0.0)
            * Mat4::from_scale(Vec3::new(1.5, 1.0, 1.0));
        assert_round_trips(&m);

        // A lower-triangular shear is outside the decomposition's shear
        // basis but still decomposable (it reappears as rotation + scale).
        let lower = Mat4::from_skew(0.0, 0.75);
        assert_round_trips(&lower);
    }

    #[test]
    fn pure_skew_extracts_xy_shear() {
        let m = Mat4::from_skew(0.5, 0.0);
        let d = decompose(&m).expect("shear should decompose");
        assert_relative_eq!(d.skew[0], 0.5, epsilon = 1e-5);
        assert_relative_eq!(d.scale[0], 1.0, epsilon = 1e-5);
        assert_relative_eq!(d.scale[1], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_matrix_round_trips() {
        // Translation applied after the perspective keeps the homogeneous
        // scale element at 1, so the comparison is element-wise exact.
        let m = Mat4::from_translation(Vec3::new(0.5, 1.0, -2.0))
            * Mat4::from_perspective(10.0)
            * Mat4::from_axis_angle(Vec3::Y, 0.3);
        let d = decompose(&m).expect("perspective matrix should decompose");
        assert!(d.perspective != [0.0, 0.0, 0.0, 1.0]);
        assert_mat4_eq(&m, &compose(&d), 1e-4);
    }

    #[test]
    fn pure_perspective_populates_perspective_channel() {
        let m = Mat4::from_perspective(5.0);
        let d = decompose(&m).expect("perspective should decompose");
        assert_relative_eq!(d.perspective[2], -0.2, epsilon = EPSILON);
        assert_relative_eq!(d.perspective[3], 1.0, epsilon = EPSILON);
        assert_eq!(d.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_homogeneous_scale_fails() {
        let mut m = Mat4::IDENTITY;
        m.set(3, 3, 0.0);
        assert!(decompose(&m).is_none());
    }

    #[test]
    fn zero_linear_part_fails() {
        let mut m = Mat4::IDENTITY;
        for row in 0..3 {
            for col in 0..3 {
                m.set(row, col, 0.0);
            }
        }
        assert!(decompose(&m).is_none());
    }

    #[test]
    fn mirror_x_decomposition_flips_all_axes() {
        // A single-axis mirror trips the reflection branch, which negates
        // every scale axis and re-expresses the flip as a 180-degree
        // rotation about X. Pinned: downstream consumers rely on this exact
        // sign behavior.
        let m = Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0));
        let d = decompose(&m).expect("mirror should decompose");
        assert_eq!(d.scale, [-1.0, -1.0, -1.0]);
        assert_relative_eq!(d.quaternion.x.abs(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(d.quaternion.y, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.quaternion.z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(d.quaternion.w, 0.0, epsilon = EPSILON);

        assert_mat4_eq(&m, &compose(&d), 1e-4);
    }

    #[test]
    fn blend_at_zero_returns_from_channels() {
        let to = decompose(
            &(Mat4::from_translation(Vec3::new(8.0, 0.0, 0.0))
                * Mat4::from_axis_angle(Vec3::Z, FRAC_PI_2)),
        )
        .unwrap();
        let from = decompose(
            &(Mat4::from_translation(Vec3::new(2.0, 4.0, 0.0))
                * Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0))),
        )
        .unwrap();

        let blended = blend(&to, &from, 0.0);
        assert_eq!(blended.translate, from.translate);
        assert_eq!(blended.scale, from.scale);
        assert_eq!(blended.skew, from.skew);
        assert_eq!(blended.perspective, from.perspective);
        assert_relative_eq!(
            blended.quaternion.dot(from.quaternion).abs(),
            1.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn blend_at_one_returns_to_channels() {
        let to = decompose(
            &(Mat4::from_translation(Vec3::new(8.0, 0.0, 0.0))
                * Mat4::from_axis_angle(Vec3::Z, FRAC_PI_2)),
        )
        .unwrap();
        let from = decompose(&Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0))).unwrap();

        let blended = blend(&to, &from, 1.0);
        assert_eq!(blended.translate, to.translate);
        assert_eq!(blended.scale, to.scale);
        assert_eq!(blended.skew, to.skew);
        assert_eq!(blended.perspective, to.perspective);
        assert_relative_eq!(blended.quaternion.dot(to.quaternion).abs(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn blend_midpoint_of_rotations() {
        let from = decompose(&Mat4::IDENTITY).unwrap();
        let to = decompose(&Mat4::from_axis_angle(Vec3::Z, FRAC_PI_2)).unwrap();

        let mid = blend(&to, &from, 0.5);
        let expected = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2 * 0.5);
        assert_relative_eq!(mid.quaternion.dot(expected).abs(), 1.0, epsilon = 1e-4);

        // The midpoint matrix is the 45-degree rotation.
        let expected_matrix = Mat4::from_axis_angle(Vec3::Z, FRAC_PI_2 * 0.5);
        assert_mat4_eq(&compose(&mid), &expected_matrix, 1e-4);
    }

    #[test]
    fn blend_extrapolation_freezes_rotation() {
        let from = decompose(&Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))).unwrap();
        let to = decompose(
            &(Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0))
                * Mat4::from_axis_angle(Vec3::Z, 0.5)),
        )
        .unwrap();

        let blended = blend(&to, &from, 2.0);
        // Linear channels extrapolate past the endpoint...
        assert_relative_eq!(blended.translate[0], 5.0, epsilon = EPSILON);
        // ...while the rotation channel passes through `from` untouched.
        assert_eq!(blended.quaternion, from.quaternion);
    }

    #[test]
    fn compose_of_default_is_identity() {
        let m = compose(&DecomposedTransform::default());
        assert_mat4_eq(&m, &Mat4::IDENTITY, EPSILON);
    }

    #[test]
    fn compose_applies_channels_in_fixed_order() {
        let decomposed = DecomposedTransform {
            translate: [4.0, 0.0, 0.0],
            scale: [2.0, 1.0, 1.0],
            ..DecomposedTransform::default()
        };
        let m = compose(&decomposed);
        // Scale applies before translation: (1, 0, 0) -> (2, 0, 0) -> (6, 0, 0).
        let p = m * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 6.0, epsilon = EPSILON);
    }

    #[test]
    fn rotation_only_round_trips_exactly_through_quaternion() {
        let angle = PI / 3.0;
        let axis = Vec3::new(0.3, -1.0, 0.8);
        let m = Mat4::from_axis_angle(axis, angle);
        let d = decompose(&m).expect("rotation should decompose");

        let expected = Quaternion::from_axis_angle(axis, angle);
        assert_relative_eq!(d.quaternion.dot(expected).abs(), 1.0, epsilon = 1e-4);
        assert_round_trips(&m);
    }

    #[test]
    fn display_dumps_all_channels() {
        let d = DecomposedTransform::default();
        let dump = d.to_string();
        assert!(dump.contains("translate: (0, 0, 0)"));
        assert!(dump.contains("scale: (1, 1, 1)"));
        assert!(dump.contains("perspective: (0, 0, 0, 1)"));
        assert!(dump.contains("quaternion: (0, 0, 0, 1)"));
    }
}
