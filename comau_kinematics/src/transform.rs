//! Homogeneous rigid-body transforms.
//!
//! [`RigidTransform`] is a 4x4 matrix whose bottom row is always `[0, 0, 0, 1]`
//! and whose upper-left 3x3 block is a proper rotation. The only way to build
//! one is through the constructors below (identity, elementary rotations and
//! translations, DH joint transforms) and composition of those, so a malformed
//! transform cannot be created from outside this module.

use std::fmt;
use std::ops::Mul;

use nalgebra::{Matrix3, Matrix4, Vector3};
use serde::Serialize;

/// Rigid-body transform stored as a 4x4 homogeneous matrix.
///
/// Serializes as a row-major `[[f64; 4]; 4]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[[f64; 4]; 4]")]
pub struct RigidTransform {
    matrix: Matrix4<f64>,
}

impl RigidTransform {
    /// The neutral element; represents the base frame.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Rotation about the local z-axis by `theta` radians.
    pub fn rot_z(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            matrix: Matrix4::new(
                c, -s, 0.0, 0.0, //
                s, c, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Rotation about the local x-axis by `alpha` radians.
    pub fn rot_x(alpha: f64) -> Self {
        let (s, c) = alpha.sin_cos();
        Self {
            matrix: Matrix4::new(
                1.0, 0.0, 0.0, 0.0, //
                0.0, c, -s, 0.0, //
                0.0, s, c, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Translation along the local z-axis.
    pub fn trans_z(d: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(2, 3)] = d;
        Self { matrix }
    }

    /// Translation along the local x-axis.
    pub fn trans_x(a: f64) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(0, 3)] = a;
        Self { matrix }
    }

    /// Standard (Craig) DH joint transform: `Rz(theta) * Tz(d) * Tx(a) * Rx(alpha)`.
    ///
    /// Written out in closed form; equal to the product of the four elementary
    /// transforms in that order.
    ///
    /// # Arguments
    /// * `theta` - Effective joint angle (variable + offset), radians
    /// * `d` - Link offset along the previous z-axis
    /// * `a` - Link length along the common normal
    /// * `alpha` - Link twist about the common normal, radians
    pub fn standard_dh(theta: f64, d: f64, a: f64, alpha: f64) -> Self {
        let (st, ct) = theta.sin_cos();
        let (sa, ca) = alpha.sin_cos();

        Self {
            matrix: Matrix4::new(
                ct, -st * ca, st * sa, a * ct, //
                st, ct * ca, -ct * sa, a * st, //
                0.0, sa, ca, d, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Modified (Khalil) DH joint transform: `Rx(alpha) * Tx(a) * Rz(theta) * Tz(d)`.
    ///
    /// `alpha` and `a` describe the link *before* this joint.
    pub fn modified_dh(theta: f64, d: f64, a: f64, alpha: f64) -> Self {
        let (st, ct) = theta.sin_cos();
        let (sa, ca) = alpha.sin_cos();

        Self {
            matrix: Matrix4::new(
                ct, -st, 0.0, a, //
                st * ca, ct * ca, -sa, -d * sa, //
                st * sa, ct * sa, ca, d * ca, //
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Matrix product `self * other`: apply `other` in the frame of `self`.
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        RigidTransform {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Position of this frame's origin.
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(
            self.matrix[(0, 3)],
            self.matrix[(1, 3)],
            self.matrix[(2, 3)],
        )
    }

    /// Orientation block.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The full homogeneous matrix.
    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Row-major copy of the matrix, final row `[0, 0, 0, 1]`.
    pub fn to_rows(&self) -> [[f64; 4]; 4] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)], m[(0, 3)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)], m[(1, 3)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)], m[(2, 3)]],
            [m[(3, 0)], m[(3, 1)], m[(3, 2)], m[(3, 3)]],
        ]
    }

    /// Map a point expressed in this frame into the parent frame.
    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation() * point + self.translation()
    }

    /// Cardan angles `[w, p, r]` in radians with `R = Rz(r) * Ry(p) * Rx(w)`.
    ///
    /// Near gimbal lock (`cos p ~ 0`) `w` and `r` are reported as zero.
    pub fn wpr(&self) -> [f64; 3] {
        let m = &self.matrix;
        let p = (-m[(2, 0)]).clamp(-1.0, 1.0).asin();
        let cp = p.cos();

        if cp.abs() > 1e-6 {
            let w = (m[(2, 1)] / cp).atan2(m[(2, 2)] / cp);
            let r = (m[(1, 0)] / cp).atan2(m[(0, 0)] / cp);
            [w, p, r]
        } else {
            [0.0, p, 0.0]
        }
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        self.compose(&rhs)
    }
}

impl Mul<&RigidTransform> for &RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: &RigidTransform) -> RigidTransform {
        self.compose(rhs)
    }
}

impl From<RigidTransform> for [[f64; 4]; 4] {
    fn from(transform: RigidTransform) -> Self {
        transform.to_rows()
    }
}

impl fmt::Display for RigidTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            writeln!(
                f,
                "[{:9.5} {:9.5} {:9.5} {:9.5}]",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}
