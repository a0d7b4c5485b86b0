//! 6D adjoint transforms for spatial velocities and forces.
//!
//! All 6D vectors use `[linear; angular]` ordering. For a transform
//! `A_H_B = (R, p)`:
//!
//! ```text
//! A_X_B  = | R   [p]× R |      velocities:  A_v = A_X_B · B_v
//!          | 0   R      |
//!
//! A_Xf_B = (B_X_A)ᵀ            forces:      A_f = A_Xf_B · B_f
//! ```

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use crate::Pose;

/// Skew-symmetric matrix `[v]×` such that `[v]× w = v × w`.
#[must_use]
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Velocity adjoint `A_X_B` of the transform `A_H_B`.
#[must_use]
pub fn motion_adjoint(a_h_b: &Pose) -> Matrix6<f64> {
    let r = a_h_b.rotation.to_rotation_matrix().into_inner();
    let p = a_h_b.position.coords;

    let mut x = Matrix6::zeros();
    x.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
    x.fixed_view_mut::<3, 3>(0, 3).copy_from(&(skew(&p) * r));
    x.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
    x
}

/// Velocity adjoint `B_X_A` of the inverse of `A_H_B`.
///
/// Computed in closed form rather than by inverting the 6x6 matrix.
#[must_use]
pub fn motion_adjoint_inverse(a_h_b: &Pose) -> Matrix6<f64> {
    let rt = a_h_b.rotation.to_rotation_matrix().into_inner().transpose();
    let p = a_h_b.position.coords;

    let mut x = Matrix6::zeros();
    x.fixed_view_mut::<3, 3>(0, 0).copy_from(&rt);
    x.fixed_view_mut::<3, 3>(0, 3).copy_from(&(-rt * skew(&p)));
    x.fixed_view_mut::<3, 3>(3, 3).copy_from(&rt);
    x
}

/// Force adjoint `A_Xf_B` of the transform `A_H_B`.
#[must_use]
pub fn force_adjoint(a_h_b: &Pose) -> Matrix6<f64> {
    motion_adjoint_inverse(a_h_b).transpose()
}

/// Force adjoint `B_Xf_A` of the inverse of `A_H_B`.
#[must_use]
pub fn force_adjoint_inverse(a_h_b: &Pose) -> Matrix6<f64> {
    motion_adjoint(a_h_b).transpose()
}

/// Stack linear and angular parts into a `[linear; angular]` 6D vector.
#[must_use]
pub fn stack(linear: &Vector3<f64>, angular: &Vector3<f64>) -> Vector6<f64> {
    let mut v = Vector6::zeros();
    v.fixed_rows_mut::<3>(0).copy_from(linear);
    v.fixed_rows_mut::<3>(3).copy_from(angular);
    v
}

/// Split a `[linear; angular]` 6D vector.
#[must_use]
pub fn split(v: &Vector6<f64>) -> (Vector3<f64>, Vector3<f64>) {
    (
        v.fixed_rows::<3>(0).into_owned(),
        v.fixed_rows::<3>(3).into_owned(),
    )
}

/// Inertial 6D force of a pure linear force applied at `point`.
///
/// This is the `C[W] → W` force transform of the mixed force `[f; 0]`
/// anchored at the point, giving `[f; p × f]`.
#[must_use]
pub fn inertial_force_at_point(point: &Vector3<f64>, force: &Vector3<f64>) -> Vector6<f64> {
    stack(force, &point.cross(force))
}
