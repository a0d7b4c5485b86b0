//! Velocity representations and the conversions between them.
//!
//! A 6D velocity or force attached to the floating base `B` can be expressed
//! in three conventions:
//!
//! - **Inertial** (`W`): both parts in the world frame, about the world origin.
//! - **Body** (`B`): both parts in the base frame.
//! - **Mixed** (`B[W]`): origin of `B`, orientation of `W`. The linear part of
//!   a mixed velocity is the plain coordinate derivative of the base position.
//!
//! The contact equations are only written once, in the inertial frame. Every
//! other representation is reached through the linear maps below, which are
//! exact inverses of each other.

use nalgebra::{Matrix6, Vector6};

use crate::spatial::{motion_adjoint, motion_adjoint_inverse};
use crate::{Pose, Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Frame convention of 6D velocities and forces at an API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VelocityRepresentation {
    /// World frame, about the world origin.
    Inertial,
    /// Base frame.
    Body,
    /// Base origin, world orientation.
    #[default]
    Mixed,
}

impl VelocityRepresentation {
    /// Frame in which `self` expresses quantities, as a transform `W_H_X`
    /// built from the base transform `W_H_B`.
    fn frame(self, base: &Pose) -> Pose {
        match self {
            Self::Inertial => Pose::identity(),
            Self::Body => *base,
            Self::Mixed => base.translation_only(),
        }
    }

    /// Matrix mapping a vector in this representation to the inertial one.
    #[must_use]
    pub fn matrix_to_inertial(self, base: &Pose, is_force: bool) -> Matrix6<f64> {
        let w_h_x = self.frame(base);
        if is_force {
            // W_Xf_X = (X_X_W)ᵀ
            motion_adjoint_inverse(&w_h_x).transpose()
        } else {
            motion_adjoint(&w_h_x)
        }
    }

    /// Matrix mapping an inertial vector to this representation.
    #[must_use]
    pub fn matrix_from_inertial(self, base: &Pose, is_force: bool) -> Matrix6<f64> {
        let w_h_x = self.frame(base);
        if is_force {
            // X_Xf_W = (W_X_X)ᵀ
            motion_adjoint(&w_h_x).transpose()
        } else {
            motion_adjoint_inverse(&w_h_x)
        }
    }
}

/// Express an inertial 6D vector in another representation.
#[must_use]
pub fn inertial_to_other(
    vector: &Vector6<f64>,
    other: VelocityRepresentation,
    base: &Pose,
    is_force: bool,
) -> Vector6<f64> {
    match other {
        VelocityRepresentation::Inertial => *vector,
        _ => other.matrix_from_inertial(base, is_force) * vector,
    }
}

/// Express a 6D vector given in `other` in the inertial representation.
#[must_use]
pub fn other_to_inertial(
    vector: &Vector6<f64>,
    other: VelocityRepresentation,
    base: &Pose,
    is_force: bool,
) -> Vector6<f64> {
    match other {
        VelocityRepresentation::Inertial => *vector,
        _ => other.matrix_to_inertial(base, is_force) * vector,
    }
}

/// Convert a 6D velocity (or force, when `is_force`) between representations.
///
/// `base` is the base transform `W_H_B`. Converting to the same
/// representation returns the input unchanged.
///
/// # Example
///
/// ```
/// use sim_types::{convert, Pose, VelocityRepresentation};
/// use nalgebra::{Point3, Vector6};
///
/// let base = Pose::from_position(Point3::new(0.0, 1.0, 0.0));
/// let mixed = Vector6::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0);
///
/// let inertial = convert(
///     &mixed,
///     VelocityRepresentation::Mixed,
///     VelocityRepresentation::Inertial,
///     &base,
///     false,
/// );
/// // Spinning about +z at (0, 1, 0): the world origin sees v = p × ω.
/// assert!((inertial[0] - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn convert(
    vector: &Vector6<f64>,
    from: VelocityRepresentation,
    to: VelocityRepresentation,
    base: &Pose,
    is_force: bool,
) -> Vector6<f64> {
    if from == to {
        return *vector;
    }
    let inertial = other_to_inertial(vector, from, base, is_force);
    inertial_to_other(&inertial, to, base, is_force)
}

/// Like [`convert`], for a vector arriving as a plain slice.
///
/// Fails with [`SimError::Shape`] unless the slice has exactly six entries.
pub fn convert_slice(
    vector: &[f64],
    from: VelocityRepresentation,
    to: VelocityRepresentation,
    base: &Pose,
    is_force: bool,
) -> Result<Vector6<f64>> {
    if vector.len() != 6 {
        return Err(SimError::shape("6D spatial vector", 6, vector.len()));
    }
    let v = Vector6::from_column_slice(vector);
    Ok(convert(&v, from, to, base, is_force))
}
