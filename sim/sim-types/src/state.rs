//! Instantaneous mechanism configuration.

use nalgebra::DVector;

use crate::{Pose, Result, SimError, Twist};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pose and velocity of an articulated mechanism at one instant.
///
/// The frame of `base_velocity` is not stored here: whoever holds a
/// `MechanismState` also holds the
/// [`VelocityRepresentation`](crate::VelocityRepresentation) it is expressed
/// in. Kinematics providers always receive it in the inertial representation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MechanismState {
    /// Base transform `W_H_B`.
    pub base_pose: Pose,
    /// Base 6D velocity.
    pub base_velocity: Twist,
    /// Joint positions, one per degree of freedom.
    pub joint_positions: DVector<f64>,
    /// Joint velocities, one per degree of freedom.
    pub joint_velocities: DVector<f64>,
}

impl MechanismState {
    /// Zero configuration: identity base, zero joints, at rest.
    #[must_use]
    pub fn zero(dofs: usize) -> Self {
        Self {
            base_pose: Pose::identity(),
            base_velocity: Twist::zero(),
            joint_positions: DVector::zeros(dofs),
            joint_velocities: DVector::zeros(dofs),
        }
    }

    /// Number of joint degrees of freedom.
    #[must_use]
    pub fn dofs(&self) -> usize {
        self.joint_positions.len()
    }

    /// Set the base pose.
    #[must_use]
    pub fn with_base_pose(mut self, pose: Pose) -> Self {
        self.base_pose = pose;
        self
    }

    /// Set the base velocity.
    #[must_use]
    pub fn with_base_velocity(mut self, velocity: Twist) -> Self {
        self.base_velocity = velocity;
        self
    }

    /// Check that both joint vectors have `dofs` entries.
    pub fn check_dofs(&self, dofs: usize) -> Result<()> {
        if self.joint_positions.len() != dofs {
            return Err(SimError::shape(
                "joint positions",
                dofs,
                self.joint_positions.len(),
            ));
        }
        if self.joint_velocities.len() != dofs {
            return Err(SimError::shape(
                "joint velocities",
                dofs,
                self.joint_velocities.len(),
            ));
        }
        Ok(())
    }

    /// Check if the state contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.base_pose.is_finite()
            && self.base_velocity.is_finite()
            && self.joint_positions.iter().all(|x| x.is_finite())
            && self.joint_velocities.iter().all(|x| x.is_finite())
    }
}
