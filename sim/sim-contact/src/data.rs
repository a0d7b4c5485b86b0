//! Per-simulation state seen by the contact layer.

use nalgebra::Vector3;
use sim_model::KinematicsProvider;
use sim_types::{
    convert, MechanismState, Result, SimError, Twist, VelocityRepresentation,
};

use crate::SoftContactsParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mechanism state, tangential deformation and contact parameters.
///
/// The base velocity in [`state`](Self::state) is expressed in
/// [`velocity_representation`](Self::velocity_representation). Contact
/// forces returned by [`collidable_point_dynamics`](crate::collidable_point_dynamics)
/// use the same representation.
///
/// The tangential deformation has one slot per collidable point, in the
/// order of the model's point list, for the lifetime of the data. The
/// contact layer only reads it; the caller's integrator advances it.
///
/// # Example
///
/// ```
/// use sim_contact::{ModelData, SoftContactsParams};
/// use sim_model::{LinkDescription, Model, ModelDescription};
/// use sim_types::{Vector3, VelocityRepresentation};
///
/// let mut desc = ModelDescription::new("ball").with_floating_base(true);
/// let ball = desc.add_link(LinkDescription::root("ball", 1.0));
/// desc.add_collidable_point(ball, Vector3::new(0.0, 0.0, -0.1));
/// let model = Model::on_flat_ground(desc).unwrap();
///
/// let data = ModelData::zero(&model, SoftContactsParams::default());
/// assert_eq!(data.tangential_deformation().len(), 1);
/// assert_eq!(data.velocity_representation(), VelocityRepresentation::Mixed);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelData {
    state: MechanismState,
    velocity_representation: VelocityRepresentation,
    tangential_deformation: Vec<Vector3<f64>>,
    soft_contacts_params: SoftContactsParams,
}

impl ModelData {
    /// Assemble data for `model`.
    ///
    /// `state.base_velocity` is read in `representation`. A missing
    /// deformation starts at zero.
    ///
    /// Fails with a shape error if the joint vectors or the deformation do
    /// not match the model, and with invalid parameters if `params` does not
    /// validate or the state is not finite.
    pub fn build<M: KinematicsProvider + ?Sized>(
        model: &M,
        state: MechanismState,
        representation: VelocityRepresentation,
        tangential_deformation: Option<Vec<Vector3<f64>>>,
        params: SoftContactsParams,
    ) -> Result<Self> {
        params.validate()?;
        state.check_dofs(model.dofs())?;
        check_finite(&state)?;

        let points = model.collidable_points().len();
        let tangential_deformation =
            tangential_deformation.unwrap_or_else(|| vec![Vector3::zeros(); points]);
        if tangential_deformation.len() != points {
            return Err(SimError::shape(
                "tangential deformation",
                points,
                tangential_deformation.len(),
            ));
        }

        Ok(Self {
            state,
            velocity_representation: representation,
            tangential_deformation,
            soft_contacts_params: params,
        })
    }

    /// Zero data: identity base, zero joints, at rest, no deformation, mixed
    /// representation.
    #[must_use]
    pub fn zero<M: KinematicsProvider + ?Sized>(model: &M, params: SoftContactsParams) -> Self {
        Self {
            state: MechanismState::zero(model.dofs()),
            velocity_representation: VelocityRepresentation::default(),
            tangential_deformation: vec![Vector3::zeros(); model.collidable_points().len()],
            soft_contacts_params: params,
        }
    }

    /// Mechanism state, base velocity in the active representation.
    #[must_use]
    pub fn state(&self) -> &MechanismState {
        &self.state
    }

    /// Replace the mechanism state. The joint vectors must keep their length.
    pub fn set_state(&mut self, state: MechanismState) -> Result<()> {
        state.check_dofs(self.state.dofs())?;
        check_finite(&state)?;
        self.state = state;
        Ok(())
    }

    /// Representation of the base velocity and of the output forces.
    #[must_use]
    pub fn velocity_representation(&self) -> VelocityRepresentation {
        self.velocity_representation
    }

    /// Same data in another representation, base velocity re-expressed.
    #[must_use]
    pub fn with_velocity_representation(mut self, representation: VelocityRepresentation) -> Self {
        self.set_velocity_representation(representation);
        self
    }

    /// Switch representation, re-expressing the base velocity.
    pub fn set_velocity_representation(&mut self, representation: VelocityRepresentation) {
        let v = convert(
            &self.state.base_velocity.to_vector(),
            self.velocity_representation,
            representation,
            &self.state.base_pose,
            false,
        );
        self.state.base_velocity = Twist::from_vector(&v);
        self.velocity_representation = representation;
    }

    /// Base velocity in the inertial representation.
    #[must_use]
    pub fn inertial_base_velocity(&self) -> Twist {
        let v = convert(
            &self.state.base_velocity.to_vector(),
            self.velocity_representation,
            VelocityRepresentation::Inertial,
            &self.state.base_pose,
            false,
        );
        Twist::from_vector(&v)
    }

    /// Mechanism state with the base velocity in the inertial representation,
    /// as kinematics providers expect it.
    #[must_use]
    pub fn inertial_state(&self) -> MechanismState {
        self.state
            .clone()
            .with_base_velocity(self.inertial_base_velocity())
    }

    /// Tangential deformation, one entry per collidable point.
    #[must_use]
    pub fn tangential_deformation(&self) -> &[Vector3<f64>] {
        &self.tangential_deformation
    }

    /// Replace the tangential deformation. The length must not change.
    pub fn set_tangential_deformation(&mut self, deformation: Vec<Vector3<f64>>) -> Result<()> {
        if deformation.len() != self.tangential_deformation.len() {
            return Err(SimError::shape(
                "tangential deformation",
                self.tangential_deformation.len(),
                deformation.len(),
            ));
        }
        self.tangential_deformation = deformation;
        Ok(())
    }

    /// Reset every deformation slot to zero.
    pub fn reset_tangential_deformation(&mut self) {
        self.tangential_deformation.fill(Vector3::zeros());
    }

    /// Contact parameters.
    #[must_use]
    pub fn soft_contacts_params(&self) -> &SoftContactsParams {
        &self.soft_contacts_params
    }

    /// Replace the contact parameters after validating them.
    pub fn set_soft_contacts_params(&mut self, params: SoftContactsParams) -> Result<()> {
        params.validate()?;
        self.soft_contacts_params = params;
        Ok(())
    }

    /// Check that the data still fits `model`.
    pub(crate) fn check_model<M: KinematicsProvider + ?Sized>(&self, model: &M) -> Result<()> {
        self.state.check_dofs(model.dofs())?;
        let points = model.collidable_points().len();
        if self.tangential_deformation.len() != points {
            return Err(SimError::shape(
                "tangential deformation",
                points,
                self.tangential_deformation.len(),
            ));
        }
        Ok(())
    }
}

fn check_finite(state: &MechanismState) -> Result<()> {
    if state.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid_params(
            "mechanism state contains NaN or infinite values",
        ))
    }
}
