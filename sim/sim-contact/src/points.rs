//! Collidable point kinematics and dynamics.

use nalgebra::{Point3, Vector3, Vector6};
use sim_model::{KinematicsProvider, LinkKinematics, MechanismModel};
use sim_types::{convert, Result, SimError, VelocityRepresentation};

use crate::batch::point_kinematics;
use crate::{ContactSample, ModelData, SoftContacts};

/// Link kinematics for `data`, checked against the model's point list.
fn link_kinematics<M: KinematicsProvider + ?Sized>(
    model: &M,
    data: &ModelData,
) -> Result<Vec<LinkKinematics>> {
    data.check_model(model)?;

    let links = model.link_kinematics(&data.inertial_state())?;
    if links.len() != model.number_of_links() {
        return Err(SimError::shape(
            "link kinematics",
            model.number_of_links(),
            links.len(),
        ));
    }
    if let Some(point) = model
        .collidable_points()
        .iter()
        .find(|p| p.link.index() >= links.len())
    {
        return Err(SimError::invalid_model(format!(
            "collidable point attached to missing {}",
            point.link
        )));
    }
    Ok(links)
}

/// World positions and velocities of all collidable points.
///
/// Both are inertial, whatever the data's velocity representation: the
/// velocity is the time derivative of the position. A model without
/// collidable points yields empty vectors.
///
/// # Example
///
/// ```
/// use sim_contact::{collidable_point_kinematics, ModelData, SoftContactsParams};
/// use sim_model::{LinkDescription, Model, ModelDescription};
/// use sim_types::{MechanismState, Twist, Vector3, VelocityRepresentation};
///
/// let mut desc = ModelDescription::new("ball").with_floating_base(true);
/// let ball = desc.add_link(LinkDescription::root("ball", 1.0));
/// desc.add_collidable_point(ball, Vector3::new(0.0, 0.0, -0.1));
/// let model = Model::on_flat_ground(desc).unwrap();
///
/// let state = MechanismState::zero(0).with_base_velocity(Twist::linear(Vector3::x()));
/// let data = ModelData::build(
///     &model,
///     state,
///     VelocityRepresentation::Mixed,
///     None,
///     SoftContactsParams::default(),
/// )
/// .unwrap();
///
/// let (positions, velocities) = collidable_point_kinematics(&model, &data).unwrap();
/// assert_eq!(positions[0].z, -0.1);
/// assert_eq!(velocities[0], Vector3::x());
/// ```
pub fn collidable_point_kinematics<M: KinematicsProvider + ?Sized>(
    model: &M,
    data: &ModelData,
) -> Result<(Vec<Point3<f64>>, Vec<Vector3<f64>>)> {
    let links = link_kinematics(model, data)?;
    Ok(point_kinematics(model.collidable_points(), &links))
}

/// World positions of all collidable points.
pub fn collidable_point_positions<M: KinematicsProvider + ?Sized>(
    model: &M,
    data: &ModelData,
) -> Result<Vec<Point3<f64>>> {
    collidable_point_kinematics(model, data).map(|(positions, _)| positions)
}

/// World velocities of all collidable points.
pub fn collidable_point_velocities<M: KinematicsProvider + ?Sized>(
    model: &M,
    data: &ModelData,
) -> Result<Vec<Vector3<f64>>> {
    collidable_point_kinematics(model, data).map(|(_, velocities)| velocities)
}

/// Full per-point contact evaluation, forces in the inertial representation.
pub fn contact_samples<M: MechanismModel + ?Sized>(
    model: &M,
    data: &ModelData,
) -> Result<Vec<ContactSample>> {
    let (positions, velocities) = collidable_point_kinematics(model, data)?;
    let contacts = SoftContacts::new(*data.soft_contacts_params(), model.terrain());
    contacts.evaluate_batch(
        model.collidable_points(),
        &positions,
        &velocities,
        data.tangential_deformation(),
    )
}

/// Contact forces and deformation rates of all collidable points.
///
/// Forces are 6D, expressed in the data's velocity representation. The
/// deformation rates are in the mixed frame of each point and have the same
/// order as [`ModelData::tangential_deformation`].
pub fn collidable_point_dynamics<M: MechanismModel + ?Sized>(
    model: &M,
    data: &ModelData,
) -> Result<(Vec<Vector6<f64>>, Vec<Vector3<f64>>)> {
    let samples = contact_samples(model, data)?;

    let representation = data.velocity_representation();
    let base = &data.state().base_pose;
    let forces = samples
        .iter()
        .map(|s| {
            convert(
                &s.force,
                VelocityRepresentation::Inertial,
                representation,
                base,
                true,
            )
        })
        .collect();
    let rates = samples.iter().map(|s| s.deformation_rate).collect();

    Ok((forces, rates))
}
