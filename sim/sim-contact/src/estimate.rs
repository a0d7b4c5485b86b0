//! Soft contact parameters from physical targets.
//!
//! Given the weight of the mechanism, how many points carry it at rest and
//! how deep they may sink, the stiffness follows from static equilibrium and
//! the damping from the critical damping of the mass each point carries:
//!
//! ```text
//! K = (m·g / n) / δ_max
//! D = ζ · 2·√(K · m/n)
//! ```
//!
//! Without an explicit `δ_max`, it is 0.5% of an estimated model height,
//! measured at the zero configuration.

use sim_model::{KinematicsProvider, MassPropertiesProvider};
use sim_types::{Result, SimError};
use tracing::{debug, warn};

use crate::config::DEFAULT_PENETRATION_FRACTION;
use crate::{collidable_point_positions, EstimatorConfig, ModelData, SoftContactsParams};

/// Height of the model standing at the zero configuration.
///
/// Twice the center-of-mass height above the lowest collidable point for a
/// floating base, twice the center-of-mass height above the ground plane
/// `z = 0` for a fixed base.
pub fn estimate_model_height<M>(model: &M) -> Result<f64>
where
    M: KinematicsProvider + MassPropertiesProvider + ?Sized,
{
    let data = ModelData::zero(model, SoftContactsParams::default());
    let com = model.center_of_mass(&data.inertial_state())?;

    if !model.is_floating_base() {
        return Ok(2.0 * com.z);
    }

    let lowest = collidable_point_positions(model, &data)?
        .iter()
        .map(|p| p.z)
        .reduce(f64::min)
        .ok_or_else(|| {
            SimError::invalid_model("floating-base model has no collidable points")
        })?;

    Ok(2.0 * (com.z - lowest))
}

/// Derive soft contact parameters that hold the mechanism at rest with the
/// targeted penetration.
///
/// Fails with [`SimError::InvalidModel`] if the total mass is not positive,
/// if `config.active_points` is zero, or if no positive maximum penetration
/// is given or can be derived from the model height.
///
/// # Example
///
/// ```
/// use sim_contact::{estimate_good_soft_contacts_parameters, EstimatorConfig};
/// use sim_model::{LinkDescription, Model, ModelDescription};
/// use sim_types::{Vector3, STANDARD_GRAVITY};
///
/// let mut desc = ModelDescription::new("ball").with_floating_base(true);
/// let ball = desc.add_link(LinkDescription::root("ball", 2.0));
/// desc.add_collidable_point(ball, Vector3::new(0.0, 0.0, -0.1));
/// let model = Model::on_flat_ground(desc).unwrap();
///
/// let config = EstimatorConfig::default().with_max_penetration(0.001);
/// let params = estimate_good_soft_contacts_parameters(&model, &config).unwrap();
///
/// let weight = 2.0 * STANDARD_GRAVITY;
/// assert!((params.stiffness * 0.001 - weight).abs() < 1e-9);
/// ```
pub fn estimate_good_soft_contacts_parameters<M>(
    model: &M,
    config: &EstimatorConfig,
) -> Result<SoftContactsParams>
where
    M: KinematicsProvider + MassPropertiesProvider + ?Sized,
{
    config.validate()?;

    let mass = model.total_mass();
    if !(mass.is_finite() && mass > 0.0) {
        return Err(SimError::invalid_model(format!(
            "total mass must be positive, got {mass}"
        )));
    }

    let points = model.collidable_points().len();
    if config.active_points > points {
        warn!(
            active_points = config.active_points,
            collidable_points = points,
            "more support points than collidable points"
        );
    }
    if config.damping_ratio == 0.0 {
        warn!("damping ratio is zero, contacts will not dissipate energy");
    }

    let max_penetration = match config.max_penetration {
        Some(depth) => depth,
        None => {
            let height = estimate_model_height(model)?;
            let depth = DEFAULT_PENETRATION_FRACTION * height;
            debug!(height, depth, "derived maximum penetration from model height");
            if !(depth.is_finite() && depth > 0.0) {
                return Err(SimError::invalid_model(format!(
                    "cannot derive a penetration depth from model height {height}"
                )));
            }
            depth
        }
    };

    #[allow(clippy::cast_precision_loss)]
    let n = config.active_points as f64;
    let weight = mass * config.standard_gravity;
    let stiffness = weight / n / max_penetration;
    let damping =
        config.damping_ratio * SoftContactsParams::critical_damping(stiffness, mass / n);

    debug!(
        mass,
        weight,
        active_points = config.active_points,
        max_penetration,
        stiffness,
        damping,
        "estimated soft contact parameters"
    );

    let params = SoftContactsParams::new(stiffness, damping, config.static_friction_coefficient);
    params.validate()?;
    Ok(params)
}
