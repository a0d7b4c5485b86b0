//! Soft contact between an articulated mechanism and terrain.
//!
//! Contact is modeled with penalty forces at collidable points rigidly
//! attached to the links. Each point carries a tangential deformation that
//! stretches while the point sticks and bleeds off when it slips, producing
//! friction without a constraint solver.
//!
//! # Contact Model
//!
//! ```text
//! δ   = (h(x, y) − z) · n̂_z          penetration
//! f_n = max(0, K·δ − D·v_n)           normal force, never adhesive
//! f_t = s · (−K·m_t)                  friction from deformation m_t
//! s   = min(1, μ·f_n / (‖K·m_t‖ + ε)) keeps ‖f_t‖ ≤ μ·f_n
//! ```
//!
//! The force law returns a deformation *rate* `ṁ`. The deformation itself is
//! simulation state in [`ModelData`], advanced by the caller's integrator.
//!
//! # Velocity Representations
//!
//! Forces are computed in the inertial frame. [`collidable_point_dynamics`]
//! converts them to the representation of the [`ModelData`] (inertial, body
//! or mixed), using the same converter that normalizes the base velocity
//! before kinematics.
//!
//! # Example
//!
//! ```
//! use sim_contact::{
//!     collidable_point_dynamics, estimate_good_soft_contacts_parameters, in_contact,
//!     EstimatorConfig, ModelData,
//! };
//! use sim_model::{LinkDescription, Model, ModelDescription};
//! use sim_types::{MechanismState, Point3, Pose, Vector3, VelocityRepresentation};
//!
//! // A 1 kg cube resting on four bottom corners.
//! let mut desc = ModelDescription::new("cube").with_floating_base(true);
//! let cube = desc.add_link(LinkDescription::root("cube", 1.0));
//! for (x, y) in [(-0.1, -0.1), (0.1, -0.1), (0.1, 0.1), (-0.1, 0.1)] {
//!     desc.add_collidable_point(cube, Vector3::new(x, y, -0.1));
//! }
//! let model = Model::on_flat_ground(desc).unwrap();
//!
//! let config = EstimatorConfig::default()
//!     .with_active_points(4)
//!     .with_max_penetration(0.001);
//! let params = estimate_good_soft_contacts_parameters(&model, &config).unwrap();
//!
//! // Sink the cube by exactly the target penetration.
//! let state = MechanismState::zero(0)
//!     .with_base_pose(Pose::from_position(Point3::new(0.0, 0.0, 0.099)));
//! let data = ModelData::build(&model, state, VelocityRepresentation::Mixed, None, params)
//!     .unwrap();
//!
//! assert_eq!(in_contact(&model, &data, None).unwrap(), vec![true]);
//!
//! // The four normal forces carry the weight.
//! let (forces, _rates) = collidable_point_dynamics(&model, &data).unwrap();
//! let lift: f64 = forces.iter().map(|f| f[2]).sum();
//! assert!((lift - 9.80665).abs() < 1e-6);
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//!
//! - Headless training loops
//! - Hardware control code
//! - Analysis tools
//! - Other physics engines

#![doc(html_root_url = "https://docs.rs/sim-contact/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn, clippy::module_name_repetitions)]

mod batch;
mod config;
mod data;
mod detection;
mod estimate;
mod model;
mod params;
mod points;

pub use config::{EstimatorConfig, DEFAULT_PENETRATION_FRACTION};
pub use data::ModelData;
pub use detection::{in_contact, points_in_contact};
pub use estimate::{estimate_good_soft_contacts_parameters, estimate_model_height};
pub use model::{ContactSample, SoftContacts, SATURATION_EPSILON};
pub use params::{
    SoftContactsParams, DEFAULT_DAMPING, DEFAULT_FRICTION_COEFFICIENT, DEFAULT_RELAXATION_TIME,
    DEFAULT_STIFFNESS,
};
pub use points::{
    collidable_point_dynamics, collidable_point_kinematics, collidable_point_positions,
    collidable_point_velocities, contact_samples,
};

// Re-export types needed for contact computation
pub use sim_types::{SimError, VelocityRepresentation};
