//! Mechanism description and the providers the contact layer depends on.
//!
//! Soft contact needs three things from the rest of an engine:
//!
//! - **Kinematics**: world pose and velocity of every link
//!   ([`KinematicsProvider`])
//! - **Mass properties**: total mass and center of mass
//!   ([`MassPropertiesProvider`])
//! - **Terrain**: the ground under the mechanism ([`MechanismModel::terrain`])
//!
//! Any engine can implement these traits. This crate also ships a small
//! reference implementation, [`KinematicTree`] and [`Model`], with fixed,
//! revolute and prismatic joints.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-model/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn, clippy::module_name_repetitions)]

mod description;
mod model;
mod provider;
mod tree;

pub use description::{box_corners, JointDescription, LinkDescription, ModelDescription};
pub use model::Model;
pub use provider::{
    KinematicsProvider, LinkKinematics, MassPropertiesProvider, MechanismModel,
};
pub use tree::KinematicTree;
