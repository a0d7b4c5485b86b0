//! Core types for soft contact simulation.
//!
//! This crate provides the foundational types shared by the contact stack:
//!
//! - [`Pose`], [`Twist`] - Frame transforms and 6D velocities
//! - [`VelocityRepresentation`] and [`convert`] - Inertial / body / mixed
//!   frame conventions and the lossless maps between them
//! - [`CollidablePoint`], [`LinkId`] - Contact points attached to links
//! - [`MechanismState`] - Base pose/velocity and joint positions/velocities
//! - [`SimError`] - Errors raised at API boundaries
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in
//! headless training loops, hardware control code and analysis tools.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed
//!
//! 6D vectors are laid out `[linear; angular]`.

#![doc(html_root_url = "https://docs.rs/sim-types/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod body;
mod collidable;
mod dynamics;
mod error;
mod joint;
pub mod representation;
pub mod spatial;
mod state;

pub use body::{Pose, Twist};
pub use collidable::{CollidablePoint, LinkId};
pub use dynamics::STANDARD_GRAVITY;
pub use error::SimError;
pub use joint::JointType;
pub use representation::{convert, convert_slice, VelocityRepresentation};
pub use state::MechanismState;

// Re-export math types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3, Vector6};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
