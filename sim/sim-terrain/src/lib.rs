//! Terrain models for point-vs-terrain contact.
//!
//! The contact layer only needs two queries from the ground:
//!
//! ```text
//! height(x, y) -> z         (penetration: δ = (height - z) · n̂_z)
//! normal(x, y) -> n̂         (defaults to +Z)
//! ```
//!
//! [`TerrainModel`] is that capability. [`Terrain`] is a tagged union over the
//! built-in variants:
//!
//! - [`FlatTerrain`] - constant height
//! - [`HeightField`] - bilinearly interpolated grid
//! - [`ParametricTerrain`] - inclined planes and sinusoidal waves
//!
//! Batched contact code is generic over `T: TerrainModel`, so the variant is
//! resolved once per batch rather than per point.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.

#![doc(html_root_url = "https://docs.rs/sim-terrain/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod heightfield;
mod parametric;
mod terrain;

pub use heightfield::HeightField;
pub use parametric::{ParametricTerrain, Wave};
pub use terrain::{FlatTerrain, Terrain, TerrainModel};
