//! Soft contact parameters.
//!
//! The parameters are immutable for a simulation run. They are either built
//! directly, with the builder setters below, or derived from physical targets
//! by [`estimate_good_soft_contacts_parameters`](crate::estimate_good_soft_contacts_parameters).

use sim_types::{Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default stiffness (N/m).
pub const DEFAULT_STIFFNESS: f64 = 1e6;

/// Default damping (N·s/m).
pub const DEFAULT_DAMPING: f64 = 2_000.0;

/// Default static friction coefficient.
pub const DEFAULT_FRICTION_COEFFICIENT: f64 = 0.5;

/// Default relaxation time of the tangential deformation (s).
///
/// Equal to `DEFAULT_DAMPING / DEFAULT_STIFFNESS`.
pub const DEFAULT_RELAXATION_TIME: f64 = 2e-3;

/// Physical parameters of the soft contact model.
///
/// ```text
/// f_n = max(0, K·δ − D·v_n)          normal force
/// f_t = −K·m_t, capped at μ·f_n       tangential force from deformation m
/// ```
///
/// Deformation exceeding the friction cone bleeds off with time constant
/// `relaxation_time`, and so does the deformation of points out of contact.
///
/// # Example
///
/// ```
/// use sim_contact::SoftContactsParams;
///
/// let params = SoftContactsParams::default()
///     .with_stiffness(5e4)
///     .with_damping(SoftContactsParams::critical_damping(5e4, 2.0))
///     .with_friction(0.8);
///
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftContactsParams {
    /// Stiffness `K` (N/m). Must be positive.
    pub stiffness: f64,

    /// Damping `D` (N·s/m). Must be non-negative.
    pub damping: f64,

    /// Static friction coefficient `μ`. Must be non-negative.
    pub friction_coefficient: f64,

    /// Time constant `τ` with which excess tangential deformation relaxes (s).
    pub relaxation_time: f64,
}

impl Default for SoftContactsParams {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            friction_coefficient: DEFAULT_FRICTION_COEFFICIENT,
            relaxation_time: DEFAULT_RELAXATION_TIME,
        }
    }
}

impl SoftContactsParams {
    /// Parameters with the default relaxation time.
    #[must_use]
    pub fn new(stiffness: f64, damping: f64, friction_coefficient: f64) -> Self {
        Self {
            stiffness,
            damping,
            friction_coefficient,
            relaxation_time: DEFAULT_RELAXATION_TIME,
        }
    }

    /// Set the stiffness.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the damping.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the friction coefficient.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction_coefficient = friction;
        self
    }

    /// Set the deformation relaxation time.
    #[must_use]
    pub fn with_relaxation_time(mut self, relaxation_time: f64) -> Self {
        self.relaxation_time = relaxation_time;
        self
    }

    /// Compute the critical damping coefficient for a given mass.
    ///
    /// `2·√(K·m)`: the damping at which a mass `m` on a spring `K` stops
    /// oscillating.
    #[must_use]
    pub fn critical_damping(stiffness: f64, mass: f64) -> f64 {
        2.0 * (stiffness * mass).sqrt()
    }

    /// Damping ratio `ζ = D / (2·√(K·m))` these parameters give a mass `m`.
    #[must_use]
    pub fn damping_ratio(&self, mass: f64) -> f64 {
        self.damping / Self::critical_damping(self.stiffness, mass)
    }

    /// Steady-state penetration under a static load (m).
    #[must_use]
    pub fn static_penetration(&self, load: f64) -> f64 {
        load / self.stiffness
    }

    /// Validate the parameters.
    ///
    /// Requires `K > 0`, `D ≥ 0`, `μ ≥ 0` and `τ > 0`, all finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(SimError::invalid_params(format!(
                "stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(SimError::invalid_params(format!(
                "damping cannot be negative, got {}",
                self.damping
            )));
        }
        if !(self.friction_coefficient.is_finite() && self.friction_coefficient >= 0.0) {
            return Err(SimError::invalid_params(format!(
                "friction coefficient cannot be negative, got {}",
                self.friction_coefficient
            )));
        }
        if !(self.relaxation_time.is_finite() && self.relaxation_time > 0.0) {
            return Err(SimError::invalid_params(format!(
                "relaxation time must be positive, got {}",
                self.relaxation_time
            )));
        }
        Ok(())
    }
}
