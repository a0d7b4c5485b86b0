//! Targets for the soft contact parameter estimator.

use sim_types::{Result, SimError, STANDARD_GRAVITY};

use crate::params::DEFAULT_FRICTION_COEFFICIENT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fraction of the model height used as the default maximum penetration.
pub const DEFAULT_PENETRATION_FRACTION: f64 = 0.005;

/// Physical targets from which contact parameters are derived.
///
/// # Example
///
/// ```
/// use sim_contact::EstimatorConfig;
///
/// // A quadruped standing on four feet, 2 mm of sink, slightly underdamped.
/// let config = EstimatorConfig::default()
///     .with_active_points(4)
///     .with_damping_ratio(0.8)
///     .with_max_penetration(0.002);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EstimatorConfig {
    /// Gravitational acceleration magnitude (m/s²).
    pub standard_gravity: f64,

    /// Static friction coefficient copied into the result.
    pub static_friction_coefficient: f64,

    /// Number of points sharing the weight at rest.
    pub active_points: usize,

    /// Damping ratio `ζ`, 1.0 being critically damped.
    pub damping_ratio: f64,

    /// Steady-state penetration (m). Derived from the model height when
    /// `None`.
    pub max_penetration: Option<f64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            standard_gravity: STANDARD_GRAVITY,
            static_friction_coefficient: DEFAULT_FRICTION_COEFFICIENT,
            active_points: 1,
            damping_ratio: 1.0,
            max_penetration: None,
        }
    }
}

impl EstimatorConfig {
    /// Set the gravitational acceleration.
    #[must_use]
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.standard_gravity = gravity;
        self
    }

    /// Set the static friction coefficient.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.static_friction_coefficient = friction;
        self
    }

    /// Set the number of support points.
    #[must_use]
    pub fn with_active_points(mut self, points: usize) -> Self {
        self.active_points = points;
        self
    }

    /// Set the damping ratio.
    #[must_use]
    pub fn with_damping_ratio(mut self, ratio: f64) -> Self {
        self.damping_ratio = ratio;
        self
    }

    /// Set an explicit steady-state penetration.
    #[must_use]
    pub fn with_max_penetration(mut self, penetration: f64) -> Self {
        self.max_penetration = Some(penetration);
        self
    }

    /// Check the targets.
    ///
    /// A zero point count or an explicit non-positive penetration is an
    /// invalid model; negative gravity, friction or damping ratio are
    /// invalid parameters.
    pub fn validate(&self) -> Result<()> {
        if self.active_points == 0 {
            return Err(SimError::invalid_model(
                "number of active support points must be positive",
            ));
        }
        if let Some(depth) = self.max_penetration {
            if !(depth.is_finite() && depth > 0.0) {
                return Err(SimError::invalid_model(format!(
                    "maximum penetration must be positive, got {depth}"
                )));
            }
        }
        if !(self.standard_gravity.is_finite() && self.standard_gravity > 0.0) {
            return Err(SimError::invalid_params(format!(
                "gravity must be positive, got {}",
                self.standard_gravity
            )));
        }
        if !(self.static_friction_coefficient.is_finite() && self.static_friction_coefficient >= 0.0)
        {
            return Err(SimError::invalid_params(format!(
                "friction coefficient cannot be negative, got {}",
                self.static_friction_coefficient
            )));
        }
        if !(self.damping_ratio.is_finite() && self.damping_ratio >= 0.0) {
            return Err(SimError::invalid_params(format!(
                "damping ratio cannot be negative, got {}",
                self.damping_ratio
            )));
        }
        Ok(())
    }
}
