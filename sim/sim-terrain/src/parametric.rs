//! Analytic terrains: inclined planes and superposed sinusoidal waves.

use nalgebra::{Point3, Unit, Vector3};
use sim_types::{Result, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sinusoidal component `amplitude * sin(kx * x + ky * y + phase)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Wave {
    /// Peak height above the base level (m).
    pub amplitude: f64,
    /// Angular wave number along X (rad/m).
    pub kx: f64,
    /// Angular wave number along Y (rad/m).
    pub ky: f64,
    /// Phase offset (rad).
    pub phase: f64,
}

impl Wave {
    /// Wave with the given amplitude and wavelength travelling along X.
    #[must_use]
    pub fn along_x(amplitude: f64, wavelength: f64) -> Self {
        Self {
            amplitude,
            kx: std::f64::consts::TAU / wavelength,
            ky: 0.0,
            phase: 0.0,
        }
    }

    fn height(&self, x: f64, y: f64) -> f64 {
        self.amplitude * (self.kx * x + self.ky * y + self.phase).sin()
    }

    fn gradient(&self, x: f64, y: f64) -> (f64, f64) {
        let c = self.amplitude * (self.kx * x + self.ky * y + self.phase).cos();
        (c * self.kx, c * self.ky)
    }
}

/// Terrain described by a closed-form height function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParametricTerrain {
    /// Infinite plane through `point` with upward `normal`.
    Plane {
        /// Any point on the plane.
        point: Point3<f64>,
        /// Unit normal, with a strictly positive Z component.
        normal: Unit<Vector3<f64>>,
    },
    /// Base level plus a sum of sinusoids.
    Waves {
        /// Mean height (m).
        base_height: f64,
        /// Superposed components.
        components: Vec<Wave>,
    },
}

impl ParametricTerrain {
    /// Inclined plane. Fails unless the normal points upward.
    pub fn plane(point: Point3<f64>, normal: Vector3<f64>) -> Result<Self> {
        let norm = normal.norm();
        if !(norm.is_finite() && norm > 0.0) || normal.z / norm <= 1e-6 {
            return Err(SimError::invalid_model(
                "plane terrain normal must point upward",
            ));
        }
        Ok(Self::Plane {
            point,
            normal: Unit::new_normalize(normal),
        })
    }

    /// Waves around `base_height`.
    #[must_use]
    pub fn waves(base_height: f64, components: Vec<Wave>) -> Self {
        Self::Waves {
            base_height,
            components,
        }
    }

    /// Terrain height at `(x, y)`.
    #[must_use]
    pub fn height(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Plane { point, normal } => {
                // n · (p - p0) = 0 solved for z.
                point.z - (normal.x * (x - point.x) + normal.y * (y - point.y)) / normal.z
            }
            Self::Waves {
                base_height,
                components,
            } => base_height + components.iter().map(|w| w.height(x, y)).sum::<f64>(),
        }
    }

    /// Unit surface normal at `(x, y)`.
    #[must_use]
    pub fn normal(&self, x: f64, y: f64) -> Vector3<f64> {
        match self {
            Self::Plane { normal, .. } => normal.into_inner(),
            Self::Waves { components, .. } => {
                let (dx, dy) = components
                    .iter()
                    .map(|w| w.gradient(x, y))
                    .fold((0.0, 0.0), |(ax, ay), (gx, gy)| (ax + gx, ay + gy));
                Vector3::new(-dx, -dy, 1.0).normalize()
            }
        }
    }
}
