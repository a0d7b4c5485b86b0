//! Soft contact force law with tangential deformation state.
//!
//! Each collidable point is evaluated on its own. Given its world position
//! `p`, velocity `v` and tangential deformation `m`, against a terrain with
//! height `h` and unit normal `n̂`:
//!
//! ```text
//! δ    = (h(x, y) − z) · n̂_z                penetration, active iff δ > 0
//! f_n  = max(0, K·δ − D·(v·n̂))              no adhesion
//! f_e  = −K·m_t                              m_t = m − (m·n̂)n̂
//! s    = min(1, μ·f_n / (‖f_e‖ + ε))         smooth cone saturation
//! f    = f_n·n̂ + s·f_e
//! ṁ    = v_t − (1 − s)·m_t/τ − (m·n̂)n̂/τ
//! ```
//!
//! Points out of contact produce exactly zero force and `ṁ = −m/τ`, so that
//! deformation left over from a previous contact fades instead of
//! accumulating.
//!
//! The force `f` acts at the point itself (frame `C[W]`, no moment). The
//! inertial 6D force is `[f; p × f]`.
//!
//! The module never advances `m`: it returns `ṁ` and leaves integration to
//! the caller.

use nalgebra::{Point3, Vector3, Vector6};
use sim_terrain::TerrainModel;
use sim_types::spatial::inertial_force_at_point;

use crate::SoftContactsParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Guard in the friction saturation ratio (N).
///
/// Keeps `μ·f_n / ‖f_e‖` finite when there is no elastic force.
pub const SATURATION_EPSILON: f64 = 1e-9;

/// Result of evaluating the force law at one point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactSample {
    /// World position of the point.
    pub position: Point3<f64>,
    /// World velocity of the point (coordinate derivative).
    pub velocity: Vector3<f64>,
    /// Penetration depth, positive in contact.
    pub penetration: f64,
    /// Linear contact force applied at the point (mixed frame `C[W]`).
    pub mixed_force: Vector3<f64>,
    /// 6D contact force in the inertial representation, `[f; p × f]`.
    pub force: Vector6<f64>,
    /// Tangential deformation rate, in `C[W]`.
    pub deformation_rate: Vector3<f64>,
}

impl ContactSample {
    /// Whether the point penetrates the terrain.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.penetration > 0.0
    }
}

/// Soft contact model bound to a terrain.
///
/// `T` is usually a reference to the model's terrain. Batched evaluation
/// queries heights and normals once for the whole batch, so a terrain enum
/// picks its variant once per batch rather than once per point.
///
/// # Example
///
/// ```
/// use sim_contact::{SoftContacts, SoftContactsParams};
/// use sim_terrain::Terrain;
/// use nalgebra::{Point3, Vector3};
///
/// let terrain = Terrain::flat(0.0);
/// let contacts = SoftContacts::new(SoftContactsParams::new(1000.0, 50.0, 0.5), &terrain);
///
/// let sample = contacts.contact_model(
///     &Point3::new(0.0, 0.0, -0.01),
///     &Vector3::zeros(),
///     &Vector3::zeros(),
/// );
///
/// assert!((sample.mixed_force.z - 10.0).abs() < 1e-9);
/// assert_eq!(sample.deformation_rate, Vector3::zeros());
/// ```
#[derive(Debug, Clone)]
pub struct SoftContacts<T> {
    params: SoftContactsParams,
    terrain: T,
}

impl<T: TerrainModel> SoftContacts<T> {
    /// Bind parameters to a terrain.
    #[must_use]
    pub fn new(params: SoftContactsParams, terrain: T) -> Self {
        Self { params, terrain }
    }

    /// Contact parameters.
    #[must_use]
    pub fn params(&self) -> &SoftContactsParams {
        &self.params
    }

    /// The terrain.
    #[must_use]
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    /// Evaluate the force law at one point.
    #[must_use]
    pub fn contact_model(
        &self,
        position: &Point3<f64>,
        velocity: &Vector3<f64>,
        deformation: &Vector3<f64>,
    ) -> ContactSample {
        let height = self.terrain.height(position.x, position.y);
        let normal = self.terrain.normal(position.x, position.y);
        self.evaluate(position, velocity, deformation, height, &normal)
    }

    /// Evaluate the force law with a precomputed terrain height and unit
    /// normal under the point.
    #[must_use]
    pub fn evaluate(
        &self,
        position: &Point3<f64>,
        velocity: &Vector3<f64>,
        deformation: &Vector3<f64>,
        height: f64,
        normal: &Vector3<f64>,
    ) -> ContactSample {
        let normal = *normal;
        let penetration = (height - position.z) * normal.z;

        // Also catches NaN.
        if !(penetration > 0.0) {
            return ContactSample {
                penetration,
                ..self.released(position, velocity, deformation)
            };
        }

        let SoftContactsParams {
            stiffness,
            damping,
            friction_coefficient,
            relaxation_time,
        } = self.params;

        let normal_velocity = velocity.dot(&normal);
        let normal_magnitude = (stiffness * penetration - damping * normal_velocity).max(0.0);

        let normal_deformation = normal * deformation.dot(&normal);
        let tangential_deformation = deformation - normal_deformation;
        let tangential_velocity = velocity - normal * normal_velocity;

        let elastic = -stiffness * tangential_deformation;
        let saturation = (friction_coefficient * normal_magnitude
            / (elastic.norm() + SATURATION_EPSILON))
            .min(1.0);
        let friction = elastic * saturation;

        let mixed_force = normal * normal_magnitude + friction;
        let deformation_rate = tangential_velocity
            - tangential_deformation * ((1.0 - saturation) / relaxation_time)
            - normal_deformation / relaxation_time;

        ContactSample {
            position: *position,
            velocity: *velocity,
            penetration,
            mixed_force,
            force: inertial_force_at_point(&position.coords, &mixed_force),
            deformation_rate,
        }
    }

    /// Sample of a point that does not interact with the terrain: zero force
    /// and relaxing deformation.
    #[must_use]
    pub fn released(
        &self,
        position: &Point3<f64>,
        velocity: &Vector3<f64>,
        deformation: &Vector3<f64>,
    ) -> ContactSample {
        ContactSample {
            position: *position,
            velocity: *velocity,
            penetration: 0.0,
            mixed_force: Vector3::zeros(),
            force: Vector6::zeros(),
            deformation_rate: -deformation / self.params.relaxation_time,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::params::DEFAULT_RELAXATION_TIME;
    use sim_terrain::{FlatTerrain, ParametricTerrain, Terrain};
    use sim_types::spatial::split;

    fn contacts(params: SoftContactsParams) -> SoftContacts<FlatTerrain> {
        SoftContacts::new(params, FlatTerrain { height: 0.0 })
    }

    fn reference() -> SoftContacts<FlatTerrain> {
        contacts(SoftContactsParams::new(1000.0, 50.0, 0.5))
    }

    #[test]
    fn test_resting_point_below_ground() {
        let sample = reference().contact_model(
            &Point3::new(0.0, 0.0, -0.01),
            &Vector3::zeros(),
            &Vector3::zeros(),
        );

        assert!(sample.is_active());
        assert_relative_eq!(sample.penetration, 0.01, epsilon = 1e-15);
        assert_relative_eq!(sample.mixed_force, Vector3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        // Force along the lever arm: no moment about the origin.
        assert_relative_eq!(sample.force, Vector6::new(0.0, 0.0, 10.0, 0.0, 0.0, 0.0), epsilon = 1e-9);
        assert_eq!(sample.deformation_rate, Vector3::zeros());
    }

    #[test]
    fn test_point_above_ground_is_exactly_zero() {
        for params in [
            SoftContactsParams::new(1000.0, 50.0, 0.5),
            SoftContactsParams::new(1e7, 0.0, 2.0),
        ] {
            let sample = contacts(params).contact_model(
                &Point3::new(0.0, 0.0, 0.01),
                &Vector3::new(1.0, 0.0, -3.0),
                &Vector3::zeros(),
            );
            assert!(!sample.is_active());
            assert_eq!(sample.force, Vector6::zeros());
            assert_eq!(sample.mixed_force, Vector3::zeros());
        }
    }

    #[test]
    fn test_released_deformation_relaxes() {
        let model = reference();
        let m = Vector3::new(0.002, -0.001, 0.0);
        let sample = model.contact_model(&Point3::new(0.0, 0.0, 1.0), &Vector3::x(), &m);
        assert_relative_eq!(
            sample.deformation_rate,
            -m / DEFAULT_RELAXATION_TIME,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_damping_clamped_when_separating() {
        let model = reference();
        // K·δ = 10, D·v_z = 50 · 1 = 50: would pull, clamps to zero.
        let sample = model.contact_model(
            &Point3::new(0.0, 0.0, -0.01),
            &Vector3::new(0.0, 0.0, 1.0),
            &Vector3::zeros(),
        );
        assert!(sample.is_active());
        assert_eq!(sample.mixed_force, Vector3::zeros());

        // Approaching adds damping.
        let sample = model.contact_model(
            &Point3::new(0.0, 0.0, -0.01),
            &Vector3::new(0.0, 0.0, -0.1),
            &Vector3::zeros(),
        );
        assert_relative_eq!(sample.mixed_force.z, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stick_regime() {
        let model = reference();
        // Elastic force 1000 · 0.001 = 1 N, cone 0.5 · 10 = 5 N.
        let m = Vector3::new(0.001, 0.0, 0.0);
        let v = Vector3::new(0.2, 0.0, 0.0);
        let sample = model.contact_model(&Point3::new(0.0, 0.0, -0.01), &v, &m);

        assert_relative_eq!(sample.mixed_force.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(sample.deformation_rate, v, epsilon = 1e-6);
    }

    #[test]
    fn test_slip_saturates_on_cone() {
        let model = reference();
        // Elastic force 1000 · 0.02 = 20 N, cone 5 N.
        let m = Vector3::new(0.0, 0.02, 0.0);
        let v = Vector3::new(0.0, 0.5, 0.0);
        let sample = model.contact_model(&Point3::new(0.0, 0.0, -0.01), &v, &m);

        let tangential = Vector3::new(sample.mixed_force.x, sample.mixed_force.y, 0.0);
        assert_relative_eq!(tangential.norm(), 5.0, epsilon = 1e-6);
        assert!(sample.mixed_force.y < 0.0);

        // s = 0.25: excess deformation bleeds off.
        let expected = v - m * (0.75 / DEFAULT_RELAXATION_TIME);
        assert_relative_eq!(sample.deformation_rate, expected, epsilon = 1e-3);
        assert!(sample.deformation_rate.y < v.y);
    }

    #[test]
    fn test_stick_slip_transition_is_continuous() {
        let model = reference();
        let position = Point3::new(0.0, 0.0, -0.01);
        // f_n = 10 N, cone 5 N: the boundary sits at ‖m_t‖ = 5 mm.
        let boundary = 0.005;
        let steps = 200;
        let step = 0.02 * boundary / f64::from(steps);

        let sample_at = |m: f64| {
            let s = model.contact_model(&position, &Vector3::zeros(), &Vector3::new(m, 0.0, 0.0));
            (s.mixed_force.x.abs(), s.deformation_rate)
        };

        let (first, _) = sample_at(0.99 * boundary);
        assert_relative_eq!(first, 4.95, epsilon = 1e-6);

        let mut previous = sample_at(0.99 * boundary);
        for i in 1..=steps {
            let current = sample_at(0.99 * boundary + f64::from(i) * step);
            // Force and rate move by at most K·Δm and Δm/τ.
            assert!((current.0 - previous.0).abs() <= 1.01 * 1000.0 * step);
            assert!((current.1 - previous.1).norm() <= 1.01 * step / DEFAULT_RELAXATION_TIME);
            previous = current;
        }
        assert_relative_eq!(previous.0, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_normal_force_with_deformation_is_finite() {
        let model = reference();
        let m = Vector3::new(0.01, 0.01, 0.0);
        let sample = model.contact_model(
            &Point3::new(0.0, 0.0, -0.001),
            &Vector3::new(0.0, 0.0, 5.0),
            &m,
        );
        assert!(sample.force.iter().all(|f| f.is_finite()));
        assert!(sample.deformation_rate.iter().all(|f| f.is_finite()));
        assert_eq!(sample.mixed_force, Vector3::zeros());
    }

    #[test]
    fn test_normal_deformation_relaxes_in_contact() {
        let model = reference();
        let m = Vector3::new(0.0, 0.0, 0.004);
        let sample = model.contact_model(&Point3::new(0.0, 0.0, -0.01), &Vector3::zeros(), &m);
        assert_relative_eq!(sample.mixed_force, Vector3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(
            sample.deformation_rate,
            -m / DEFAULT_RELAXATION_TIME,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_moment_about_world_origin() {
        let model = reference();
        let p = Point3::new(1.0, 0.0, -0.01);
        let sample = model.contact_model(&p, &Vector3::zeros(), &Vector3::zeros());
        // p × (0, 0, 10) = (0, -10, 0)
        let (linear, angular) = split(&sample.force);
        assert_relative_eq!(linear, Vector3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(angular, Vector3::new(0.0, -10.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_inclined_plane_pushes_along_normal() {
        let plane =
            ParametricTerrain::plane(Point3::origin(), Vector3::new(-1.0, 0.0, 1.0)).unwrap();
        let terrain = Terrain::from(plane);
        let model = SoftContacts::new(SoftContactsParams::new(1000.0, 0.0, 0.5), &terrain);

        let sample = model.contact_model(
            &Point3::new(0.0, 0.0, -0.01),
            &Vector3::zeros(),
            &Vector3::zeros(),
        );
        let n = Vector3::new(-1.0, 0.0, 1.0).normalize();
        assert_relative_eq!(sample.penetration, 0.01 * n.z, epsilon = 1e-12);
        assert_relative_eq!(sample.mixed_force.normalize(), n, epsilon = 1e-9);
    }
}
