//! Batched evaluation over collidable points.
//!
//! Every point is independent, so batches are mapped in parallel via rayon
//! when the `parallel` feature is enabled, and sequentially otherwise. Both
//! paths produce identical results in point order.

use nalgebra::{Point3, Vector3};
use sim_model::LinkKinematics;
use sim_terrain::TerrainModel;
use sim_types::{CollidablePoint, Result, SimError};
use tracing::trace;

use crate::{ContactSample, SoftContacts};

/// World position and velocity of every point, from its link's kinematics.
///
/// Every `point.link` must index into `links`.
pub(crate) fn point_kinematics(
    points: &[CollidablePoint],
    links: &[LinkKinematics],
) -> (Vec<Point3<f64>>, Vec<Vector3<f64>>) {
    let eval = |point: &CollidablePoint| {
        let link = &links[point.link.index()];
        (
            link.point_position(&point.offset),
            link.point_velocity(&point.offset),
        )
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        points.par_iter().map(eval).unzip()
    }

    #[cfg(not(feature = "parallel"))]
    {
        points.iter().map(eval).unzip()
    }
}

impl<T: TerrainModel + Sync> SoftContacts<T> {
    /// Evaluate the force law at every point.
    ///
    /// Terrain heights and normals are queried once for the whole batch. Disabled points
    /// produce zero force and relaxing deformation.
    ///
    /// Fails with a shape error unless all slices have the same length.
    pub fn evaluate_batch(
        &self,
        points: &[CollidablePoint],
        positions: &[Point3<f64>],
        velocities: &[Vector3<f64>],
        deformation: &[Vector3<f64>],
    ) -> Result<Vec<ContactSample>> {
        let n = points.len();
        for (what, len) in [
            ("point positions", positions.len()),
            ("point velocities", velocities.len()),
            ("tangential deformation", deformation.len()),
        ] {
            if len != n {
                return Err(SimError::shape(what, n, len));
            }
        }

        let heights = self.terrain().heights(positions);
        let normals = self.terrain().normals(positions);
        let eval = |i: usize| {
            if points[i].enabled {
                self.evaluate(
                    &positions[i],
                    &velocities[i],
                    &deformation[i],
                    heights[i],
                    &normals[i],
                )
            } else {
                self.released(&positions[i], &velocities[i], &deformation[i])
            }
        };

        #[cfg(feature = "parallel")]
        let samples: Vec<ContactSample> = {
            use rayon::iter::{IntoParallelIterator, ParallelIterator};
            (0..n).into_par_iter().map(eval).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let samples: Vec<ContactSample> = (0..n).map(eval).collect();

        trace!(
            points = n,
            active = samples.iter().filter(|s| s.is_active()).count(),
            "evaluated soft contacts"
        );

        Ok(samples)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::SoftContactsParams;
    use approx::assert_relative_eq;
    use sim_terrain::Terrain;
    use sim_types::{LinkId, Pose, Twist};

    #[test]
    fn test_point_kinematics_uses_link_frame() {
        let links = [
            LinkKinematics::default(),
            LinkKinematics {
                pose: Pose::from_position(Point3::new(0.0, 0.0, 1.0)),
                velocity: Twist::new(Vector3::x(), Vector3::new(0.0, 0.0, 2.0)),
            },
        ];
        let points = [
            CollidablePoint::new(LinkId::new(0), Vector3::zeros()),
            CollidablePoint::new(LinkId::new(1), Vector3::new(0.5, 0.0, 0.0)),
        ];

        let (positions, velocities) = point_kinematics(&points, &links);
        assert_eq!(positions[0], Point3::origin());
        assert_relative_eq!(positions[1], Point3::new(0.5, 0.0, 1.0), epsilon = 1e-12);
        // v + ω × r = (1, 0, 0) + (0, 0, 2) × (0.5, 0, 0)
        assert_relative_eq!(velocities[1], Vector3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_batch_matches_single_point() {
        let terrain = Terrain::flat(0.0);
        let contacts = SoftContacts::new(SoftContactsParams::new(1000.0, 50.0, 0.5), &terrain);

        let points: Vec<_> = (0..16)
            .map(|_| CollidablePoint::new(LinkId::new(0), Vector3::zeros()))
            .collect();
        let positions: Vec<_> = (0..16_u32)
            .map(|i| Point3::new(f64::from(i), 0.0, 0.01 * f64::from(i) - 0.08))
            .collect();
        let velocities = vec![Vector3::new(0.1, 0.0, -0.05); 16];
        let deformation = vec![Vector3::new(0.001, 0.0, 0.0); 16];

        let batch = contacts
            .evaluate_batch(&points, &positions, &velocities, &deformation)
            .unwrap();
        for i in 0..16 {
            let single = contacts.contact_model(&positions[i], &velocities[i], &deformation[i]);
            assert_eq!(batch[i], single);
        }
    }

    #[test]
    fn test_disabled_point_never_pushes() {
        let terrain = Terrain::flat(0.0);
        let contacts = SoftContacts::new(SoftContactsParams::default(), &terrain);
        let points = [CollidablePoint::new(LinkId::new(0), Vector3::zeros()).disabled()];
        let m = [Vector3::new(0.0, 0.004, 0.0)];

        let batch = contacts
            .evaluate_batch(&points, &[Point3::new(0.0, 0.0, -1.0)], &[Vector3::zeros()], &m)
            .unwrap();
        assert_eq!(batch[0].force, nalgebra::Vector6::zeros());
        assert_relative_eq!(
            batch[0].deformation_rate,
            -m[0] / SoftContactsParams::default().relaxation_time,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_batch_shape_mismatch() {
        let terrain = Terrain::flat(0.0);
        let contacts = SoftContacts::new(SoftContactsParams::default(), &terrain);
        let points = [CollidablePoint::new(LinkId::new(0), Vector3::zeros())];
        let err = contacts
            .evaluate_batch(&points, &[Point3::origin()], &[], &[Vector3::zeros()])
            .unwrap_err();
        assert!(err.is_shape_error());
    }
}
