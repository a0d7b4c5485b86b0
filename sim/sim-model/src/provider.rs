//! Interfaces the contact layer consumes from the rest of the engine.
//!
//! The contact code never computes forward kinematics or mass properties
//! itself. It talks to whatever engine owns the mechanism through
//! [`KinematicsProvider`] and [`MassPropertiesProvider`], and reads the ground
//! through the model's terrain.

use nalgebra::Point3;
use sim_terrain::TerrainModel;
use sim_types::{CollidablePoint, LinkId, MechanismState, Pose, Result, Twist};

/// World pose and velocity of one link.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinkKinematics {
    /// Link transform `W_H_L`.
    pub pose: Pose,
    /// Mixed `L[W]` velocity: `linear` is the coordinate derivative of the
    /// link origin, `angular` is the world angular velocity.
    pub velocity: Twist,
}

impl LinkKinematics {
    /// World position of a point fixed in the link frame.
    #[must_use]
    pub fn point_position(&self, offset: &nalgebra::Vector3<f64>) -> Point3<f64> {
        self.pose.transform_point(&Point3::from(*offset))
    }

    /// Coordinate derivative of a point fixed in the link frame.
    #[must_use]
    pub fn point_velocity(&self, offset: &nalgebra::Vector3<f64>) -> nalgebra::Vector3<f64> {
        let lever = self.pose.transform_vector(offset);
        self.velocity.velocity_at_point(&lever)
    }
}

/// Static description and forward kinematics of an articulated mechanism.
pub trait KinematicsProvider {
    /// Link names, indexed by [`LinkId`].
    fn link_names(&self) -> &[String];

    /// Collidable points, in the order used by every per-point array.
    fn collidable_points(&self) -> &[CollidablePoint];

    /// Number of joint degrees of freedom.
    fn dofs(&self) -> usize;

    /// Whether the base pose and velocity are free.
    fn is_floating_base(&self) -> bool;

    /// World pose and mixed velocity of every link.
    ///
    /// `state.base_velocity` must be in the inertial representation.
    /// Fails with a shape error if the joint vectors do not match
    /// [`dofs`](Self::dofs).
    fn link_kinematics(&self, state: &MechanismState) -> Result<Vec<LinkKinematics>>;

    /// Number of links.
    fn number_of_links(&self) -> usize {
        self.link_names().len()
    }

    /// Look up a link by name.
    fn link_index(&self, name: &str) -> Option<LinkId> {
        self.link_names()
            .iter()
            .position(|n| n == name)
            .map(LinkId::new)
    }
}

/// Mass and center of mass of a mechanism.
pub trait MassPropertiesProvider {
    /// Sum of all link masses (kg).
    fn total_mass(&self) -> f64;

    /// World position of the center of mass at `state`.
    fn center_of_mass(&self, state: &MechanismState) -> Result<Point3<f64>>;
}

/// Everything the contact layer needs: a mechanism standing on a terrain.
pub trait MechanismModel: KinematicsProvider + MassPropertiesProvider {
    /// Terrain type, resolved statically.
    type Terrain: TerrainModel + Sync;

    /// The ground the mechanism touches.
    fn terrain(&self) -> &Self::Terrain;
}
