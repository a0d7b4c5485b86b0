//! A kinematic tree standing on a terrain.

use nalgebra::Point3;
use sim_terrain::Terrain;
use sim_types::{CollidablePoint, MechanismState, Result};

use crate::{
    KinematicTree, KinematicsProvider, LinkKinematics, MassPropertiesProvider, MechanismModel,
    ModelDescription,
};

/// Reference [`MechanismModel`]: a [`KinematicTree`] plus a [`Terrain`].
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    tree: KinematicTree,
    terrain: Terrain,
}

impl Model {
    /// Build a model from a description, on `terrain`.
    pub fn new(description: ModelDescription, terrain: Terrain) -> Result<Self> {
        Ok(Self {
            tree: KinematicTree::new(description)?,
            terrain,
        })
    }

    /// Build a model on flat ground at `z = 0`.
    pub fn on_flat_ground(description: ModelDescription) -> Result<Self> {
        Self::new(description, Terrain::default())
    }

    /// The underlying tree.
    #[must_use]
    pub fn tree(&self) -> &KinematicTree {
        &self.tree
    }

    /// Replace the terrain.
    #[must_use]
    pub fn with_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = terrain;
        self
    }
}

impl KinematicsProvider for Model {
    fn link_names(&self) -> &[String] {
        self.tree.link_names()
    }

    fn collidable_points(&self) -> &[CollidablePoint] {
        self.tree.collidable_points()
    }

    fn dofs(&self) -> usize {
        self.tree.dofs()
    }

    fn is_floating_base(&self) -> bool {
        self.tree.is_floating_base()
    }

    fn link_kinematics(&self, state: &MechanismState) -> Result<Vec<LinkKinematics>> {
        self.tree.link_kinematics(state)
    }
}

impl MassPropertiesProvider for Model {
    fn total_mass(&self) -> f64 {
        self.tree.total_mass()
    }

    fn center_of_mass(&self, state: &MechanismState) -> Result<Point3<f64>> {
        self.tree.center_of_mass(state)
    }
}

impl MechanismModel for Model {
    type Terrain = Terrain;

    fn terrain(&self) -> &Terrain {
        &self.terrain
    }
}
