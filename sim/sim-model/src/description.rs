//! Static mechanism description: links, joints, mass and collidable points.

use nalgebra::Vector3;
use sim_types::{CollidablePoint, JointType, LinkId, Pose};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Joint connecting a link to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointDescription {
    /// Joint kind.
    pub joint_type: JointType,
    /// Joint frame relative to the parent link frame, at zero position.
    pub origin: Pose,
    /// Motion axis in the joint frame. Ignored for fixed joints.
    pub axis: Vector3<f64>,
}

impl JointDescription {
    /// Rigid attachment.
    #[must_use]
    pub fn fixed(origin: Pose) -> Self {
        Self {
            joint_type: JointType::Fixed,
            origin,
            axis: Vector3::z(),
        }
    }

    /// Rotation about `axis`.
    #[must_use]
    pub fn revolute(origin: Pose, axis: Vector3<f64>) -> Self {
        Self {
            joint_type: JointType::Revolute,
            origin,
            axis,
        }
    }

    /// Translation along `axis`.
    #[must_use]
    pub fn prismatic(origin: Pose, axis: Vector3<f64>) -> Self {
        Self {
            joint_type: JointType::Prismatic,
            origin,
            axis,
        }
    }
}

impl Default for JointDescription {
    fn default() -> Self {
        Self::fixed(Pose::identity())
    }
}

/// One rigid link.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkDescription {
    /// Unique link name.
    pub name: String,
    /// Parent link, `None` only for the root.
    pub parent: Option<LinkId>,
    /// Joint to the parent. Ignored for the root.
    pub joint: JointDescription,
    /// Link mass (kg).
    pub mass: f64,
    /// Center of mass in the link frame.
    pub center_of_mass: Vector3<f64>,
}

impl LinkDescription {
    /// Root link (the base).
    #[must_use]
    pub fn root(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            parent: None,
            joint: JointDescription::default(),
            mass,
            center_of_mass: Vector3::zeros(),
        }
    }

    /// Link attached to `parent` through `joint`.
    #[must_use]
    pub fn child(
        name: impl Into<String>,
        parent: LinkId,
        joint: JointDescription,
        mass: f64,
    ) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent),
            joint,
            mass,
            center_of_mass: Vector3::zeros(),
        }
    }

    /// Set the center of mass in the link frame.
    #[must_use]
    pub fn with_center_of_mass(mut self, com: Vector3<f64>) -> Self {
        self.center_of_mass = com;
        self
    }
}

/// Everything needed to build a [`KinematicTree`](crate::KinematicTree).
///
/// Links must be added parents first; the root is the first link added.
///
/// # Example
///
/// ```
/// use sim_model::{JointDescription, LinkDescription, ModelDescription};
/// use sim_types::{Pose, Vector3};
///
/// let mut desc = ModelDescription::new("pendulum");
/// let base = desc.add_link(LinkDescription::root("base", 1.0));
/// let arm = desc.add_link(LinkDescription::child(
///     "arm",
///     base,
///     JointDescription::revolute(Pose::identity(), Vector3::y()),
///     0.5,
/// ));
/// desc.add_collidable_point(arm, Vector3::new(0.0, 0.0, -1.0));
///
/// assert_eq!(desc.links.len(), 2);
/// assert_eq!(desc.collidable_points.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelDescription {
    /// Model name, used in diagnostics.
    pub name: String,
    /// Whether the root link floats freely.
    pub floating_base: bool,
    /// Links in topological order.
    pub links: Vec<LinkDescription>,
    /// Points that can touch the terrain.
    pub collidable_points: Vec<CollidablePoint>,
}

impl ModelDescription {
    /// Empty fixed-base description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mark the base as floating or fixed.
    #[must_use]
    pub fn with_floating_base(mut self, floating: bool) -> Self {
        self.floating_base = floating;
        self
    }

    /// Append a link and return its id.
    pub fn add_link(&mut self, link: LinkDescription) -> LinkId {
        self.links.push(link);
        LinkId::new(self.links.len() - 1)
    }

    /// Attach a collidable point to `link` at `offset` in the link frame.
    pub fn add_collidable_point(&mut self, link: LinkId, offset: Vector3<f64>) {
        self.collidable_points
            .push(CollidablePoint::new(link, offset));
    }

    /// Attach several collidable points to the same link.
    pub fn add_collidable_points<I>(&mut self, link: LinkId, offsets: I)
    where
        I: IntoIterator<Item = Vector3<f64>>,
    {
        for offset in offsets {
            self.add_collidable_point(link, offset);
        }
    }

    /// Attach the eight corners of a box centered at `center` in the link
    /// frame.
    pub fn add_box_collision(
        &mut self,
        link: LinkId,
        center: Vector3<f64>,
        half_extents: Vector3<f64>,
    ) {
        self.add_collidable_points(link, box_corners(&center, &half_extents));
    }
}

/// Corners of an axis-aligned box, bottom face first.
#[must_use]
pub fn box_corners(center: &Vector3<f64>, half_extents: &Vector3<f64>) -> [Vector3<f64>; 8] {
    let h = half_extents;
    let mut corners = [Vector3::zeros(); 8];
    let mut i = 0;
    for sz in [-1.0, 1.0] {
        for (sx, sy) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            corners[i] = center + Vector3::new(sx * h.x, sy * h.y, sz * h.z);
            i += 1;
        }
    }
    corners
}
