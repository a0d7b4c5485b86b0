//! Reference kinematic tree with forward kinematics and mass properties.
//!
//! Links are stored in topological order, so a single forward pass visits
//! every parent before its children:
//!
//! ```text
//! W_H_i = W_H_parent · origin_i · motion_i(q_i)
//! ω_i   = ω_parent + a_i q̇_i                   (revolute)
//! ṗ_i   = ṗ_parent + ω_parent × (p_i − p_parent) + a_i q̇_i   (prismatic)
//! ```
//!
//! where `a_i` is the joint axis in world coordinates.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use sim_types::{
    convert, CollidablePoint, JointType, LinkId, MechanismState, Pose, Result, SimError, Twist,
    VelocityRepresentation,
};
use tracing::debug;

use crate::{
    JointDescription, KinematicsProvider, LinkKinematics, MassPropertiesProvider, ModelDescription,
};

/// One validated link.
#[derive(Debug, Clone, PartialEq)]
struct Link {
    parent: Option<usize>,
    joint: JointDescription,
    /// Unit axis, meaningful for movable joints only.
    axis: Unit<Vector3<f64>>,
    /// Index into the joint vectors, `None` for fixed joints.
    dof: Option<usize>,
    mass: f64,
    center_of_mass: Vector3<f64>,
}

/// Articulated mechanism built from a validated [`ModelDescription`].
///
/// # Example
///
/// ```
/// use sim_model::{
///     JointDescription, KinematicTree, KinematicsProvider, LinkDescription, ModelDescription,
/// };
/// use sim_types::{MechanismState, Pose, Point3, Vector3};
///
/// let mut desc = ModelDescription::new("slider");
/// let base = desc.add_link(LinkDescription::root("base", 1.0));
/// desc.add_link(LinkDescription::child(
///     "carriage",
///     base,
///     JointDescription::prismatic(Pose::identity(), Vector3::x()),
///     1.0,
/// ));
///
/// let tree = KinematicTree::new(desc).unwrap();
/// let mut state = MechanismState::zero(tree.dofs());
/// state.joint_positions[0] = 0.3;
///
/// let links = tree.link_kinematics(&state).unwrap();
/// assert_eq!(links[1].pose.position, Point3::new(0.3, 0.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicTree {
    name: String,
    floating_base: bool,
    link_names: Vec<String>,
    links: Vec<Link>,
    collidable_points: Vec<CollidablePoint>,
    dofs: usize,
    total_mass: f64,
}

impl KinematicTree {
    /// Validate a description and build the tree.
    ///
    /// Fails with [`SimError::InvalidModel`] if the description has no links,
    /// if the first link has a parent or any later link lacks one, if a parent
    /// does not precede its child, if link names repeat, if a mass is negative
    /// or not finite, if a movable joint has a degenerate axis, or if a
    /// collidable point references a missing link.
    pub fn new(description: ModelDescription) -> Result<Self> {
        let ModelDescription {
            name,
            floating_base,
            links: link_descriptions,
            collidable_points,
        } = description;

        if link_descriptions.is_empty() {
            return Err(SimError::invalid_model(format!(
                "model '{name}' has no links"
            )));
        }

        let mut link_names: Vec<String> = Vec::with_capacity(link_descriptions.len());
        let mut links: Vec<Link> = Vec::with_capacity(link_descriptions.len());
        let mut dofs = 0;

        for (index, link) in link_descriptions.into_iter().enumerate() {
            if link_names.contains(&link.name) {
                return Err(SimError::invalid_model(format!(
                    "duplicate link name '{}'",
                    link.name
                )));
            }

            let parent = match (index, link.parent) {
                (0, None) => None,
                (0, Some(_)) => {
                    return Err(SimError::invalid_model(format!(
                        "root link '{}' cannot have a parent",
                        link.name
                    )))
                }
                (_, None) => {
                    return Err(SimError::invalid_model(format!(
                        "link '{}' has no parent",
                        link.name
                    )))
                }
                (_, Some(parent)) if parent.index() >= index => {
                    return Err(SimError::invalid_model(format!(
                        "link '{}' must come after its parent {parent}",
                        link.name
                    )))
                }
                (_, Some(parent)) => Some(parent.index()),
            };

            if !(link.mass.is_finite() && link.mass >= 0.0) {
                return Err(SimError::invalid_model(format!(
                    "link '{}' has invalid mass {}",
                    link.name, link.mass
                )));
            }

            let movable = parent.is_some() && link.joint.joint_type != JointType::Fixed;
            let axis = if movable {
                Unit::try_new(link.joint.axis, 1e-12).ok_or_else(|| {
                    SimError::invalid_model(format!(
                        "joint of link '{}' has a degenerate axis",
                        link.name
                    ))
                })?
            } else {
                Vector3::z_axis()
            };

            let dof = movable.then(|| {
                dofs += 1;
                dofs - 1
            });

            link_names.push(link.name);
            links.push(Link {
                parent,
                joint: link.joint,
                axis,
                dof,
                mass: link.mass,
                center_of_mass: link.center_of_mass,
            });
        }

        if let Some(point) = collidable_points
            .iter()
            .find(|p| p.link.index() >= links.len())
        {
            return Err(SimError::invalid_model(format!(
                "collidable point references missing {}",
                point.link
            )));
        }

        let total_mass = links.iter().map(|l| l.mass).sum();

        debug!(
            model = %name,
            links = links.len(),
            dofs,
            points = collidable_points.len(),
            floating_base,
            "built kinematic tree"
        );

        Ok(Self {
            name,
            floating_base,
            link_names,
            links,
            collidable_points,
            dofs,
            total_mass,
        })
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent of `link`, `None` for the root or an unknown id.
    #[must_use]
    pub fn parent(&self, link: LinkId) -> Option<LinkId> {
        self.links
            .get(link.index())
            .and_then(|l| l.parent)
            .map(LinkId::new)
    }

    /// Root pose and mixed velocity.
    fn root_kinematics(&self, state: &MechanismState) -> LinkKinematics {
        let pose = state.base_pose;
        if !self.floating_base {
            return LinkKinematics {
                pose,
                velocity: Twist::zero(),
            };
        }
        let mixed = convert(
            &state.base_velocity.to_vector(),
            VelocityRepresentation::Inertial,
            VelocityRepresentation::Mixed,
            &pose,
            false,
        );
        LinkKinematics {
            pose,
            velocity: Twist::from_vector(&mixed),
        }
    }

    /// Forward pass; velocities are skipped when `with_velocity` is false.
    fn forward(&self, state: &MechanismState, with_velocity: bool) -> Result<Vec<LinkKinematics>> {
        state.check_dofs(self.dofs)?;

        let mut out: Vec<LinkKinematics> = Vec::with_capacity(self.links.len());
        out.push(self.root_kinematics(state));

        for link in self.links.iter().skip(1) {
            let Some(parent) = link.parent.and_then(|p| out.get(p).copied()) else {
                // Parents are validated to precede their children.
                return Err(SimError::invalid_model("link parent out of order"));
            };

            let (q, qd) = link.dof.map_or((0.0, 0.0), |i| {
                (state.joint_positions[i], state.joint_velocities[i])
            });

            let motion = match link.joint.joint_type {
                JointType::Fixed => Pose::identity(),
                JointType::Revolute => Pose::from_position_rotation(
                    Point3::origin(),
                    UnitQuaternion::from_axis_angle(&link.axis, q),
                ),
                JointType::Prismatic => Pose::from_position(Point3::from(link.axis.into_inner() * q)),
            };
            let joint_frame = parent.pose.compose(&link.joint.origin);
            let pose = joint_frame.compose(&motion);

            let velocity = if with_velocity {
                let world_axis = joint_frame.transform_vector(&link.axis.into_inner());
                let lever = pose.position - parent.pose.position;
                let mut linear = parent.velocity.velocity_at_point(&lever);
                let mut angular = parent.velocity.angular;
                match link.joint.joint_type {
                    JointType::Fixed => {}
                    JointType::Revolute => angular += world_axis * qd,
                    JointType::Prismatic => linear += world_axis * qd,
                }
                Twist::new(linear, angular)
            } else {
                Twist::zero()
            };

            out.push(LinkKinematics { pose, velocity });
        }

        Ok(out)
    }
}

impl KinematicsProvider for KinematicTree {
    fn link_names(&self) -> &[String] {
        &self.link_names
    }

    fn collidable_points(&self) -> &[CollidablePoint] {
        &self.collidable_points
    }

    fn dofs(&self) -> usize {
        self.dofs
    }

    fn is_floating_base(&self) -> bool {
        self.floating_base
    }

    fn link_kinematics(&self, state: &MechanismState) -> Result<Vec<LinkKinematics>> {
        self.forward(state, true)
    }
}

impl MassPropertiesProvider for KinematicTree {
    fn total_mass(&self) -> f64 {
        self.total_mass
    }

    fn center_of_mass(&self, state: &MechanismState) -> Result<Point3<f64>> {
        let kinematics = self.forward(state, false)?;
        if self.total_mass <= 0.0 {
            return Err(SimError::invalid_model(format!(
                "model '{}' has no mass",
                self.name
            )));
        }

        let weighted = self
            .links
            .iter()
            .zip(&kinematics)
            .map(|(link, k)| {
                k.pose
                    .transform_point(&Point3::from(link.center_of_mass))
                    .coords
                    * link.mass
            })
            .sum::<Vector3<f64>>();

        Ok(Point3::from(weighted / self.total_mass))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::LinkDescription;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    /// Base with a revolute arm of length 1 about Y, and a fixed tip.
    fn arm(floating: bool) -> KinematicTree {
        let mut desc = ModelDescription::new("arm").with_floating_base(floating);
        let base = desc.add_link(LinkDescription::root("base", 2.0));
        let upper = desc.add_link(
            LinkDescription::child(
                "upper",
                base,
                JointDescription::revolute(
                    Pose::from_position(Point3::new(0.0, 0.0, 1.0)),
                    Vector3::y(),
                ),
                1.0,
            )
            .with_center_of_mass(Vector3::new(0.5, 0.0, 0.0)),
        );
        let tip = desc.add_link(LinkDescription::child(
            "tip",
            upper,
            JointDescription::fixed(Pose::from_position(Point3::new(1.0, 0.0, 0.0))),
            0.0,
        ));
        desc.add_collidable_point(tip, Vector3::zeros());
        KinematicTree::new(desc).unwrap()
    }

    #[test]
    fn test_counts() {
        let tree = arm(false);
        assert_eq!(tree.dofs(), 1);
        assert_eq!(tree.number_of_links(), 3);
        assert_eq!(tree.link_index("tip"), Some(LinkId::new(2)));
        assert_eq!(tree.link_index("nope"), None);
        assert_eq!(tree.parent(LinkId::new(2)), Some(LinkId::new(1)));
        assert_eq!(tree.parent(LinkId::new(0)), None);
        assert_relative_eq!(tree.total_mass(), 3.0);
    }

    #[test]
    fn test_revolute_forward_kinematics() {
        let tree = arm(false);
        let mut state = MechanismState::zero(1);
        // Rotating +X about +Y by 90° points it at -Z.
        state.joint_positions[0] = FRAC_PI_2;
        state.joint_velocities[0] = 2.0;

        let links = tree.link_kinematics(&state).unwrap();
        assert_relative_eq!(links[2].pose.position, Point3::new(0.0, 0.0, 0.0), epsilon = 1e-12);

        // ω = 2ŷ, lever from the joint to the tip = -ẑ: v = ω × r = (-2, 0, 0).
        assert_relative_eq!(links[1].velocity.angular, Vector3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(links[2].velocity.linear, Vector3::new(-2.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let tree = arm(true);
        let base_pose = Pose::from_position_rotation(
            Point3::new(0.1, -0.2, 0.3),
            UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3),
        );
        let mixed = Twist::new(Vector3::new(0.3, -0.1, 0.2), Vector3::new(0.0, 0.0, 0.7));
        let inertial = convert(
            &mixed.to_vector(),
            VelocityRepresentation::Mixed,
            VelocityRepresentation::Inertial,
            &base_pose,
            false,
        );
        let mut state = MechanismState::zero(1)
            .with_base_pose(base_pose)
            .with_base_velocity(Twist::from_vector(&inertial));
        state.joint_positions[0] = 0.4;
        state.joint_velocities[0] = -1.5;

        let dt = 1e-7;
        let mut next = state.clone();
        next.joint_positions[0] += dt * state.joint_velocities[0];
        next.base_pose = Pose::from_position_rotation(
            base_pose.position + mixed.linear * dt,
            UnitQuaternion::from_scaled_axis(mixed.angular * dt) * base_pose.rotation,
        );

        let now = tree.link_kinematics(&state).unwrap();
        let later = tree.link_kinematics(&next).unwrap();
        for (a, b) in now.iter().zip(&later) {
            let fd = (b.pose.position - a.pose.position) / dt;
            assert_relative_eq!(a.velocity.linear, fd, epsilon = 1e-5);
        }
        assert_relative_eq!(now[0].velocity.linear, mixed.linear, epsilon = 1e-12);
    }

    #[test]
    fn test_fixed_base_ignores_base_velocity() {
        let tree = arm(false);
        let state = MechanismState::zero(1).with_base_velocity(Twist::linear(Vector3::x()));
        let links = tree.link_kinematics(&state).unwrap();
        assert!(links.iter().all(|l| l.velocity == Twist::zero()));
    }

    #[test]
    fn test_center_of_mass() {
        let tree = arm(false);
        let com = tree.center_of_mass(&MechanismState::zero(1)).unwrap();
        // (2·(0,0,0) + 1·(0.5,0,1)) / 3
        assert_relative_eq!(com, Point3::new(0.5 / 3.0, 0.0, 1.0 / 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_joint_vector_shape() {
        let tree = arm(false);
        let err = tree.link_kinematics(&MechanismState::zero(3)).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_prismatic() {
        let mut desc = ModelDescription::new("lift");
        let base = desc.add_link(LinkDescription::root("base", 1.0));
        desc.add_link(LinkDescription::child(
            "stage",
            base,
            JointDescription::prismatic(Pose::identity(), Vector3::new(0.0, 0.0, 2.0)),
            1.0,
        ));
        let tree = KinematicTree::new(desc).unwrap();
        let mut state = MechanismState::zero(1);
        state.joint_positions[0] = 0.25;
        state.joint_velocities[0] = -1.0;
        let links = tree.link_kinematics(&state).unwrap();
        // Axis is normalized.
        assert_relative_eq!(links[1].pose.position, Point3::new(0.0, 0.0, 0.25), epsilon = 1e-12);
        assert_relative_eq!(links[1].velocity.linear, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_descriptions() {
        let empty = ModelDescription::new("empty");
        assert!(KinematicTree::new(empty).unwrap_err().is_invalid_model());

        let mut dup = ModelDescription::new("dup");
        let base = dup.add_link(LinkDescription::root("a", 1.0));
        dup.add_link(LinkDescription::child("a", base, JointDescription::default(), 1.0));
        assert!(KinematicTree::new(dup).unwrap_err().is_invalid_model());

        let mut order = ModelDescription::new("order");
        order.add_link(LinkDescription::root("a", 1.0));
        order.add_link(LinkDescription::child("b", LinkId::new(1), JointDescription::default(), 1.0));
        assert!(KinematicTree::new(order).unwrap_err().is_invalid_model());

        let mut axis = ModelDescription::new("axis");
        let base = axis.add_link(LinkDescription::root("a", 1.0));
        axis.add_link(LinkDescription::child(
            "b",
            base,
            JointDescription::revolute(Pose::identity(), Vector3::zeros()),
            1.0,
        ));
        assert!(KinematicTree::new(axis).unwrap_err().is_invalid_model());

        let mut mass = ModelDescription::new("mass");
        mass.add_link(LinkDescription::root("a", -1.0));
        assert!(KinematicTree::new(mass).unwrap_err().is_invalid_model());

        let mut point = ModelDescription::new("point");
        point.add_link(LinkDescription::root("a", 1.0));
        point.add_collidable_point(LinkId::new(4), Vector3::zeros());
        assert!(KinematicTree::new(point).unwrap_err().is_invalid_model());
    }
}
