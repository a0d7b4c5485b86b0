//! Property-based tests for velocity representation conversions.
//!
//! Run with: cargo test -p sim-types -- proptest

use nalgebra::{Point3, UnitQuaternion, Vector6};
use proptest::prelude::*;
use sim_types::{convert, Pose, VelocityRepresentation};

// =============================================================================
// Strategies
// =============================================================================

fn arb_representation() -> impl Strategy<Value = VelocityRepresentation> {
    prop_oneof![
        Just(VelocityRepresentation::Inertial),
        Just(VelocityRepresentation::Body),
        Just(VelocityRepresentation::Mixed),
    ]
}

fn arb_pose() -> impl Strategy<Value = Pose> {
    (
        prop::array::uniform3(-10.0..10.0f64),
        prop::array::uniform3(-3.0..3.0f64),
    )
        .prop_map(|([x, y, z], [roll, pitch, yaw])| {
            Pose::from_position_rotation(
                Point3::new(x, y, z),
                UnitQuaternion::from_euler_angles(roll, pitch, yaw),
            )
        })
}

fn arb_vector() -> impl Strategy<Value = Vector6<f64>> {
    prop::array::uniform6(-10.0..10.0f64).prop_map(|v| Vector6::from_column_slice(&v))
}

fn close(a: &Vector6<f64>, b: &Vector6<f64>) -> bool {
    (a - b).norm() <= 1e-9 * (1.0 + b.norm())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Converting there and back is the identity.
    #[test]
    fn round_trip_is_identity(
        v in arb_vector(),
        base in arb_pose(),
        from in arb_representation(),
        to in arb_representation(),
        is_force in any::<bool>(),
    ) {
        let there = convert(&v, from, to, &base, is_force);
        let back = convert(&there, to, from, &base, is_force);
        prop_assert!(close(&back, &v), "{:?} -> {:?}: {} vs {}", from, to, back, v);
    }

    /// Converting through an intermediate representation changes nothing.
    #[test]
    fn conversions_compose(
        v in arb_vector(),
        base in arb_pose(),
        a in arb_representation(),
        b in arb_representation(),
        c in arb_representation(),
    ) {
        let direct = convert(&v, a, c, &base, false);
        let hop = convert(&convert(&v, a, b, &base, false), b, c, &base, false);
        prop_assert!(close(&hop, &direct));
    }

    /// Power `f · v` does not depend on the representation.
    #[test]
    fn power_is_invariant(
        f in arb_vector(),
        v in arb_vector(),
        base in arb_pose(),
        to in arb_representation(),
    ) {
        let power = f.dot(&v);
        let f_to = convert(&f, VelocityRepresentation::Inertial, to, &base, true);
        let v_to = convert(&v, VelocityRepresentation::Inertial, to, &base, false);
        prop_assert!((f_to.dot(&v_to) - power).abs() <= 1e-8 * (1.0 + f.norm() * v.norm()));
    }
}
