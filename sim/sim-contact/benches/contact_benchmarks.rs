//! Benchmarks for batched soft contact evaluation.
//!
//! Run with: cargo bench -p sim-contact
//!
//! Compare `--no-default-features` to measure the sequential path.

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::{Point2, Point3, Vector3};

use sim_contact::{
    collidable_point_dynamics, ModelData, SoftContacts, SoftContactsParams,
};
use sim_model::{LinkDescription, Model, ModelDescription};
use sim_terrain::{HeightField, Terrain};
use sim_types::{CollidablePoint, LinkId, MechanismState, Pose, VelocityRepresentation};

/// Rough terrain over a 20 m square.
fn rough_terrain() -> Terrain {
    HeightField::from_fn(64, 64, 20.0 / 63.0, Point2::new(-10.0, -10.0), |x, y| {
        0.05 * (0.7 * x).sin() * (1.3 * y).cos()
    })
    .unwrap()
    .into()
}

/// Points scattered around the ground plane, half of them penetrating.
#[allow(clippy::type_complexity, clippy::cast_precision_loss)]
fn scattered(
    n: usize,
) -> (
    Vec<CollidablePoint>,
    Vec<Point3<f64>>,
    Vec<Vector3<f64>>,
    Vec<Vector3<f64>>,
) {
    let points = vec![CollidablePoint::new(LinkId::new(0), Vector3::zeros()); n];
    let positions = (0..n)
        .map(|i| {
            let t = i as f64;
            Point3::new((0.37 * t).sin() * 9.0, (0.11 * t).cos() * 9.0, 0.02 * (t * 0.5).sin())
        })
        .collect();
    let velocities = (0..n)
        .map(|i| Vector3::new(0.1, -0.05, if i % 2 == 0 { -0.2 } else { 0.1 }))
        .collect();
    let deformation = vec![Vector3::new(1e-4, -2e-4, 0.0); n];
    (points, positions, velocities, deformation)
}

fn bench_force_law(c: &mut Criterion) {
    let mut group = c.benchmark_group("soft_contact_batch");
    let terrain = rough_terrain();
    let contacts = SoftContacts::new(SoftContactsParams::default(), &terrain);

    for n in [64, 1_024, 16_384] {
        let (points, positions, velocities, deformation) = scattered(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("evaluate_batch", n), &n, |b, _| {
            b.iter(|| {
                black_box(
                    contacts
                        .evaluate_batch(&points, &positions, &velocities, &deformation)
                        .unwrap(),
                )
            });
        });
    }

    group.finish();
}

fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("collidable_point_dynamics");

    for size in [2_u32, 8, 32] {
        // A floating plate covered with a size × size grid of points.
        let mut desc = ModelDescription::new("plate").with_floating_base(true);
        let plate = desc.add_link(LinkDescription::root("plate", 10.0));
        for i in 0..size {
            for j in 0..size {
                let x = f64::from(i) / f64::from(size) - 0.5;
                let y = f64::from(j) / f64::from(size) - 0.5;
                desc.add_collidable_point(plate, Vector3::new(x, y, 0.0));
            }
        }
        let model = Model::new(desc, rough_terrain()).unwrap();
        let state = MechanismState::zero(0).with_base_pose(Pose::from_position(Point3::new(
            0.0, 0.0, 0.01,
        )));
        let data = ModelData::build(
            &model,
            state,
            VelocityRepresentation::Mixed,
            None,
            SoftContactsParams::default(),
        )
        .unwrap();

        let points = u64::from(size * size);
        group.throughput(Throughput::Elements(points));
        group.bench_with_input(BenchmarkId::new("plate", points), &data, |b, data| {
            b.iter(|| black_box(collidable_point_dynamics(&model, data).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_force_law, bench_dynamics);
criterion_main!(benches);
