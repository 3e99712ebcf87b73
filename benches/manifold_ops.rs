//! Micro-benchmarks for the hot-path geometry operations
//!
//! ## Usage
//!
//! ```bash
//! cargo bench --bench manifold_ops
//! ```
//!
//! Covers the operations an optimizer calls once per residual evaluation:
//! exponential and logarithm maps, retraction and camera projection.

use criterion::{Criterion, criterion_group, criterion_main};
use kinema::manifold::DEFAULT_EPSILON_F64;
use kinema::{ATANCameraCal, Camera, CameraCal, LieGroupOps, Pose3, Rot3};
use nalgebra::{Vector2, Vector3, Vector6};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn lie_group_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let rot = Rot3::<f64>::random(&mut rng);
    let pose = Pose3::<f64>::random(&mut rng);
    let other = Pose3::<f64>::random(&mut rng);
    let rot_tangent = Vector3::new(0.1, -0.4, 0.25);
    let pose_tangent = Vector6::new(0.1, -0.4, 0.25, 1.0, -2.0, 0.5);

    c.bench_function("rot3_from_tangent", |b| {
        b.iter(|| Rot3::from_tangent(black_box(&rot_tangent), DEFAULT_EPSILON_F64))
    });
    c.bench_function("rot3_to_tangent", |b| {
        b.iter(|| black_box(&rot).to_tangent(DEFAULT_EPSILON_F64))
    });
    c.bench_function("pose3_from_tangent", |b| {
        b.iter(|| Pose3::from_tangent(black_box(&pose_tangent), DEFAULT_EPSILON_F64))
    });
    c.bench_function("pose3_retract", |b| {
        b.iter(|| black_box(&pose).retract(black_box(&pose_tangent), DEFAULT_EPSILON_F64))
    });
    c.bench_function("pose3_local_coordinates", |b| {
        b.iter(|| black_box(&pose).local_coordinates(black_box(&other), DEFAULT_EPSILON_F64))
    });
}

fn camera_benchmark(c: &mut Criterion) {
    let camera = Camera::new(
        ATANCameraCal::new(Vector2::new(380.0, 380.0), Vector2::new(320.0, 240.0), 0.35),
        Vector2::new(640, 480),
    );
    let point = Vector3::new(0.2, -0.1, 1.5);
    let pixel = Vector2::new(250.0, 300.0);

    c.bench_function("atan_pixel_from_camera_point", |b| {
        b.iter(|| camera.pixel_from_camera_point(black_box(&point), DEFAULT_EPSILON_F64))
    });
    c.bench_function("atan_camera_ray_from_pixel", |b| {
        b.iter(|| {
            camera
                .calibration()
                .camera_ray_from_pixel(black_box(&pixel), DEFAULT_EPSILON_F64)
        })
    });
}

criterion_group!(benches, lie_group_benchmark, camera_benchmark);
criterion_main!(benches);
