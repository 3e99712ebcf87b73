//! Round-Trip Check Binary
//!
//! Samples random rotations, poses and ATAN calibrations and verifies the
//! algebraic properties an optimizer relies on: exact storage round trip,
//! group laws, `retract(a, local_coordinates(a, b)) ≈ b` and projection /
//! back-projection consistency.
//!
//! # Usage
//! ```bash
//! cargo run --release --bin roundtrip_check
//!
//! # Single precision with more samples:
//! cargo run --release --bin roundtrip_check -- --precision f32 --samples 10000
//!
//! # Reproduce a specific run:
//! cargo run --release --bin roundtrip_check -- --seed 42 --verbose
//! ```

use clap::{Parser, ValueEnum};
use kinema::manifold::{
    DEFAULT_EPSILON_F32, DEFAULT_EPSILON_F64, GROUP_LAW_TOLERANCE_F32, GROUP_LAW_TOLERANCE_F64,
};
use kinema::{
    ATANCameraCal, CameraCal, KinemaError, LieGroupOps, Pose2, Pose3, Rot2, Rot3, init_logger,
    init_logger_with_level,
};
use nalgebra::{RealField, Vector2, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fmt::Debug;
use std::time::Instant;
use tracing::{Level, debug, info, warn};

/// Scalar precision used for the sweep
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Precision {
    /// Single precision (f32)
    F32,
    /// Double precision (f64, default)
    #[default]
    F64,
}

/// Property sweep over the geometry types
#[derive(Parser)]
#[command(name = "roundtrip_check")]
#[command(about = "Randomized property checks for rotations, poses and camera models")]
struct Args {
    /// Number of random samples per type
    #[arg(short = 'n', long, default_value_t = 1000)]
    samples: usize,

    /// Seed for the random generator
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,

    /// Epsilon passed to every Lie-group and camera operation
    /// (defaults to ten machine epsilons of the chosen precision)
    #[arg(short = 'e', long)]
    epsilon: Option<f64>,

    /// Scalar precision
    #[arg(short = 'p', long, value_enum, default_value = "f64")]
    precision: Precision,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Settings shared by every sweep of one run.
struct SweepConfig<T> {
    samples: usize,
    epsilon: T,
    tolerance: T,
}

/// Number of failed samples per property.
#[derive(Debug, Default)]
struct SweepReport {
    storage: usize,
    group_laws: usize,
    tangent: usize,
}

impl SweepReport {
    fn total(&self) -> usize {
        self.storage + self.group_laws + self.tangent
    }
}

fn check_lie_group<G, F>(
    name: &str,
    config: &SweepConfig<G::Scalar>,
    rng: &mut StdRng,
    sample: F,
) -> SweepReport
where
    G: LieGroupOps + PartialEq + Debug,
    F: Fn(&mut StdRng) -> G,
{
    let mut report = SweepReport::default();
    let identity = G::identity();

    for index in 0..config.samples {
        let a = sample(rng);
        let b = sample(rng);
        let c = sample(rng);

        if G::from_storage(&a.to_storage()) != a {
            debug!("{name} sample {index}: storage round trip changed {a:?}");
            report.storage += 1;
        }

        let right_identity = a.compose(&identity).is_approx(&a, config.tolerance);
        let inverse = a.compose(&a.inverse()).is_approx(&identity, config.tolerance);
        let associative = a
            .compose(&b)
            .compose(&c)
            .is_approx(&a.compose(&b.compose(&c)), config.tolerance);
        if !(right_identity && inverse && associative) {
            debug!(
                "{name} sample {index}: right identity {right_identity}, inverse {inverse}, \
                 associativity {associative}"
            );
            report.group_laws += 1;
        }

        let delta = a.local_coordinates(&b, config.epsilon);
        if !a.retract(&delta, config.epsilon).is_approx(&b, config.tolerance) {
            debug!("{name} sample {index}: retract/local_coordinates mismatch for {a:?}, {b:?}");
            report.tangent += 1;
        }
    }

    report
}

fn random_atan_cal<T: RealField + Copy>(rng: &mut StdRng) -> ATANCameraCal<T> {
    let mut uniform = |low: f64, high: f64| -> T { nalgebra::convert(rng.gen_range(low..high)) };
    ATANCameraCal::new(
        Vector2::new(uniform(100.0, 1000.0), uniform(100.0, 1000.0)),
        Vector2::new(uniform(0.0, 1000.0), uniform(0.0, 1000.0)),
        uniform(0.1, 0.8),
    )
}

/// Projects random points in front of the camera and checks that the
/// back-projected ray is collinear with the original point.
fn check_camera<T: RealField + Copy>(config: &SweepConfig<T>, rng: &mut StdRng) -> usize {
    let mut failures = 0;
    for index in 0..config.samples {
        let cal = random_atan_cal::<T>(rng);
        let point = Vector3::new(
            nalgebra::convert(rng.gen_range(-1.0_f64..1.0)),
            nalgebra::convert(rng.gen_range(-1.0_f64..1.0)),
            nalgebra::convert(rng.gen_range(0.5_f64..2.0)),
        );

        let pixel = cal.pixel_from_camera_point(&point, config.epsilon);
        let ray = cal.camera_ray_from_pixel(&pixel.value, config.epsilon);
        let collinear = ray.value.cross(&point).norm()
            <= config.tolerance * ray.value.norm() * point.norm();
        if !(pixel.is_valid() && ray.is_valid() && collinear) {
            debug!("camera sample {index}: {cal:?} failed for point {point:?}");
            failures += 1;
        }
    }
    failures
}

fn run<T: RealField + Copy>(config: SweepConfig<T>, seed: u64) -> usize {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut failures = 0;

    let sweeps = [
        ("Rot2", check_lie_group("Rot2", &config, &mut rng, |r| Rot2::<T>::random(r))),
        ("Rot3", check_lie_group("Rot3", &config, &mut rng, |r| Rot3::<T>::random(r))),
        ("Pose2", check_lie_group("Pose2", &config, &mut rng, |r| Pose2::<T>::random(r))),
        ("Pose3", check_lie_group("Pose3", &config, &mut rng, |r| Pose3::<T>::random(r))),
    ];

    for (name, report) in &sweeps {
        if report.total() == 0 {
            info!("{name:<6} all {} samples passed", config.samples);
        } else {
            warn!(
                "{name:<6} failures: storage {}, group laws {}, tangent {}",
                report.storage, report.group_laws, report.tangent
            );
        }
        failures += report.total();
    }

    let camera_failures = check_camera(&config, &mut rng);
    if camera_failures == 0 {
        info!("{:<6} all {} samples passed", "ATAN", config.samples);
    } else {
        warn!("{:<6} failures: projection {camera_failures}", "ATAN");
    }

    failures + camera_failures
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.verbose {
        init_logger_with_level(Level::DEBUG)?;
    } else {
        init_logger()?;
    }

    if let Some(epsilon) = args.epsilon.filter(|e| !(*e > 0.0 && e.is_finite())) {
        return Err(KinemaError::InvalidInput(format!(
            "epsilon must be positive and finite, got {epsilon}"
        ))
        .into());
    }

    info!("KINEMA ROUND-TRIP CHECK");
    info!(
        "samples: {}, seed: {}, precision: {:?}",
        args.samples, args.seed, args.precision
    );

    let start = Instant::now();
    let failures = match args.precision {
        Precision::F64 => run(
            SweepConfig {
                samples: args.samples,
                epsilon: args.epsilon.unwrap_or(DEFAULT_EPSILON_F64),
                tolerance: GROUP_LAW_TOLERANCE_F64,
            },
            args.seed,
        ),
        Precision::F32 => run(
            SweepConfig {
                samples: args.samples,
                epsilon: args.epsilon.map_or(DEFAULT_EPSILON_F32, |e| e as f32),
                tolerance: GROUP_LAW_TOLERANCE_F32,
            },
            args.seed,
        ),
    };
    info!("finished in {:.2?}", start.elapsed());

    if failures > 0 {
        return Err(format!("{failures} samples failed").into());
    }
    Ok(())
}
