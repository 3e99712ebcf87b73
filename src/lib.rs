//! # Kinema
//!
//! Differentiable parameterizations of rigid-body transforms and camera
//! projection models, meant to sit underneath a gradient-based estimator
//! (bundle adjustment, SLAM, calibration).
//!
//! ## Features
//!
//! - **Lie groups**: `Rot2`, `Rot3`, `Pose2`, `Pose3` and fixed-size vectors with
//!   storage, group and Lie-group operations
//! - **Explicit epsilon**: every singular map takes its guard as an argument
//! - **Camera models**: linear and ATAN calibrations with validity-aware
//!   projection and back-projection, image-bounds gating and posed cameras
//! - **Generic precision**: everything works in `f32` and `f64`

// Re-export workspace crates
pub use kinema_camera_models;
pub use kinema_manifolds;

pub mod manifold {
    pub use kinema_manifolds::*;
}

pub mod camera_models {
    pub use kinema_camera_models::*;
}

pub use kinema_camera_models::{
    ATANCameraCal, Camera, CameraCal, CameraModelError, LinearCameraCal, PosedCamera, Validated,
};
pub use kinema_manifolds::{
    GroupOps, LieGroupOps, ManifoldError, Pose2, Pose3, Rot2, Rot3, StorageOps, default_epsilon,
};

pub mod error;
pub mod logger;

pub use error::{KinemaError, KinemaResult};
pub use logger::{env_filter, init_logger, init_logger_with_level};
