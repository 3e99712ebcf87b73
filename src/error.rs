//! Error types for the kinema library
//!
//! Member crates keep their own `thiserror` enums; this module folds them into
//! one error for binaries and callers that mix manifolds and cameras.

use kinema_camera_models::CameraModelError;
use kinema_manifolds::ManifoldError;
use thiserror::Error;

/// Main result type used throughout the kinema library
pub type KinemaResult<T> = Result<T, KinemaError>;

/// Main error type for the kinema library
#[derive(Debug, Clone, Error)]
pub enum KinemaError {
    /// Storage and Lie-group errors
    #[error("Manifold error: {0}")]
    Manifold(String),

    /// Camera calibration errors
    #[error("Camera model error: {0}")]
    CameraModel(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Subscriber installation failures
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<ManifoldError> for KinemaError {
    fn from(err: ManifoldError) -> Self {
        KinemaError::Manifold(err.to_string())
    }
}

impl From<CameraModelError> for KinemaError {
    fn from(err: CameraModelError) -> Self {
        KinemaError::CameraModel(err.to_string())
    }
}
