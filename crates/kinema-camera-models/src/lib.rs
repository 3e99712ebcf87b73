//! Camera calibration models with validity-aware projection.
//!
//! Every projection and back-projection returns a [`Validated`] value: the
//! numeric result is always produced, and a multiplicative validity factor
//! (1 = usable, 0 = not usable) marks degenerate geometry instead of an error.
//! This keeps the operations total and branch-free for an optimizer.
//!
//! # Key Components
//!
//! - **`CameraCal` trait**: interface shared by all calibration models
//! - **`Camera`**: calibration plus optional image bounds
//! - **`PosedCamera`**: camera plus its pose in the world frame
//!
//! # Available Calibration Models
//!
//! - **Linear**: pinhole projection without distortion
//! - **ATAN**: single-parameter field-of-view fisheye model

use kinema_manifolds::StorageOps;
use nalgebra::{RealField, Vector2, Vector3};
use std::fmt::Debug;

pub mod atan;
pub mod camera;
pub mod linear;
pub mod posed_camera;

pub use atan::ATANCameraCal;
pub use camera::Camera;
pub use linear::LinearCameraCal;
pub use posed_camera::PosedCamera;

/// Tolerance for projection/back-projection test assertions (pixels).
pub const PROJECTION_TEST_TOLERANCE: f64 = 1e-8;

/// Camera model errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraModelError {
    #[error("Focal length must be positive")]
    FocalLengthMustBePositive,
    #[error("Principal point must be finite")]
    PrincipalPointMustBeFinite,
    #[error("Invalid camera parameters: {0}")]
    InvalidParams(String),
}

/// A numeric result paired with a multiplicative validity factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Validated<V, T> {
    pub value: V,
    /// 1 when `value` is usable, 0 when it is not
    pub validity: T,
}

impl<V, T: RealField + Copy> Validated<V, T> {
    #[inline]
    pub fn new(value: V, validity: T) -> Self {
        Validated { value, validity }
    }

    /// Result that is usable unconditionally.
    #[inline]
    pub fn valid(value: V) -> Self {
        Validated::new(value, T::one())
    }

    pub fn is_valid(&self) -> bool {
        self.validity > T::zero()
    }

    /// Multiply the validity by another factor.
    #[inline]
    pub fn gated(self, factor: T) -> Self {
        Validated::new(self.value, self.validity * factor)
    }

    /// Discard the validity.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

/// Interface for camera calibration models.
///
/// A calibration maps 3D points in the camera frame to pixels and pixels back
/// to (not normalized) rays. The camera looks down +z.
pub trait CameraCal: StorageOps + Clone + Debug {
    /// Focal length `(fx, fy)` in pixels.
    fn focal_length(&self) -> Vector2<Self::Scalar>;

    /// Principal point `(cx, cy)` in pixels.
    fn principal_point(&self) -> Vector2<Self::Scalar>;

    /// Project a 3D point in the camera frame into pixel coordinates.
    ///
    /// Invalid when the point is not in front of the camera (`z ≤ epsilon`).
    fn pixel_from_camera_point(
        &self,
        point: &Vector3<Self::Scalar>,
        epsilon: Self::Scalar,
    ) -> Validated<Vector2<Self::Scalar>, Self::Scalar>;

    /// Back-project a pixel into a ray in the camera frame.
    ///
    /// The ray is not normalized; its z component is 1.
    fn camera_ray_from_pixel(
        &self,
        pixel: &Vector2<Self::Scalar>,
        epsilon: Self::Scalar,
    ) -> Validated<Vector3<Self::Scalar>, Self::Scalar>;

    /// Model name identifier.
    fn model_name(&self) -> &'static str;

    /// Checks the linear intrinsics.
    ///
    /// Never called implicitly: projection stays total for any parameters.
    fn validate_params(&self) -> Result<(), CameraModelError> {
        validate_linear_params(&self.focal_length(), &self.principal_point())
    }
}

/// Shared check for the `[fx, fy, cx, cy]` block.
pub fn validate_linear_params<T: RealField + Copy>(
    focal_length: &Vector2<T>,
    principal_point: &Vector2<T>,
) -> Result<(), CameraModelError> {
    if !(focal_length.x > T::zero() && focal_length.y > T::zero()) {
        return Err(CameraModelError::FocalLengthMustBePositive);
    }
    if !(principal_point.x.is_finite() && principal_point.y.is_finite()) {
        return Err(CameraModelError::PrincipalPointMustBeFinite);
    }
    Ok(())
}

/// Divide a camera-frame point by its depth.
///
/// The depth is bounded below by `epsilon`; validity is 1 iff `z > epsilon`.
pub fn unit_depth_from_camera_point<T: RealField + Copy>(
    point: &Vector3<T>,
    epsilon: T,
) -> Validated<Vector2<T>, T> {
    let depth = point.z.max(epsilon);
    let validity = if point.z > epsilon { T::one() } else { T::zero() };
    Validated::new(Vector2::new(point.x / depth, point.y / depth), validity)
}

/// Apply focal length and principal point to unit-depth coordinates.
#[inline]
pub fn pixel_from_unit_depth<T: RealField + Copy>(
    unit_depth: &Vector2<T>,
    focal_length: &Vector2<T>,
    principal_point: &Vector2<T>,
) -> Vector2<T> {
    unit_depth.component_mul(focal_length) + principal_point
}

/// Remove focal length and principal point from pixel coordinates.
#[inline]
pub fn unit_depth_from_pixel<T: RealField + Copy>(
    pixel: &Vector2<T>,
    focal_length: &Vector2<T>,
    principal_point: &Vector2<T>,
) -> Vector2<T> {
    (pixel - principal_point).component_div(focal_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_gating() {
        let result = Validated::valid(Vector2::new(1.0, 2.0));
        assert!(result.is_valid());
        let gated = result.gated(0.0);
        assert!(!gated.is_valid());
        assert_eq!(gated.into_value(), Vector2::new(1.0, 2.0));
    }

    #[test]
    fn test_unit_depth_validity() {
        let eps = 1e-12;
        let front = unit_depth_from_camera_point(&Vector3::new(2.0, 4.0, 2.0), eps);
        assert_eq!(front.validity, 1.0);
        assert_eq!(front.value, Vector2::new(1.0, 2.0));

        for z in [0.0, -1e-9, -1.0] {
            let behind = unit_depth_from_camera_point(&Vector3::new(1.0, 1.0, z), eps);
            assert_eq!(behind.validity, 0.0);
            assert!(behind.value.iter().all(|c: &f64| c.is_finite()));
        }
    }

    #[test]
    fn test_pixel_unit_depth_inverse() {
        let focal = Vector2::new(380.0, 400.0);
        let principal = Vector2::new(320.0, 240.0);
        let pixel = Vector2::new(100.0, 50.0);
        let unit = unit_depth_from_pixel(&pixel, &focal, &principal);
        let back = pixel_from_unit_depth(&unit, &focal, &principal);
        assert!((back - pixel).norm() < PROJECTION_TEST_TOLERANCE);
    }

    #[test]
    fn test_validate_linear_params() {
        let principal = Vector2::new(320.0, 240.0);
        assert!(validate_linear_params(&Vector2::new(1.0, 1.0), &principal).is_ok());
        assert_eq!(
            validate_linear_params(&Vector2::new(0.0, 1.0), &principal),
            Err(CameraModelError::FocalLengthMustBePositive)
        );
        assert_eq!(
            validate_linear_params(&Vector2::new(1.0, 1.0), &Vector2::new(f64::NAN, 0.0)),
            Err(CameraModelError::PrincipalPointMustBeFinite)
        );
    }
}
