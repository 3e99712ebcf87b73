//! Linear (pinhole) camera calibration
//!
//! Standard perspective projection without lens distortion.
//!
//! ```text
//! u = fx · x/z + cx
//! v = fy · y/z + cy
//! ```
//!
//! Storage is `[fx, fy, cx, cy]`.

use crate::{
    CameraCal, Validated, pixel_from_unit_depth, unit_depth_from_camera_point,
    unit_depth_from_pixel,
};
use kinema_manifolds::{StorageOps, assert_storage_len};
use nalgebra::{RealField, Vector2, Vector3};
use simba::scalar::SupersetOf;

/// Pinhole calibration with 4 parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearCameraCal<T: RealField + Copy> {
    focal_length: Vector2<T>,
    principal_point: Vector2<T>,
}

impl<T: RealField + Copy> LinearCameraCal<T> {
    pub fn new(focal_length: Vector2<T>, principal_point: Vector2<T>) -> Self {
        LinearCameraCal {
            focal_length,
            principal_point,
        }
    }

    /// Convert to another scalar precision, component by component.
    pub fn cast<U>(&self) -> LinearCameraCal<U>
    where
        U: RealField + Copy + SupersetOf<T>,
    {
        LinearCameraCal::new(
            self.focal_length.map(|c| nalgebra::convert::<T, U>(c)),
            self.principal_point.map(|c| nalgebra::convert::<T, U>(c)),
        )
    }
}

impl<T: RealField + Copy> StorageOps for LinearCameraCal<T> {
    type Scalar = T;
    const STORAGE_DIM: usize = 4;

    fn to_storage(&self) -> Vec<T> {
        vec![
            self.focal_length.x,
            self.focal_length.y,
            self.principal_point.x,
            self.principal_point.y,
        ]
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        LinearCameraCal::new(
            Vector2::new(elements[0], elements[1]),
            Vector2::new(elements[2], elements[3]),
        )
    }
}

impl<T: RealField + Copy> CameraCal for LinearCameraCal<T> {
    fn focal_length(&self) -> Vector2<T> {
        self.focal_length
    }

    fn principal_point(&self) -> Vector2<T> {
        self.principal_point
    }

    fn pixel_from_camera_point(&self, point: &Vector3<T>, epsilon: T) -> Validated<Vector2<T>, T> {
        let unit_depth = unit_depth_from_camera_point(point, epsilon);
        Validated::new(
            pixel_from_unit_depth(&unit_depth.value, &self.focal_length, &self.principal_point),
            unit_depth.validity,
        )
    }

    /// Always valid: every pixel has a ray.
    fn camera_ray_from_pixel(&self, pixel: &Vector2<T>, _epsilon: T) -> Validated<Vector3<T>, T> {
        let unit_depth = unit_depth_from_pixel(pixel, &self.focal_length, &self.principal_point);
        Validated::valid(unit_depth.push(T::one()))
    }

    fn model_name(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROJECTION_TEST_TOLERANCE;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const EPSILON: f64 = kinema_manifolds::DEFAULT_EPSILON_F64;

    fn calibration() -> LinearCameraCal<f64> {
        LinearCameraCal::new(Vector2::new(380.0, 400.0), Vector2::new(320.0, 240.0))
    }

    #[test]
    fn test_linear_projection_at_optical_axis() {
        let pixel = calibration().pixel_from_camera_point(&Vector3::new(0.0, 0.0, 2.0), EPSILON);
        assert!(pixel.is_valid());
        assert!((pixel.value - Vector2::new(320.0, 240.0)).norm() < PROJECTION_TEST_TOLERANCE);
    }

    #[test]
    fn test_linear_round_trip() -> TestResult {
        let cal = calibration();
        cal.validate_params()?;
        let point = Vector3::new(0.3, -0.2, 1.5);
        let pixel = cal.pixel_from_camera_point(&point, EPSILON);
        let ray = cal.camera_ray_from_pixel(&pixel.value, EPSILON);
        assert!(ray.is_valid());
        assert!((ray.value * point.z - point).norm() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_linear_point_behind_camera_is_invalid() {
        let pixel = calibration().pixel_from_camera_point(&Vector3::new(0.1, 0.1, -1.0), EPSILON);
        assert_eq!(pixel.validity, 0.0);
    }

    #[test]
    fn test_linear_storage_layout() {
        let cal = calibration();
        assert_eq!(cal.to_storage(), vec![380.0, 400.0, 320.0, 240.0]);
        assert_eq!(LinearCameraCal::from_storage(&cal.to_storage()), cal);
    }
}
