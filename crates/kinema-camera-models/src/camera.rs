//! Camera with optional image bounds.
//!
//! Wraps a calibration and gates every projection and back-projection with an
//! in-view check when the image size is known. A size with any non-positive
//! component (the `(-1, -1)` sentinel) disables the check.

use crate::{CameraCal, Validated};
use nalgebra::{RealField, Vector2, Vector3};

/// Calibration plus image size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera<C> {
    calibration: C,
    image_size: Vector2<i32>,
}

impl<C: CameraCal> Camera<C> {
    pub fn new(calibration: C, image_size: Vector2<i32>) -> Self {
        Camera {
            calibration,
            image_size,
        }
    }

    /// Camera without image bounds.
    pub fn unbounded(calibration: C) -> Self {
        Camera::new(calibration, Vector2::new(-1, -1))
    }

    #[inline]
    pub fn calibration(&self) -> &C {
        &self.calibration
    }

    #[inline]
    pub fn image_size(&self) -> Vector2<i32> {
        self.image_size
    }

    /// Project a 3D point in the camera frame into pixel coordinates.
    pub fn pixel_from_camera_point(
        &self,
        point: &Vector3<C::Scalar>,
        epsilon: C::Scalar,
    ) -> Validated<Vector2<C::Scalar>, C::Scalar> {
        let pixel = self.calibration.pixel_from_camera_point(point, epsilon);
        let in_view = self.maybe_check_in_view(&pixel.value);
        pixel.gated(in_view)
    }

    /// Back-project a pixel into a (not normalized) ray in the camera frame.
    ///
    /// Pixels outside the image bounds are reported invalid.
    pub fn camera_ray_from_pixel(
        &self,
        pixel: &Vector2<C::Scalar>,
        epsilon: C::Scalar,
    ) -> Validated<Vector3<C::Scalar>, C::Scalar> {
        self.calibration
            .camera_ray_from_pixel(pixel, epsilon)
            .gated(self.maybe_check_in_view(pixel))
    }

    /// 1 when the image size is unbounded, otherwise [`Camera::in_view`].
    pub fn maybe_check_in_view(&self, pixel: &Vector2<C::Scalar>) -> C::Scalar {
        if self.image_size.x <= 0 || self.image_size.y <= 0 {
            return nalgebra::one::<C::Scalar>();
        }
        Self::in_view(pixel, &self.image_size)
    }

    /// 1 if `0 ≤ x ≤ w − 1` and `0 ≤ y ≤ h − 1`, else 0.
    pub fn in_view(pixel: &Vector2<C::Scalar>, image_size: &Vector2<i32>) -> C::Scalar {
        let zero = nalgebra::zero::<C::Scalar>();
        let x_max: C::Scalar = nalgebra::convert(f64::from(image_size.x.saturating_sub(1)));
        let y_max: C::Scalar = nalgebra::convert(f64::from(image_size.y.saturating_sub(1)));
        let x_in_view = pixel.x >= zero && pixel.x <= x_max;
        let y_in_view = pixel.y >= zero && pixel.y <= y_max;
        if x_in_view && y_in_view {
            nalgebra::one::<C::Scalar>()
        } else {
            zero
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ATANCameraCal, LinearCameraCal};

    const EPSILON: f64 = kinema_manifolds::DEFAULT_EPSILON_F64;

    fn linear() -> LinearCameraCal<f64> {
        LinearCameraCal::new(Vector2::new(100.0, 100.0), Vector2::new(320.0, 240.0))
    }

    #[test]
    fn test_in_view_bounds() {
        let size = Vector2::new(640, 480);
        assert_eq!(Camera::<LinearCameraCal<f64>>::in_view(&Vector2::new(700.0, 10.0), &size), 0.0);
        assert_eq!(Camera::<LinearCameraCal<f64>>::in_view(&Vector2::new(639.0, 0.0), &size), 1.0);
        assert_eq!(Camera::<LinearCameraCal<f64>>::in_view(&Vector2::new(639.5, 0.0), &size), 0.0);
        assert_eq!(Camera::<LinearCameraCal<f64>>::in_view(&Vector2::new(0.0, -0.1), &size), 0.0);
    }

    #[test]
    fn test_in_view_extreme_size_does_not_overflow() {
        let size = Vector2::new(i32::MIN, i32::MIN);
        assert_eq!(Camera::<LinearCameraCal<f64>>::in_view(&Vector2::new(0.0, 0.0), &size), 0.0);

        let size = Vector2::new(i32::MAX, 1);
        assert_eq!(Camera::<LinearCameraCal<f64>>::in_view(&Vector2::new(1e9, 0.0), &size), 1.0);
    }

    #[test]
    fn test_unbounded_camera_never_gates() {
        let camera = Camera::unbounded(linear());
        assert_eq!(camera.image_size(), Vector2::new(-1, -1));
        assert_eq!(camera.maybe_check_in_view(&Vector2::new(-1e6, 1e6)), 1.0);

        let ray = camera.camera_ray_from_pixel(&Vector2::new(-500.0, 9000.0), EPSILON);
        assert_eq!(ray.validity, 1.0);
    }

    #[test]
    fn test_projection_outside_image_is_invalid() {
        let camera = Camera::new(linear(), Vector2::new(640, 480));
        // lands at x = 820
        let outside = camera.pixel_from_camera_point(&Vector3::new(5.0, 0.0, 1.0), EPSILON);
        assert_eq!(outside.validity, 0.0);
        assert!((outside.value.x - 820.0).abs() < 1e-9);

        let inside = camera.pixel_from_camera_point(&Vector3::new(0.5, 0.5, 1.0), EPSILON);
        assert_eq!(inside.validity, 1.0);
    }

    #[test]
    fn test_gating_is_multiplicative() {
        let cal = ATANCameraCal::new(Vector2::new(380.0, 380.0), Vector2::new(320.0, 240.0), 0.35);
        let camera = Camera::new(cal, Vector2::new(640, 480));
        // in view but behind the camera
        let behind = camera.pixel_from_camera_point(&Vector3::new(0.0, 0.0, -1.0), EPSILON);
        assert_eq!(behind.validity, 0.0);
        assert_eq!(camera.calibration(), &cal);
    }
}
