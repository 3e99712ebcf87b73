//! ATAN (field-of-view) camera calibration
//!
//! A fisheye model using a single field-of-view parameter ω for radial
//! distortion (Devernay and Faugeras).
//!
//! # Mathematical Model
//!
//! ## Projection (3D → 2D)
//!
//! ```text
//! p = (x/z, y/z)
//! r = √(|p|² + ε)
//! weight = atan(2·tan(ω/2)·r) / (r·ω)
//! pixel = f ⊙ (p · weight) + c
//! ```
//!
//! ## Back-projection (2D → 3D)
//!
//! ```text
//! d = (pixel − c) ⊘ f
//! rd = √(|d|² + ε)
//! weight = tan(rd·ω) / (2·rd·tan(ω/2))
//! ray = (d · weight, 1)
//! ```
//!
//! The back-projection is only meaningful while `|rd·ω| < π/2`; beyond that the
//! tangent wraps around and the pixel is reported invalid.
//!
//! # Parameters
//!
//! Storage is `[fx, fy, cx, cy, ω]`.

use crate::{
    CameraCal, CameraModelError, Validated, pixel_from_unit_depth, unit_depth_from_camera_point,
    unit_depth_from_pixel, validate_linear_params,
};
use kinema_manifolds::{StorageOps, assert_storage_len};
use nalgebra::{RealField, Vector2, Vector3};
use simba::scalar::SupersetOf;

/// ATAN calibration with 5 parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ATANCameraCal<T: RealField + Copy> {
    focal_length: Vector2<T>,
    principal_point: Vector2<T>,
    /// Field-of-view parameter ω
    omega: T,
}

impl<T: RealField + Copy> ATANCameraCal<T> {
    pub fn new(focal_length: Vector2<T>, principal_point: Vector2<T>, omega: T) -> Self {
        ATANCameraCal {
            focal_length,
            principal_point,
            omega,
        }
    }

    /// Distortion coefficient ω.
    #[inline]
    pub fn omega(&self) -> T {
        self.omega
    }

    /// Convert to another scalar precision, component by component.
    pub fn cast<U>(&self) -> ATANCameraCal<U>
    where
        U: RealField + Copy + SupersetOf<T>,
    {
        ATANCameraCal::new(
            self.focal_length.map(|c| nalgebra::convert::<T, U>(c)),
            self.principal_point.map(|c| nalgebra::convert::<T, U>(c)),
            nalgebra::convert(self.omega),
        )
    }
}

impl<T: RealField + Copy> StorageOps for ATANCameraCal<T> {
    type Scalar = T;
    const STORAGE_DIM: usize = 5;

    fn to_storage(&self) -> Vec<T> {
        vec![
            self.focal_length.x,
            self.focal_length.y,
            self.principal_point.x,
            self.principal_point.y,
            self.omega,
        ]
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        ATANCameraCal::new(
            Vector2::new(elements[0], elements[1]),
            Vector2::new(elements[2], elements[3]),
            elements[4],
        )
    }
}

impl<T: RealField + Copy> CameraCal for ATANCameraCal<T> {
    fn focal_length(&self) -> Vector2<T> {
        self.focal_length
    }

    fn principal_point(&self) -> Vector2<T> {
        self.principal_point
    }

    fn pixel_from_camera_point(&self, point: &Vector3<T>, epsilon: T) -> Validated<Vector2<T>, T> {
        let two: T = nalgebra::convert(2.0);
        let half: T = nalgebra::convert(0.5);
        let unit_depth = unit_depth_from_camera_point(point, epsilon);

        let radius = (unit_depth.value.norm_squared() + epsilon).sqrt();
        let mul2tanwby2 = two * (half * self.omega).tan();
        let weight = (mul2tanwby2 * radius).atan() / (radius * self.omega);

        Validated::new(
            pixel_from_unit_depth(
                &(unit_depth.value * weight),
                &self.focal_length,
                &self.principal_point,
            ),
            unit_depth.validity,
        )
    }

    fn camera_ray_from_pixel(&self, pixel: &Vector2<T>, epsilon: T) -> Validated<Vector3<T>, T> {
        let two: T = nalgebra::convert(2.0);
        let half: T = nalgebra::convert(0.5);
        let distorted = unit_depth_from_pixel(pixel, &self.focal_length, &self.principal_point);

        let distorted_radius = (distorted.norm_squared() + epsilon).sqrt();
        let angle = distorted_radius * self.omega;
        let weight = angle.tan() / (two * distorted_radius * (half * self.omega).tan());
        let validity = if angle.abs() < T::frac_pi_2() {
            T::one()
        } else {
            T::zero()
        };

        Validated::new((distorted * weight).push(T::one()), validity)
    }

    fn model_name(&self) -> &'static str {
        "atan"
    }

    /// Validation rules:
    /// - fx, fy must be positive
    /// - cx, cy must be finite
    /// - ω must be in (0, π]
    fn validate_params(&self) -> Result<(), CameraModelError> {
        validate_linear_params(&self.focal_length, &self.principal_point)?;

        if !self.omega.is_finite() || self.omega <= T::zero() || self.omega > T::pi() {
            return Err(CameraModelError::InvalidParams(
                "omega must be in (0, π]".to_string(),
            ));
        }

        Ok(())
    }
}
