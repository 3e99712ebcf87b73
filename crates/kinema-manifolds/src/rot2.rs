//! Rot2 - rotations in 2D
//!
//! Represented as a unit complex number `re + i·im = cos θ + i·sin θ`, stored as
//! `[re, im]`. The tangent space is the single rotation angle θ.

use crate::{GroupOps, LieGroupOps, StorageOps, assert_storage_len};
use nalgebra::{Complex, Matrix2, RealField, Vector1, Vector2};
use rand::Rng;
use simba::scalar::SupersetOf;

/// Rotation in 2D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rot2<T: RealField + Copy> {
    /// Unit complex number; trusted, never renormalized
    complex: Complex<T>,
}

impl<T: RealField + Copy> Rot2<T> {
    /// Create a Rot2 from a complex number assumed to have unit norm.
    #[inline]
    pub fn new(complex: Complex<T>) -> Self {
        Rot2 { complex }
    }

    /// Create a Rot2 from a rotation angle in radians.
    pub fn from_angle(angle: T) -> Self {
        Rot2::new(Complex::new(angle.cos(), angle.sin()))
    }

    /// Get the underlying complex number.
    #[inline]
    pub fn complex(&self) -> Complex<T> {
        self.complex
    }

    /// Storage as a vector `[re, im]`.
    #[inline]
    pub fn data(&self) -> Vector2<T> {
        Vector2::new(self.complex.re, self.complex.im)
    }

    /// Rotation angle in (-π, π].
    pub fn angle(&self) -> T {
        self.complex.im.atan2(self.complex.re)
    }

    /// Rotation matrix (2x2).
    pub fn to_rotation_matrix(&self) -> Matrix2<T> {
        let Complex { re, im } = self.complex;
        Matrix2::new(re, -im, im, re)
    }

    /// Rotate a 2D point.
    #[inline]
    pub fn act(&self, point: &Vector2<T>) -> Vector2<T> {
        let Complex { re, im } = self.complex;
        Vector2::new(re * point.x - im * point.y, im * point.x + re * point.y)
    }

    /// Convert to another scalar precision, component by component.
    pub fn cast<U>(&self) -> Rot2<U>
    where
        U: RealField + Copy + SupersetOf<T>,
    {
        Rot2::new(Complex::new(
            nalgebra::convert(self.complex.re),
            nalgebra::convert(self.complex.im),
        ))
    }

    /// Uniformly distributed random rotation.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let angle = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
        Rot2::from_angle(nalgebra::convert(angle))
    }
}

impl<T: RealField + Copy> StorageOps for Rot2<T> {
    type Scalar = T;
    const STORAGE_DIM: usize = 2;

    fn to_storage(&self) -> Vec<T> {
        vec![self.complex.re, self.complex.im]
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        Rot2::new(Complex::new(elements[0], elements[1]))
    }
}

impl<T: RealField + Copy> GroupOps for Rot2<T> {
    fn identity() -> Self {
        Rot2::new(Complex::new(T::one(), T::zero()))
    }

    /// Complex product.
    fn compose(&self, other: &Self) -> Self {
        let a = self.complex;
        let b = other.complex;
        Rot2::new(Complex::new(a.re * b.re - a.im * b.im, a.im * b.re + a.re * b.im))
    }

    /// Complex conjugate (exact for unit elements).
    fn inverse(&self) -> Self {
        Rot2::new(Complex::new(self.complex.re, -self.complex.im))
    }
}

impl<T: RealField + Copy> LieGroupOps for Rot2<T> {
    const TANGENT_DIM: usize = 1;
    type Tangent = Vector1<T>;

    /// Exponential map: θ ↦ cos θ + i·sin θ.
    ///
    /// No singularity, `epsilon` is unused.
    fn from_tangent(tangent: &Vector1<T>, _epsilon: T) -> Self {
        Rot2::from_angle(tangent[0])
    }

    /// Logarithm map: θ = atan2(im, re).
    ///
    /// `atan2` is finite everywhere (including the origin), `epsilon` is unused.
    fn to_tangent(&self, _epsilon: T) -> Vector1<T> {
        Vector1::new(self.angle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const TOLERANCE: f64 = 1e-12;
    const EPSILON: f64 = crate::DEFAULT_EPSILON_F64;

    #[test]
    fn test_rot2_identity() {
        let rot = Rot2::<f64>::identity();
        assert!(rot.angle().abs() < TOLERANCE);
        assert_eq!(rot.to_storage(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_rot2_compose_adds_angles() {
        let a = Rot2::from_angle(PI / 4.0);
        let b = Rot2::from_angle(PI / 2.0);
        let composed = a.compose(&b);
        assert!((composed.angle() - 3.0 * PI / 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_rot2_inverse() {
        let rot = Rot2::from_angle(0.3_f64);
        assert!((rot.inverse().angle() + 0.3).abs() < TOLERANCE);
        assert!(rot.compose(&rot.inverse()).is_approx(&Rot2::identity(), TOLERANCE));
    }

    #[test]
    fn test_rot2_tangent_round_trip() {
        for &angle in &[-3.0_f64, -1.0, 0.0, 1e-9, 0.4, 3.1] {
            let rot = Rot2::from_tangent(&Vector1::new(angle), EPSILON);
            let recovered = rot.to_tangent(EPSILON);
            assert!((recovered[0] - angle).abs() < TOLERANCE, "angle = {angle}");
        }
    }

    #[test]
    fn test_rot2_act_matches_matrix() {
        let rot = Rot2::from_angle(0.7_f64);
        let point = Vector2::new(1.5, -2.0);
        let via_matrix = rot.to_rotation_matrix() * point;
        assert!((rot.act(&point) - via_matrix).norm() < TOLERANCE);
    }

    #[test]
    fn test_rot2_storage_is_trusted() {
        let raw = [2.0, 0.0];
        let rot = Rot2::from_storage(&raw);
        assert_eq!(rot.to_storage(), raw.to_vec());
    }

    #[test]
    #[should_panic(expected = "storage requires 2 elements, got 3")]
    fn test_rot2_wrong_storage_length_panics() {
        let _rot = Rot2::from_storage(&[1.0, 0.0, 0.0]);
    }
}
