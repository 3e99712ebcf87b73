//! Rot3 - rotations in 3D
//!
//! Represented as a unit quaternion stored as `[qx, qy, qz, qw]`, which is also
//! the coordinate order of nalgebra's `Quaternion::coords`. The tangent space is
//! the axis-angle vector ω, with |ω| the rotation angle.
//!
//! # Numerical Conditioning
//!
//! Both maps divide by a quantity that vanishes at the identity:
//! - exp divides `sin(θ/2)` by θ, guarded by folding ε² into θ² before the root
//! - log divides by `sqrt(1 − w²)`, guarded by `max(ε, 1 − w²)`, and clamps the
//!   `acos` argument to `[ε − 1, 1 − ε]`
//!
//! The log does not flip quaternions into the w ≥ 0 hemisphere, so tangent
//! vectors of norm up to 2π survive a round trip. Near |ω| = π the rotation
//! itself is ambiguous and only the tangent norm is meaningful.

use crate::{GroupOps, LieGroupOps, StorageOps, assert_storage_len};
use nalgebra::{Matrix3, Quaternion, RealField, Vector3, Vector4};
use rand::Rng;
use simba::scalar::SupersetOf;

/// Rotation in 3D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rot3<T: RealField + Copy> {
    /// Unit quaternion; trusted, never renormalized
    quaternion: Quaternion<T>,
}

impl<T: RealField + Copy> Rot3<T> {
    /// Create a Rot3 from a quaternion assumed to have unit norm.
    #[inline]
    pub fn new(quaternion: Quaternion<T>) -> Self {
        Rot3 { quaternion }
    }

    /// Create a Rot3 from quaternion coefficients in storage order `[x, y, z, w]`.
    pub fn from_xyzw(x: T, y: T, z: T, w: T) -> Self {
        Rot3::new(Quaternion::new(w, x, y, z))
    }

    /// Get the quaternion representation.
    #[inline]
    pub fn quaternion(&self) -> Quaternion<T> {
        self.quaternion
    }

    /// Storage as a vector `[qx, qy, qz, qw]`.
    #[inline]
    pub fn data(&self) -> Vector4<T> {
        self.quaternion.coords
    }

    /// Rotation matrix (3x3).
    ///
    /// Evaluated from the quaternion components directly, so a slightly
    /// non-unit quaternion yields the matching slightly non-orthogonal matrix.
    pub fn to_rotation_matrix(&self) -> Matrix3<T> {
        let q = &self.quaternion;
        let one = T::one();
        let two: T = nalgebra::convert(2.0);
        let x2 = two * q.i * q.i;
        let y2 = two * q.j * q.j;
        let z2 = two * q.k * q.k;
        let xy = two * q.i * q.j;
        let xz = two * q.i * q.k;
        let yz = two * q.j * q.k;
        let xw = two * q.i * q.w;
        let yw = two * q.j * q.w;
        let zw = two * q.k * q.w;

        Matrix3::new(
            one - y2 - z2,
            xy - zw,
            xz + yw,
            xy + zw,
            one - x2 - z2,
            yz - xw,
            xz - yw,
            yz + xw,
            one - x2 - y2,
        )
    }

    /// Rotate a 3D point.
    #[inline]
    pub fn act(&self, point: &Vector3<T>) -> Vector3<T> {
        self.to_rotation_matrix() * point
    }

    /// Rotate a 3D point by the inverse rotation.
    #[inline]
    pub fn inverse_act(&self, point: &Vector3<T>) -> Vector3<T> {
        self.to_rotation_matrix().transpose() * point
    }

    /// Convert to another scalar precision, component by component.
    pub fn cast<U>(&self) -> Rot3<U>
    where
        U: RealField + Copy + SupersetOf<T>,
    {
        Rot3::new(Quaternion::from(
            self.quaternion.coords.map(|c| nalgebra::convert::<T, U>(c)),
        ))
    }

    /// Uniformly distributed random rotation (Shoemake's method).
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let two_pi = 2.0 * std::f64::consts::PI;
        let u1: f64 = rng.gen_range(0.0..1.0);
        let u2: f64 = rng.gen_range(0.0..1.0);
        let u3: f64 = rng.gen_range(0.0..1.0);
        let a = (1.0 - u1).sqrt();
        let b = u1.sqrt();
        Rot3::from_xyzw(
            nalgebra::convert(a * (two_pi * u2).sin()),
            nalgebra::convert(a * (two_pi * u2).cos()),
            nalgebra::convert(b * (two_pi * u3).sin()),
            nalgebra::convert(b * (two_pi * u3).cos()),
        )
    }
}

impl<T: RealField + Copy> StorageOps for Rot3<T> {
    type Scalar = T;
    const STORAGE_DIM: usize = 4;

    fn to_storage(&self) -> Vec<T> {
        self.quaternion.coords.iter().copied().collect()
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        Rot3::from_xyzw(elements[0], elements[1], elements[2], elements[3])
    }
}

impl<T: RealField + Copy> GroupOps for Rot3<T> {
    fn identity() -> Self {
        Rot3::new(Quaternion::identity())
    }

    /// Hamilton product.
    fn compose(&self, other: &Self) -> Self {
        Rot3::new(self.quaternion * other.quaternion)
    }

    /// Quaternion conjugate (exact for unit elements).
    fn inverse(&self) -> Self {
        Rot3::new(self.quaternion.conjugate())
    }
}

impl<T: RealField + Copy> LieGroupOps for Rot3<T> {
    const TANGENT_DIM: usize = 3;
    type Tangent = Vector3<T>;

    /// Exponential map for unit quaternions.
    ///
    /// q = [ω·sin(θ/2)/θ, cos(θ/2)] with θ = sqrt(|ω|² + ε²).
    fn from_tangent(tangent: &Vector3<T>, epsilon: T) -> Self {
        let half: T = nalgebra::convert(0.5);
        let theta = (tangent.norm_squared() + epsilon * epsilon).sqrt();
        let half_theta = half * theta;
        let sin_ratio = half_theta.sin() / theta;

        Rot3::new(Quaternion::new(
            half_theta.cos(),
            tangent.x * sin_ratio,
            tangent.y * sin_ratio,
            tangent.z * sin_ratio,
        ))
    }

    /// Logarithm map for unit quaternions.
    ///
    /// ω = xyz · 2·acos(w) / sqrt(1 − w²), with the `acos` argument clamped to
    /// `[ε − 1, 1 − ε]` and the denominator bounded below by ε.
    fn to_tangent(&self, epsilon: T) -> Vector3<T> {
        let q = &self.quaternion;
        let one = T::one();
        let two: T = nalgebra::convert(2.0);
        let half_angle = q.w.min(one - epsilon).max(epsilon - one).acos();
        let sin_half_sq = (one - q.w * q.w).max(epsilon);
        let scale = two * half_angle / sin_half_sq.sqrt();

        Vector3::new(q.i * scale, q.j * scale, q.k * scale)
    }
}
