//! Rotation and pose parameterizations for gradient-based estimation.
//!
//! This crate provides the value types an optimizer manipulates when it
//! estimates rigid-body transforms:
//! - **Rot2**: rotations in 2D (unit complex number)
//! - **Rot3**: rotations in 3D (unit quaternion)
//! - **Pose2**: rigid transformations in 2D
//! - **Pose3**: rigid transformations in 3D
//! - fixed-size vectors (`SVector<T, D>`), which form an additive Lie group
//!
//! Lie group | storage | dof | storage layout                       | tangent layout
//! --------- | ------- | --- | ------------------------------------ | ------------------------
//! Rot2      | 2       | 1   | `[re, im]`                           | `[θ]`
//! Rot3      | 4       | 3   | `[qx, qy, qz, qw]`                   | `[ωx, ωy, ωz]`
//! Pose2     | 4       | 3   | `[re, im, tx, ty]`                   | `[θ, ux, uy]`
//! Pose3     | 7       | 6   | `[qx, qy, qz, qw, tx, ty, tz]`       | `[ωx, ωy, ωz, ux, uy, uz]`
//! Rⁿ        | n       | n   | `[v₀, …, vₙ₋₁]`                      | `[v₀, …, vₙ₋₁]`
//!
//! Every operation is layered on three traits:
//! - [`StorageOps`]: flat fixed-length (de)serialization, approximate equality
//! - [`GroupOps`]: closed-form identity, composition and inverse
//! - [`LieGroupOps`]: exponential/logarithm maps, retract and local coordinates
//!
//! All types are generic over the scalar `T: RealField + Copy`, so the same
//! code serves `f32` and `f64`. Each type offers `cast::<U>()` to change precision.
//!
//! # Epsilon
//!
//! The Lie-group maps contain removable singularities (division by the rotation
//! angle, `acos` at ±1). Every such operation takes an explicit `epsilon` that is
//! folded into the offending denominator or clamp. Pass a small positive value,
//! e.g. [`default_epsilon`]. An epsilon of zero is allowed but yields NaN at the
//! exact singular configuration.
//!
//! # Example
//!
//! ```
//! use kinema_manifolds::{GroupOps, LieGroupOps, Pose3, default_epsilon};
//! use nalgebra::Vector6;
//!
//! let eps = default_epsilon::<f64>();
//! let pose = Pose3::<f64>::identity();
//! let step = Vector6::new(0.0, 0.0, 0.1, 1.0, 0.0, 0.0);
//! let updated = pose.retract(&step, eps);
//! let recovered = pose.local_coordinates(&updated, eps);
//! assert!((recovered - step).norm() < 1e-9);
//! ```

use nalgebra::RealField;
use std::fmt::Debug;
use std::ops::Mul;

pub mod pose2;
pub mod pose3;
pub mod rot2;
pub mod rot3;
pub mod vector;

pub use pose2::Pose2;
pub use pose3::Pose3;
pub use rot2::Rot2;
pub use rot3::Rot3;

// ============================================================================
// Precision Constants
// ============================================================================

/// Epsilon recommended for double-precision Lie-group and camera operations.
pub const DEFAULT_EPSILON_F64: f64 = 10.0 * f64::EPSILON;

/// Epsilon recommended for single-precision Lie-group and camera operations.
pub const DEFAULT_EPSILON_F32: f32 = 10.0 * f32::EPSILON;

/// Tolerance for group-law checks in double precision.
pub const GROUP_LAW_TOLERANCE_F64: f64 = 1e-9;

/// Tolerance for group-law checks in single precision.
pub const GROUP_LAW_TOLERANCE_F32: f32 = 1e-4;

/// Ten machine epsilons of `T`.
///
/// Matches [`DEFAULT_EPSILON_F64`] and [`DEFAULT_EPSILON_F32`] for the two
/// standard precisions.
pub fn default_epsilon<T: RealField + Copy>() -> T {
    let ten: T = nalgebra::convert(10.0);
    <T as approx::AbsDiffEq>::default_epsilon() * ten
}

/// Errors raised by the storage layer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifoldError {
    #[error("{type_name} storage requires {expected} elements, got {actual}")]
    StorageLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Result type for storage operations.
pub type ManifoldResult<T> = Result<T, ManifoldError>;

// ============================================================================
// Storage
// ============================================================================

/// Fixed-size flat-vector (de)serialization.
///
/// `from_storage(&x.to_storage())` reproduces `x` component for component.
/// Rotations read from storage are trusted and never renormalized.
pub trait StorageOps: Sized {
    /// Scalar type of every stored component.
    type Scalar: RealField + Copy;

    /// Number of scalars in the flat representation.
    const STORAGE_DIM: usize;

    /// Flatten into a vector of exactly `STORAGE_DIM` scalars.
    fn to_storage(&self) -> Vec<Self::Scalar>;

    /// Rebuild from a flat slice.
    ///
    /// # Panics
    /// If `elements.len() != STORAGE_DIM`. A wrong-length buffer is a bug at
    /// the call site; use [`StorageOps::try_from_storage`] at untrusted boundaries.
    fn from_storage(elements: &[Self::Scalar]) -> Self;

    /// Rebuild from a flat slice, reporting a length mismatch as an error.
    fn try_from_storage(elements: &[Self::Scalar]) -> ManifoldResult<Self> {
        if elements.len() != Self::STORAGE_DIM {
            tracing::debug!(
                "rejecting {} storage of length {} (expected {})",
                std::any::type_name::<Self>(),
                elements.len(),
                Self::STORAGE_DIM
            );
            return Err(ManifoldError::StorageLength {
                type_name: std::any::type_name::<Self>(),
                expected: Self::STORAGE_DIM,
                actual: elements.len(),
            });
        }
        Ok(Self::from_storage(elements))
    }

    /// Approximate equality on the flat representation.
    ///
    /// Relative comparison, except against an exactly-zero `other` where the
    /// own norm is compared against `tolerance` directly.
    fn is_approx(&self, other: &Self, tolerance: Self::Scalar) -> bool {
        is_approx_storage(&self.to_storage(), &other.to_storage(), tolerance)
    }
}

/// Fatal length check shared by every `from_storage` implementation.
#[track_caller]
pub fn assert_storage_len<S: StorageOps>(elements: &[S::Scalar]) {
    assert!(
        elements.len() == S::STORAGE_DIM,
        "{} storage requires {} elements, got {}",
        std::any::type_name::<S>(),
        S::STORAGE_DIM,
        elements.len()
    );
}

/// Approximate equality of two flat buffers.
///
/// `‖a − b‖² ≤ tol² · min(‖a‖², ‖b‖²)`, or `‖a‖ ≤ tol` when `b` is exactly zero.
pub fn is_approx_storage<T: RealField + Copy>(a: &[T], b: &[T], tolerance: T) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let a_norm_sq = a.iter().fold(T::zero(), |acc, &x| acc + x * x);
    if b.iter().all(|&x| x == T::zero()) {
        return a_norm_sq.sqrt() <= tolerance;
    }
    let b_norm_sq = b.iter().fold(T::zero(), |acc, &x| acc + x * x);
    let diff_norm_sq = a
        .iter()
        .zip(b)
        .fold(T::zero(), |acc, (&x, &y)| acc + (x - y) * (x - y));
    diff_norm_sq <= tolerance * tolerance * a_norm_sq.min(b_norm_sq)
}

// ============================================================================
// Group and Lie group
// ============================================================================

/// Closed-form group structure.
pub trait GroupOps: Sized {
    /// Neutral element e such that e ∘ g = g ∘ e = g.
    fn identity() -> Self;

    /// Group product self ∘ other.
    fn compose(&self, other: &Self) -> Self;

    /// Element g⁻¹ such that g ∘ g⁻¹ = e.
    fn inverse(&self) -> Self;

    /// Relative element self⁻¹ ∘ other.
    fn between(&self, other: &Self) -> Self {
        self.inverse().compose(other)
    }
}

/// Exponential/logarithm maps and the optimizer-facing retraction.
///
/// Perturbations are applied on the right: `retract(a, v) = a ∘ exp(v)`.
pub trait LieGroupOps: GroupOps + StorageOps {
    /// Degrees of freedom (tangent space dimension).
    const TANGENT_DIM: usize;

    /// Minimal perturbation vector of length `TANGENT_DIM`.
    type Tangent: Clone + Debug + PartialEq + Mul<Self::Scalar, Output = Self::Tangent>;

    /// Exponential map from the tangent space at the identity.
    fn from_tangent(tangent: &Self::Tangent, epsilon: Self::Scalar) -> Self;

    /// Logarithm map to the tangent space at the identity.
    fn to_tangent(&self, epsilon: Self::Scalar) -> Self::Tangent;

    /// Apply a local perturbation: self ∘ exp(tangent).
    fn retract(&self, tangent: &Self::Tangent, epsilon: Self::Scalar) -> Self {
        self.compose(&Self::from_tangent(tangent, epsilon))
    }

    /// Minimal residual between two elements: log(self⁻¹ ∘ other).
    ///
    /// Inverse of [`LieGroupOps::retract`].
    fn local_coordinates(&self, other: &Self, epsilon: Self::Scalar) -> Self::Tangent {
        self.between(other).to_tangent(epsilon)
    }

    /// Geodesic interpolation; `alpha = 0` gives self, `alpha = 1` gives other.
    fn interpolate(&self, other: &Self, alpha: Self::Scalar, epsilon: Self::Scalar) -> Self {
        self.retract(&(self.local_coordinates(other, epsilon) * alpha), epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_epsilon_matches_constants() {
        assert_eq!(default_epsilon::<f64>(), DEFAULT_EPSILON_F64);
        assert_eq!(default_epsilon::<f32>(), DEFAULT_EPSILON_F32);
    }

    #[test]
    fn test_is_approx_against_exact_zero() {
        let zero = [0.0_f64; 3];
        assert!(is_approx_storage(&[1e-4, 0.0, 0.0], &zero, 1e-3));
        assert!(!is_approx_storage(&[1e-2, 0.0, 0.0], &zero, 1e-3));
    }

    #[test]
    fn test_is_approx_relative() {
        let a = [1000.0_f64, 2000.0];
        let b = [1000.001_f64, 2000.0];
        assert!(is_approx_storage(&a, &b, 1e-6));
        assert!(!is_approx_storage(&a, &[1001.0, 2000.0], 1e-6));
        assert!(!is_approx_storage(&a, &[1000.0], 1e-6));
    }

    #[test]
    fn test_storage_error_display() {
        let error = ManifoldError::StorageLength {
            type_name: "Rot3",
            expected: 4,
            actual: 3,
        };
        assert_eq!(error.to_string(), "Rot3 storage requires 4 elements, got 3");
    }
}
