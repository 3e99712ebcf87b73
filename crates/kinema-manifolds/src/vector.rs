//! Fixed-size vectors as an additive Lie group.
//!
//! Composition is addition, the inverse is negation and both exponential and
//! logarithm maps are the identity, so vectors can sit next to rotations and
//! poses in the same optimization state.
//!
//! `nalgebra` already defines an inherent `Matrix::identity()` (the identity
//! matrix), which shadows the group identity in path syntax. Call it as
//! `<SVector<T, D> as GroupOps>::identity()` to get the zero vector, and
//! qualify the other associated functions the same way when the concrete
//! vector type is named.

use crate::{GroupOps, LieGroupOps, StorageOps, assert_storage_len};
use nalgebra::{RealField, SVector};

impl<T: RealField + Copy, const D: usize> StorageOps for SVector<T, D> {
    type Scalar = T;
    const STORAGE_DIM: usize = D;

    fn to_storage(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        SVector::from_column_slice(elements)
    }
}

impl<T: RealField + Copy, const D: usize> GroupOps for SVector<T, D> {
    fn identity() -> Self {
        SVector::zeros()
    }

    fn compose(&self, other: &Self) -> Self {
        self + other
    }

    fn inverse(&self) -> Self {
        -self
    }
}

impl<T: RealField + Copy, const D: usize> LieGroupOps for SVector<T, D> {
    const TANGENT_DIM: usize = D;
    type Tangent = SVector<T, D>;

    fn from_tangent(tangent: &SVector<T, D>, _epsilon: T) -> Self {
        *tangent
    }

    fn to_tangent(&self, _epsilon: T) -> SVector<T, D> {
        *self
    }
}
