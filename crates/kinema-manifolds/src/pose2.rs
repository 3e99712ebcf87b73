//! Pose2 - rigid body transformations in 2D
//!
//! Storage is `[re, im, tx, ty]` (rotation as a unit complex number, then the
//! translation). The tangent vector is `[θ, ux, uy]` with `t = V(θ) · u` and
//!
//! ```text
//! V(θ) = [[sin θ/θ, −(1 − cos θ)/θ],
//!         [(1 − cos θ)/θ, sin θ/θ]]
//! ```

use crate::{GroupOps, LieGroupOps, Rot2, StorageOps, assert_storage_len};
use nalgebra::{Complex, Matrix3, RealField, Vector2, Vector3};
use rand::Rng;
use simba::scalar::SupersetOf;

/// Rigid transformation in 2D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose2<T: RealField + Copy> {
    rotation: Rot2<T>,
    translation: Vector2<T>,
}

impl<T: RealField + Copy> Pose2<T> {
    #[inline]
    pub fn new(rotation: Rot2<T>, translation: Vector2<T>) -> Self {
        Pose2 {
            rotation,
            translation,
        }
    }

    /// Create a pose from a translation and a heading angle.
    pub fn from_xy_angle(x: T, y: T, angle: T) -> Self {
        Pose2::new(Rot2::from_angle(angle), Vector2::new(x, y))
    }

    #[inline]
    pub fn rotation(&self) -> Rot2<T> {
        self.rotation
    }

    #[inline]
    pub fn position(&self) -> Vector2<T> {
        self.translation
    }

    /// Transform a point from the local frame into the reference frame.
    pub fn act(&self, point: &Vector2<T>) -> Vector2<T> {
        self.rotation.act(point) + self.translation
    }

    /// Transform a point from the reference frame into the local frame.
    pub fn inverse_act(&self, point: &Vector2<T>) -> Vector2<T> {
        let Complex { re, im } = self.rotation.complex();
        let dx = point.x - self.translation.x;
        let dy = point.y - self.translation.y;
        Vector2::new(re * dx + im * dy, -im * dx + re * dy)
    }

    /// 3x3 homogeneous transformation matrix.
    pub fn to_homogeneous_matrix(&self) -> Matrix3<T> {
        let Complex { re, im } = self.rotation.complex();
        let zero = T::zero();
        Matrix3::new(
            re,
            -im,
            self.translation.x,
            im,
            re,
            self.translation.y,
            zero,
            zero,
            T::one(),
        )
    }

    /// Convert to another scalar precision, component by component.
    pub fn cast<U>(&self) -> Pose2<U>
    where
        U: RealField + Copy + SupersetOf<T>,
    {
        Pose2::new(
            self.rotation.cast(),
            self.translation.map(|c| nalgebra::convert::<T, U>(c)),
        )
    }

    /// Random pose: uniform heading, translation uniform in `[-1, 1]²`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rotation = Rot2::random(rng);
        let translation =
            Vector2::from_fn(|_, _| nalgebra::convert(rng.gen_range(-1.0_f64..1.0)));
        Pose2::new(rotation, translation)
    }
}

impl<T: RealField + Copy> StorageOps for Pose2<T> {
    type Scalar = T;
    const STORAGE_DIM: usize = 4;

    fn to_storage(&self) -> Vec<T> {
        let Complex { re, im } = self.rotation.complex();
        vec![re, im, self.translation.x, self.translation.y]
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        Pose2::new(
            Rot2::new(Complex::new(elements[0], elements[1])),
            Vector2::new(elements[2], elements[3]),
        )
    }
}

impl<T: RealField + Copy> GroupOps for Pose2<T> {
    fn identity() -> Self {
        Pose2::new(Rot2::identity(), Vector2::zeros())
    }

    fn compose(&self, other: &Self) -> Self {
        Pose2::new(
            self.rotation.compose(&other.rotation),
            self.translation + self.rotation.act(&other.translation),
        )
    }

    fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Pose2::new(rotation, -rotation.act(&self.translation))
    }
}

impl<T: RealField + Copy> LieGroupOps for Pose2<T> {
    const TANGENT_DIM: usize = 3;
    type Tangent = Vector3<T>;

    fn from_tangent(tangent: &Vector3<T>, epsilon: T) -> Self {
        let one = T::one();
        let (theta, x, y) = (tangent[0], tangent[1], tangent[2]);
        let theta_sq = theta * theta + epsilon * epsilon;
        let theta_n = theta_sq.sqrt();
        let a = theta_n.sin() / theta_n;
        let b = theta * (one - theta_n.cos()) / theta_sq;

        Pose2::new(
            Rot2::from_angle(theta),
            Vector2::new(a * x - b * y, b * x + a * y),
        )
    }

    fn to_tangent(&self, epsilon: T) -> Vector3<T> {
        let half: T = nalgebra::convert(0.5);
        let theta = self.rotation.angle();
        let theta_n = (theta * theta + epsilon).sqrt();
        let half_theta = half * theta_n;
        let a = half_theta * half_theta.cos() / half_theta.sin();
        let b = half * theta;
        let (x, y) = (self.translation.x, self.translation.y);

        Vector3::new(theta, a * x + b * y, -b * x + a * y)
    }
}
