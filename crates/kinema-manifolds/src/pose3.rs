//! Pose3 - rigid body transformations in 3D
//!
//! A pose maps points from its local frame into the reference frame:
//! `p_ref = R · p_local + t`. Storage is `[qx, qy, qz, qw, tx, ty, tz]`.
//!
//! The tangent vector is `[ωx, ωy, ωz, ux, uy, uz]`: rotation first, then the
//! translational part u, related to the translation by `t = V(ω) · u` with
//!
//! ```text
//! V(ω) = I + (1 − cos θ)/θ² · [ω]× + (θ − sin θ)/θ³ · [ω]×²
//! ```
//!
//! Both directions are evaluated as flat scalar expressions; the coefficients
//! are computed directly against an ε-guarded θ instead of switching to a
//! Taylor expansion near zero.

use crate::{GroupOps, LieGroupOps, Rot3, StorageOps, assert_storage_len};
use nalgebra::{Matrix4, RealField, Vector3, Vector6};
use rand::Rng;
use simba::scalar::SupersetOf;

/// Rigid transformation in 3D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose3<T: RealField + Copy> {
    rotation: Rot3<T>,
    translation: Vector3<T>,
}

impl<T: RealField + Copy> Pose3<T> {
    /// Create a pose from a rotation and a translation.
    #[inline]
    pub fn new(rotation: Rot3<T>, translation: Vector3<T>) -> Self {
        Pose3 {
            rotation,
            translation,
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vector3<T>) -> Self {
        Pose3::new(Rot3::identity(), translation)
    }

    /// Rotational part.
    #[inline]
    pub fn rotation(&self) -> Rot3<T> {
        self.rotation
    }

    /// Translational part (the origin of the local frame in the reference frame).
    #[inline]
    pub fn position(&self) -> Vector3<T> {
        self.translation
    }

    /// Transform a point from the local frame into the reference frame.
    pub fn act(&self, point: &Vector3<T>) -> Vector3<T> {
        self.rotation.act(point) + self.translation
    }

    /// Transform a point from the reference frame into the local frame.
    pub fn inverse_act(&self, point: &Vector3<T>) -> Vector3<T> {
        self.rotation.inverse_act(&(point - self.translation))
    }

    /// 4x4 homogeneous transformation matrix.
    pub fn to_homogeneous_matrix(&self) -> Matrix4<T> {
        let mut matrix = Matrix4::identity();
        matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.rotation.to_rotation_matrix());
        matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        matrix
    }

    /// Convert to another scalar precision, component by component.
    pub fn cast<U>(&self) -> Pose3<U>
    where
        U: RealField + Copy + SupersetOf<T>,
    {
        Pose3::new(
            self.rotation.cast(),
            self.translation.map(|c| nalgebra::convert::<T, U>(c)),
        )
    }

    /// Random pose: uniform rotation, translation uniform in `[-1, 1]³`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rotation = Rot3::random(rng);
        let translation =
            Vector3::from_fn(|_, _| nalgebra::convert(rng.gen_range(-1.0_f64..1.0)));
        Pose3::new(rotation, translation)
    }
}

impl<T: RealField + Copy> StorageOps for Pose3<T> {
    type Scalar = T;
    const STORAGE_DIM: usize = 7;

    fn to_storage(&self) -> Vec<T> {
        let mut storage = self.rotation.to_storage();
        storage.extend(self.translation.iter().copied());
        storage
    }

    fn from_storage(elements: &[T]) -> Self {
        assert_storage_len::<Self>(elements);
        Pose3::new(
            Rot3::from_storage(&elements[..4]),
            Vector3::new(elements[4], elements[5], elements[6]),
        )
    }
}

impl<T: RealField + Copy> GroupOps for Pose3<T> {
    fn identity() -> Self {
        Pose3::new(Rot3::identity(), Vector3::zeros())
    }

    /// (R₁, t₁) ∘ (R₂, t₂) = (R₁R₂, t₁ + R₁t₂)
    fn compose(&self, other: &Self) -> Self {
        Pose3::new(
            self.rotation.compose(&other.rotation),
            self.translation + self.rotation.act(&other.translation),
        )
    }

    /// (R, t)⁻¹ = (Rᵀ, −Rᵀt)
    fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        let translation = -rotation.act(&self.translation);
        Pose3::new(rotation, translation)
    }
}

impl<T: RealField + Copy> LieGroupOps for Pose3<T> {
    const TANGENT_DIM: usize = 6;
    type Tangent = Vector6<T>;

    fn from_tangent(tangent: &Vector6<T>, epsilon: T) -> Self {
        let one = T::one();
        let (wx, wy, wz) = (tangent[0], tangent[1], tangent[2]);
        let (ux, uy, uz) = (tangent[3], tangent[4], tangent[5]);

        let wx2 = wx * wx;
        let wy2 = wy * wy;
        let wz2 = wz * wz;
        let theta_sq = wx2 + wy2 + wz2 + epsilon * epsilon;
        let theta = theta_sq.sqrt();
        let c_sin = (theta - theta.sin()) / (theta_sq * theta);
        let c_cos = (one - theta.cos()) / theta_sq;

        let wxy = c_sin * wx * wy;
        let wxz = c_sin * wx * wz;
        let wyz = c_sin * wy * wz;

        let translation = Vector3::new(
            ux * (c_sin * (-wy2 - wz2) + one) + uy * (wxy - c_cos * wz) + uz * (wxz + c_cos * wy),
            ux * (wxy + c_cos * wz) + uy * (c_sin * (-wx2 - wz2) + one) + uz * (wyz - c_cos * wx),
            ux * (wxz - c_cos * wy) + uy * (wyz + c_cos * wx) + uz * (c_sin * (-wx2 - wy2) + one),
        );

        Pose3::new(
            Rot3::from_tangent(&Vector3::new(wx, wy, wz), epsilon),
            translation,
        )
    }

    fn to_tangent(&self, epsilon: T) -> Vector6<T> {
        let one = T::one();
        let half: T = nalgebra::convert(0.5);
        let w = self.rotation.to_tangent(epsilon);
        let (wx, wy, wz) = (w.x, w.y, w.z);
        let (tx, ty, tz) = (self.translation.x, self.translation.y, self.translation.z);

        let wx2 = wx * wx;
        let wy2 = wy * wy;
        let wz2 = wz * wz;
        let theta_sq = wx2 + wy2 + wz2 + epsilon;
        let theta = theta_sq.sqrt();
        let half_theta = half * theta;
        let c = (one - half * theta * half_theta.cos() / half_theta.sin()) / theta_sq;

        let wxy = c * wx * wy;
        let wxz = c * wx * wz;
        let wyz = c * wy * wz;
        let hx = half * wx;
        let hy = half * wy;
        let hz = half * wz;

        Vector6::new(
            wx,
            wy,
            wz,
            tx * (c * (-wy2 - wz2) + one) + ty * (wxy + hz) + tz * (wxz - hy),
            tx * (wxy - hz) + ty * (c * (-wx2 - wz2) + one) + tz * (wyz + hx),
            tx * (wxz + hy) + ty * (wyz - hx) + tz * (c * (-wx2 - wy2) + one),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TOLERANCE: f64 = 1e-9;
    const EPSILON: f64 = crate::DEFAULT_EPSILON_F64;

    fn skew(w: &Vector3<f64>) -> Matrix3<f64> {
        Matrix3::new(0.0, -w.z, w.y, w.z, 0.0, -w.x, -w.y, w.x, 0.0)
    }

    #[test]
    fn test_pose3_identity() {
        let pose = Pose3::<f64>::identity();
        assert_eq!(pose.to_storage(), vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
        let point = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(pose.act(&point), point);
    }

    #[test]
    fn test_pose3_translation_uses_left_jacobian() {
        let tangent = Vector6::new(0.4, -0.2, 0.7, 1.0, -2.0, 0.5);
        let pose = Pose3::from_tangent(&tangent, EPSILON);

        let w = Vector3::new(tangent[0], tangent[1], tangent[2]);
        let u = Vector3::new(tangent[3], tangent[4], tangent[5]);
        let theta = w.norm();
        let k = skew(&w);
        let v = Matrix3::identity()
            + k * ((1.0 - theta.cos()) / (theta * theta))
            + k * k * ((theta - theta.sin()) / (theta * theta * theta));

        assert!((pose.position() - v * u).norm() < TOLERANCE);
    }

    #[test]
    fn test_pose3_exp_log_consistency() {
        let tangent = Vector6::new(0.1, 0.2, -0.3, 0.5, -1.5, 2.0);
        let pose = Pose3::from_tangent(&tangent, EPSILON);
        let recovered = pose.to_tangent(EPSILON);
        assert!((tangent - recovered).norm() < TOLERANCE);
    }

    #[test]
    fn test_pose3_pure_translation_tangent() {
        let tangent = Vector6::new(0.0, 0.0, 0.0, 1.0, 2.0, 3.0);
        let pose = Pose3::from_tangent(&tangent, EPSILON);
        assert!((pose.position() - Vector3::new(1.0, 2.0, 3.0)).norm() < TOLERANCE);

        let recovered = pose.to_tangent(EPSILON);
        assert!(recovered.iter().all(|c| c.is_finite()));
        assert!((recovered - tangent).norm() < 1e-6);
    }

    #[test]
    fn test_pose3_compose_and_act() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Pose3::<f64>::random(&mut rng);
        let b = Pose3::<f64>::random(&mut rng);
        let point = Vector3::new(0.3, -0.8, 1.2);

        let composed = a.compose(&b).act(&point);
        let sequential = a.act(&b.act(&point));
        assert!((composed - sequential).norm() < TOLERANCE);

        let homogeneous = a.compose(&b).to_homogeneous_matrix();
        let expected = a.to_homogeneous_matrix() * b.to_homogeneous_matrix();
        assert!((homogeneous - expected).norm() < TOLERANCE);
    }

    #[test]
    fn test_pose3_inverse_act() {
        let mut rng = StdRng::seed_from_u64(9);
        let pose = Pose3::<f64>::random(&mut rng);
        let point = Vector3::new(-1.0, 0.5, 4.0);
        let local = pose.inverse_act(&point);
        assert!((pose.act(&local) - point).norm() < TOLERANCE);
        assert!((pose.inverse().act(&point) - local).norm() < TOLERANCE);
    }

    #[test]
    fn test_pose3_storage_round_trip_is_exact() {
        let mut rng = StdRng::seed_from_u64(21);
        let pose = Pose3::<f64>::random(&mut rng);
        assert_eq!(Pose3::from_storage(&pose.to_storage()), pose);
    }

    #[test]
    fn test_pose3_try_from_storage_reports_lengths() {
        let result = Pose3::<f64>::try_from_storage(&[0.0; 6]);
        match result {
            Err(crate::ManifoldError::StorageLength {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 7);
                assert_eq!(actual, 6);
            }
            other => panic!("expected StorageLength error, got {other:?}"),
        }
    }
}
