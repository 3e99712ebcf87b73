//! Camera with a pose in the world frame.
//!
//! The pose maps camera-frame points into the world frame
//! (`p_world = pose · p_camera`).

use crate::{Camera, CameraCal, Validated};
use kinema_manifolds::{GroupOps, Pose3};
use nalgebra::{Vector2, Vector3};

/// Camera plus its camera-to-world pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PosedCamera<C: CameraCal> {
    pose: Pose3<C::Scalar>,
    camera: Camera<C>,
}

impl<C: CameraCal> PosedCamera<C> {
    pub fn new(pose: Pose3<C::Scalar>, camera: Camera<C>) -> Self {
        PosedCamera { pose, camera }
    }

    #[inline]
    pub fn pose(&self) -> &Pose3<C::Scalar> {
        &self.pose
    }

    #[inline]
    pub fn camera(&self) -> &Camera<C> {
        &self.camera
    }

    /// Project a point given in the world frame into pixel coordinates.
    pub fn pixel_from_global_point(
        &self,
        point: &Vector3<C::Scalar>,
        epsilon: C::Scalar,
    ) -> Validated<Vector2<C::Scalar>, C::Scalar> {
        let camera_point = self.pose.inverse_act(point);
        self.camera.pixel_from_camera_point(&camera_point, epsilon)
    }

    /// World-frame point at distance `range` along the ray through `pixel`.
    pub fn global_point_from_pixel(
        &self,
        pixel: &Vector2<C::Scalar>,
        range: C::Scalar,
        epsilon: C::Scalar,
    ) -> Validated<Vector3<C::Scalar>, C::Scalar> {
        let ray = self.camera.camera_ray_from_pixel(pixel, epsilon);
        let camera_point = unit_ray(&ray.value, epsilon) * range;
        Validated::new(self.pose.act(&camera_point), ray.validity)
    }

    /// Pixel in `target` observing the point seen at `pixel` by this camera.
    ///
    /// The depth is given as inverse range, so `inverse_range = 0` warps a
    /// point at infinity.
    pub fn warp_pixel<D>(
        &self,
        pixel: &Vector2<C::Scalar>,
        inverse_range: C::Scalar,
        target: &PosedCamera<D>,
        epsilon: C::Scalar,
    ) -> Validated<Vector2<C::Scalar>, C::Scalar>
    where
        D: CameraCal<Scalar = C::Scalar>,
    {
        let ray = self.camera.camera_ray_from_pixel(pixel, epsilon);
        let target_from_self = target.pose.inverse().compose(&self.pose);

        // homogeneous point (ray_unit, inverse_range) in the target frame
        let target_point = target_from_self.rotation().act(&unit_ray(&ray.value, epsilon))
            + target_from_self.position() * inverse_range;

        target
            .camera
            .pixel_from_camera_point(&target_point, epsilon)
            .gated(ray.validity)
    }
}

fn unit_ray<T: nalgebra::RealField + Copy>(ray: &Vector3<T>, epsilon: T) -> Vector3<T> {
    ray / (ray.norm_squared() + epsilon).sqrt()
}
