//! Perspective camera: world to normalized device coordinates and back.

use nalgebra::{Isometry3, Perspective3, Point3, Vector2, Vector3};

use super::ray::Ray;
use super::spherical::Point3D;

/// A perspective camera looking from `position` at `target`.
///
/// Normalized device coordinates follow the OpenGL convention: x to the
/// right and y up, both in `[-1, 1]` across the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Point3D,
    pub target: Point3D,
    pub up: Vector3<f64>,
    /// Vertical field of view, degrees
    pub fov_deg: f64,
    /// Viewport width / height
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl PerspectiveCamera {
    pub fn new(fov_deg: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 1.0),
            target: Vector3::zeros(),
            up: Vector3::y(),
            fov_deg,
            aspect,
            near,
            far,
        }
    }

    pub fn look_at(&mut self, target: Point3D) {
        self.target = target;
    }

    /// Called on viewport resize. Degenerate sizes keep the previous aspect.
    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Unit vector the camera looks along
    pub fn world_direction(&self) -> Vector3<f64> {
        (self.target - self.position).normalize()
    }

    pub fn distance_to_target(&self) -> f64 {
        (self.target - self.position).norm()
    }

    fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    fn projection(&self) -> Perspective3<f64> {
        Perspective3::new(self.aspect, self.fov_deg.to_radians(), self.near, self.far)
    }

    /// World point to NDC. `None` when the point is not in front of the near plane.
    pub fn project(&self, world: &Point3D) -> Option<Vector3<f64>> {
        let eye = self.view().transform_point(&Point3::from(*world));
        // camera looks down -Z in view space
        if -eye.z < self.near {
            return None;
        }
        Some(self.projection().project_point(&eye).coords)
    }

    /// Ray from the camera through a pointer given in NDC
    pub fn ray_from_ndc(&self, ndc: Vector2<f64>) -> Ray {
        let on_frustum = self
            .projection()
            .unproject_point(&Point3::new(ndc.x, ndc.y, 0.5));
        let world = self.view().inverse_transform_point(&on_frustum);
        Ray::new(self.position, world.coords - self.position)
    }

    /// How many NDC units a world-space length at `world` spans vertically
    pub fn projected_size(&self, world: &Point3D, length: f64) -> Option<f64> {
        let eye = self.view().transform_point(&Point3::from(*world));
        let depth = -eye.z;
        if depth < self.near {
            return None;
        }
        let half_height = depth * (self.fov_deg.to_radians() / 2.0).tan();
        Some(length / half_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(60.0, 1.5, 0.1, 100.0);
        camera.position = Vector3::new(3.0, 3.0, 4.0);
        camera.look_at(Vector3::zeros());
        camera
    }

    #[test]
    fn test_target_projects_to_center() {
        let ndc = camera().project(&Vector3::zeros()).unwrap();
        assert_abs_diff_eq!(ndc.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ndc.y, 0.0, epsilon = 1e-12);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_not_projected() {
        let cam = camera();
        let behind = cam.position - cam.world_direction() * 2.0;
        assert!(cam.project(&behind).is_none());
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vector2::zeros());
        assert_relative_eq!(ray.origin, cam.position);
        assert_relative_eq!(ray.direction, cam.world_direction(), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_passes_through_projected_point() {
        let cam = camera();
        let world = Vector3::new(1.5, 1.0, 1.2);
        let ndc = cam.project(&world).unwrap();
        let ray = cam.ray_from_ndc(Vector2::new(ndc.x, ndc.y));
        let to_point = world - ray.origin;
        let along = to_point.dot(&ray.direction);
        let closest = ray.at(along);
        assert_relative_eq!(closest, world, epsilon = 1e-9);
    }

    #[test]
    fn test_set_aspect_ignores_degenerate_sizes() {
        let mut cam = camera();
        cam.set_aspect(0.0);
        assert_eq!(cam.aspect, 1.5);
        cam.set_aspect(f64::NAN);
        assert_eq!(cam.aspect, 1.5);
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn test_projected_size_shrinks_with_distance() {
        let cam = camera();
        let near = cam.projected_size(&Vector3::new(1.0, 1.0, 1.0), 0.1).unwrap();
        let far = cam.projected_size(&Vector3::new(-1.0, -1.0, -1.0), 0.1).unwrap();
        assert!(near > far);
    }
}
