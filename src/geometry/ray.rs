//! Rays, planes and spheres: the picking primitives used by the drag controller.

use nalgebra::Vector3;

use super::spherical::Point3D;

/// Half-line `origin + t * direction`, `t >= 0`. `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3D,
    pub direction: Vector3<f64>,
}

/// Plane `normal · p + constant = 0` with a unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub constant: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point3D,
    pub radius: f64,
}

impl Plane {
    /// Plane with the given normal containing `point`. The normal is normalized.
    pub fn from_normal_and_coplanar_point(normal: Vector3<f64>, point: &Point3D) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            constant: -point.dot(&normal),
        }
    }

    /// Signed distance, positive on the side the normal points to
    pub fn distance_to_point(&self, point: &Point3D) -> f64 {
        self.normal.dot(point) + self.constant
    }
}

impl Ray {
    pub fn new(origin: Point3D, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> Point3D {
        self.origin + self.direction * t
    }

    /// Ray parameter where it meets the plane.
    ///
    /// `None` when the ray is parallel to the plane (unless the origin already
    /// lies on it) or when the plane is behind the origin.
    pub fn distance_to_plane(&self, plane: &Plane) -> Option<f64> {
        let denominator = plane.normal.dot(&self.direction);
        if denominator == 0.0 {
            return if plane.distance_to_point(&self.origin) == 0.0 {
                Some(0.0)
            } else {
                None
            };
        }

        let t = -(self.origin.dot(&plane.normal) + plane.constant) / denominator;
        if t >= 0.0 {
            Some(t)
        } else {
            None
        }
    }

    pub fn intersect_plane(&self, plane: &Plane) -> Option<Point3D> {
        self.distance_to_plane(plane).map(|t| self.at(t))
    }

    /// First point where the ray enters the sphere, or the exit point when
    /// the origin is inside it.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<Point3D> {
        let to_center = sphere.center - self.origin;
        let tca = to_center.dot(&self.direction);
        let d2 = to_center.dot(&to_center) - tca * tca;
        let radius2 = sphere.radius * sphere.radius;

        if d2 > radius2 {
            return None;
        }

        let thc = (radius2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;

        if t1 < 0.0 {
            return None;
        }
        if t0 < 0.0 {
            return Some(self.at(t1));
        }
        Some(self.at(t0))
    }
}
