//! Math layer: coordinate conversion, picking primitives and cameras.

pub mod camera;
pub mod orbit;
pub mod ray;
pub mod spherical;

pub use camera::PerspectiveCamera;
pub use orbit::OrbitControls;
pub use ray::{Plane, Ray, Sphere};
pub use spherical::{to_spherical, Point3D, Spherical};
