//! Cartesian to spherical conversion.
//!
//! Conventions used throughout the crate:
//! - `r`: distance from the origin, `r >= 0`
//! - `theta`: polar angle measured from +Z, in `[0, π]`
//! - `phi`: azimuth in the XY plane measured from +X toward +Y, in `(-π, π]`
//!
//! At the origin both angles are undefined; the convention is `theta = phi = 0`.
//! On the Z axis the azimuth is undefined and comes out as `0` (the value of
//! `atan2(0, 0)`).

use nalgebra::Vector3;
use std::f64::consts::PI;

/// The single draggable point lives in plain Cartesian space
pub type Point3D = Vector3<f64>;

/// Spherical form of a [`Point3D`]. Always derived, never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    /// Radius
    pub r: f64,
    /// Polar angle from +Z, radians
    pub theta: f64,
    /// Azimuth from +X, radians
    pub phi: f64,
}

impl Spherical {
    pub fn from_point(point: &Point3D) -> Self {
        to_spherical(point.x, point.y, point.z)
    }

    /// Back to Cartesian:
    /// `(r sinθ cosφ, r sinθ sinφ, r cosθ)`
    pub fn to_cartesian(&self) -> Point3D {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Vector3::new(
            self.r * sin_theta * cos_phi,
            self.r * sin_theta * sin_phi,
            self.r * cos_theta,
        )
    }

    pub fn theta_deg(&self) -> f64 {
        self.theta.to_degrees()
    }

    pub fn phi_deg(&self) -> f64 {
        self.phi.to_degrees()
    }
}

/// Converts `(x, y, z)` to `(r, theta, phi)`.
///
/// `z / r` is clamped to `[-1, 1]` before `acos`: near the poles rounding can
/// push the ratio a hair outside the domain and `acos` would return NaN.
pub fn to_spherical(x: f64, y: f64, z: f64) -> Spherical {
    // hypot keeps r finite and nonzero at extreme magnitudes
    let r = x.hypot(y).hypot(z);
    if r == 0.0 {
        return Spherical::default();
    }

    let theta = (z / r).clamp(-1.0, 1.0).acos();

    let mut phi = y.atan2(x);
    // atan2(-0.0, negative) lands on -π, which is outside (-π, π]
    if phi <= -PI {
        phi += 2.0 * PI;
    }

    Spherical { r, theta, phi }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_origin_is_all_zero() {
        let s = to_spherical(0.0, 0.0, 0.0);
        assert_eq!(s, Spherical { r: 0.0, theta: 0.0, phi: 0.0 });

        // negative zero is still the origin
        let s = to_spherical(-0.0, -0.0, -0.0);
        assert_eq!(s.r, 0.0);
        assert_eq!(s.theta, 0.0);
        assert_eq!(s.phi, 0.0);
    }

    #[test]
    fn test_reference_point() {
        let s = to_spherical(1.5, 1.0, 1.2);
        assert_abs_diff_eq!(s.r, 2.1656, epsilon = 1e-4);
        assert_abs_diff_eq!(s.theta, 0.9835, epsilon = 1e-4);
        assert_abs_diff_eq!(s.theta_deg(), 56.35, epsilon = 0.05);
        assert_abs_diff_eq!(s.phi, 0.5880, epsilon = 1e-4);
        assert_abs_diff_eq!(s.phi_deg(), 33.7, epsilon = 0.05);
    }

    #[test]
    fn test_north_pole_has_zero_azimuth() {
        let s = to_spherical(0.0, 0.0, 5.0);
        assert_eq!(s.r, 5.0);
        assert_eq!(s.theta, 0.0);
        assert_eq!(s.phi, 0.0);
    }

    #[test]
    fn test_south_pole() {
        let s = to_spherical(0.0, 0.0, -2.0);
        assert_eq!(s.r, 2.0);
        assert_relative_eq!(s.theta, PI);
        assert_eq!(s.phi, 0.0);
    }

    #[test]
    fn test_negative_x_axis_maps_to_plus_pi() {
        let s = to_spherical(-1.0, 0.0, 0.0);
        assert_relative_eq!(s.phi, PI);
        let s = to_spherical(-1.0, -0.0, 0.0);
        assert_relative_eq!(s.phi, PI);
    }

    #[test]
    fn test_near_pole_ratio_does_not_produce_nan() {
        // z / r rounds to exactly 1.0 or slightly above for tiny x
        let s = to_spherical(1e-300, 0.0, 1.0);
        assert!(s.theta.is_finite());
        assert!(s.theta >= 0.0);

        let s = to_spherical(0.0, 1e-300, -1.0);
        assert!(s.theta.is_finite());
        assert!(s.theta <= PI);
    }

    #[rstest]
    #[case(1.5, 1.0, 1.2)]
    #[case(1.0, 0.0, 0.0)]
    #[case(0.0, 1.0, 0.0)]
    #[case(-2.0, 3.0, -1.0)]
    #[case(-0.5, -0.5, 0.25)]
    #[case(0.3, -4.0, 2.0)]
    #[case(1e-4, 2e-4, -3e-4)]
    #[case(120.0, -75.0, 33.0)]
    fn test_round_trip(#[case] x: f64, #[case] y: f64, #[case] z: f64) {
        let point = Vector3::new(x, y, z);
        let back = Spherical::from_point(&point).to_cartesian();
        let scale = point.norm();
        assert_abs_diff_eq!(back.x, x, epsilon = 1e-12 * scale);
        assert_abs_diff_eq!(back.y, y, epsilon = 1e-12 * scale);
        assert_abs_diff_eq!(back.z, z, epsilon = 1e-12 * scale);
    }

    #[rstest]
    #[case(1e-200, 0.0, 1e-200)]
    #[case(-3e-170, 2e-170, 5e-171)]
    #[case(1e200, -2e200, 3e199)]
    fn test_extreme_magnitudes_keep_radius(#[case] x: f64, #[case] y: f64, #[case] z: f64) {
        let point = Vector3::new(x, y, z);
        let s = Spherical::from_point(&point);
        assert!(s.r > 0.0 && s.r.is_finite());
        let back = s.to_cartesian();
        assert_relative_eq!(back.x, x, max_relative = 1e-12);
        assert_relative_eq!(back.y, y, max_relative = 1e-12);
        assert_relative_eq!(back.z, z, max_relative = 1e-12);
    }

    #[test]
    fn test_angle_ranges_over_grid() {
        let values = [-3.0, -1.0, -0.25, -0.0, 0.0, 0.25, 1.0, 3.0];
        for &x in &values {
            for &y in &values {
                for &z in &values {
                    let s = to_spherical(x, y, z);
                    assert!(s.r >= 0.0);
                    assert!(
                        (0.0..=PI).contains(&s.theta),
                        "theta {} out of range for ({}, {}, {})",
                        s.theta,
                        x,
                        y,
                        z
                    );
                    assert!(
                        s.phi > -PI && s.phi <= PI,
                        "phi {} out of range for ({}, {}, {})",
                        s.phi,
                        x,
                        y,
                        z
                    );
                }
            }
        }
    }

    #[test]
    fn test_from_known_angles() {
        let s = Spherical {
            r: 2.0,
            theta: FRAC_PI_2,
            phi: FRAC_PI_4,
        };
        let p = s.to_cartesian();
        assert_relative_eq!(p.x, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-12);
    }
}
