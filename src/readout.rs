//! Text readouts of the point in both coordinate systems.

use crate::geometry::{Point3D, Spherical};

/// Formatted readout lines, one per coordinate
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayStrings {
    pub cartesian: [String; 3],
    pub spherical: [String; 3],
}

/// `-0.0` would print as "-0.000"
fn tidy(value: f64) -> f64 {
    value + 0.0
}

fn fixed3(value: f64) -> String {
    format!("{:.3}", tidy(value))
}

fn angle(radians: f64, degrees: f64) -> String {
    format!("{} rad ({:.1} deg)", fixed3(radians), tidy(degrees))
}

/// Cartesian values with 3 decimals; angles with 3 decimals in radians and
/// 1 decimal in degrees.
pub fn format_readouts(point: &Point3D, spherical: &Spherical) -> DisplayStrings {
    DisplayStrings {
        cartesian: [
            format!("x: {}", fixed3(point.x)),
            format!("y: {}", fixed3(point.y)),
            format!("z: {}", fixed3(point.z)),
        ],
        spherical: [
            format!("r: {}", fixed3(spherical.r)),
            format!("theta: {}", angle(spherical.theta, spherical.theta_deg())),
            format!("phi: {}", angle(spherical.phi, spherical.phi_deg())),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_reference_point_readout() {
        let p = Vector3::new(1.5, 1.0, 1.2);
        let strings = format_readouts(&p, &Spherical::from_point(&p));
        assert_eq!(strings.cartesian, ["x: 1.500", "y: 1.000", "z: 1.200"]);
        assert_eq!(
            strings.spherical,
            [
                "r: 2.166",
                "theta: 0.984 rad (56.4 deg)",
                "phi: 0.588 rad (33.7 deg)",
            ]
        );
    }

    #[test]
    fn test_origin_readout() {
        let p = Vector3::zeros();
        let strings = format_readouts(&p, &Spherical::from_point(&p));
        assert_eq!(strings.cartesian, ["x: 0.000", "y: 0.000", "z: 0.000"]);
        assert_eq!(
            strings.spherical,
            ["r: 0.000", "theta: 0.000 rad (0.0 deg)", "phi: 0.000 rad (0.0 deg)"]
        );
    }

    #[test]
    fn test_negative_zero_prints_unsigned() {
        let p = Vector3::new(-0.0, 2.0, -0.0);
        let strings = format_readouts(&p, &Spherical::from_point(&p));
        assert_eq!(strings.cartesian[0], "x: 0.000");
        assert_eq!(strings.cartesian[2], "z: 0.000");
    }

    #[test]
    fn test_negative_azimuth() {
        let p = Vector3::new(0.0, -1.0, 0.0);
        let strings = format_readouts(&p, &Spherical::from_point(&p));
        assert_eq!(strings.spherical[2], "phi: -1.571 rad (-90.0 deg)");
        assert_eq!(strings.spherical[1], "theta: 1.571 rad (90.0 deg)");
    }
}
