//! Aids of the spherical view: radius line, polar arc and azimuth arc.

use nalgebra::Vector3;

use super::cartesian::radius_line;
use super::{AidGeometry, AidKind, AidLine, AidSet, LineStyle};
use crate::constants::{ARC_SEGMENTS, EPSILON};
use crate::geometry::{Point3D, Spherical};

/// `segments + 1` points at radius `r` and fixed azimuth `phi`, sweeping the
/// polar angle from the +Z axis (`0`) to `theta`. Ends on the point itself.
/// Hidden when the point sits at the origin.
pub fn polar_arc(spherical: &Spherical, segments: usize) -> AidGeometry {
    let segments = segments.max(1);
    let (sin_phi, cos_phi) = spherical.phi.sin_cos();
    let vertices = (0..=segments)
        .map(|i| {
            let theta = spherical.theta * i as f64 / segments as f64;
            let (sin_theta, cos_theta) = theta.sin_cos();
            Vector3::new(
                spherical.r * sin_theta * cos_phi,
                spherical.r * sin_theta * sin_phi,
                spherical.r * cos_theta,
            )
        })
        .collect();

    if spherical.r > EPSILON {
        AidGeometry::visible(vertices)
    } else {
        AidGeometry::hidden(vertices)
    }
}

/// `segments + 1` points in the `z = 0` plane at the radius of the point's XY
/// projection, sweeping from the +X axis (`0`) to `phi`. Negative azimuths
/// sweep clockwise. Hidden when the point is on the Z axis.
pub fn azimuth_arc(point: &Point3D, phi: f64, segments: usize) -> AidGeometry {
    let segments = segments.max(1);
    let radius_xy = (point.x * point.x + point.y * point.y).sqrt();
    let vertices = (0..=segments)
        .map(|i| {
            let angle = phi * i as f64 / segments as f64;
            let (sin_a, cos_a) = angle.sin_cos();
            Vector3::new(radius_xy * cos_a, radius_xy * sin_a, 0.0)
        })
        .collect();

    if radius_xy > EPSILON {
        AidGeometry::visible(vertices)
    } else {
        AidGeometry::hidden(vertices)
    }
}

const RADIUS: usize = 0;
const POLAR: usize = 1;
const AZIMUTH: usize = 2;

pub struct SphericalAids {
    lines: Vec<AidLine>,
    segments: usize,
}

impl SphericalAids {
    pub fn new() -> Self {
        Self::with_segments(ARC_SEGMENTS)
    }

    pub fn with_segments(segments: usize) -> Self {
        let segments = segments.max(1);
        let lines = vec![
            AidLine::new("radius", AidKind::SphericalRadius, LineStyle::Solid, 2),
            AidLine::new("polar arc", AidKind::PolarArc, LineStyle::Solid, segments + 1),
            AidLine::new("azimuth arc", AidKind::AzimuthArc, LineStyle::Solid, segments + 1),
        ];
        Self { lines, segments }
    }
}

impl Default for SphericalAids {
    fn default() -> Self {
        Self::new()
    }
}

impl AidSet for SphericalAids {
    fn recompute(&mut self, point: &Point3D, spherical: &Spherical) {
        self.lines[RADIUS].buffer.upload(&radius_line(point));
        self.lines[POLAR]
            .buffer
            .upload(&polar_arc(spherical, self.segments));
        self.lines[AZIMUTH]
            .buffer
            .upload(&azimuth_arc(point, spherical.phi, self.segments));
    }

    fn lines(&self) -> &[AidLine] {
        &self.lines
    }

    fn lines_mut(&mut self) -> &mut [AidLine] {
        &mut self.lines
    }
}
