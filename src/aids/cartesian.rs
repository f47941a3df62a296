//! Aids of the Cartesian view: the radius line and the dashed projections
//! that drop the point onto the XY plane and from there onto the X and Y axes.

use nalgebra::Vector3;

use super::{AidGeometry, AidKind, AidLine, AidSet, LineStyle};
use crate::geometry::{Point3D, Spherical};

/// Origin to point
pub fn radius_line(point: &Point3D) -> AidGeometry {
    AidGeometry::visible(vec![Vector3::zeros(), *point])
}

fn xy_foot(point: &Point3D) -> Point3D {
    Vector3::new(point.x, point.y, 0.0)
}

/// Point straight down (or up) to `(x, y, 0)`
pub fn drop_to_xy_plane(point: &Point3D) -> AidGeometry {
    AidGeometry::visible(vec![*point, xy_foot(point)])
}

/// `(x, y, 0)` to `(x, 0, 0)`
pub fn xy_to_x_axis(point: &Point3D) -> AidGeometry {
    AidGeometry::visible(vec![xy_foot(point), Vector3::new(point.x, 0.0, 0.0)])
}

/// `(x, y, 0)` to `(0, y, 0)`
pub fn xy_to_y_axis(point: &Point3D) -> AidGeometry {
    AidGeometry::visible(vec![xy_foot(point), Vector3::new(0.0, point.y, 0.0)])
}

const RADIUS: usize = 0;
const DROP: usize = 1;
const TO_X: usize = 2;
const TO_Y: usize = 3;

pub struct CartesianAids {
    lines: Vec<AidLine>,
}

impl CartesianAids {
    pub fn new() -> Self {
        let lines = vec![
            AidLine::new("radius", AidKind::CartesianRadius, LineStyle::Solid, 2),
            AidLine::new("drop to xy", AidKind::Projection, LineStyle::dashed(), 2),
            AidLine::new("to x axis", AidKind::Projection, LineStyle::dashed(), 2),
            AidLine::new("to y axis", AidKind::Projection, LineStyle::dashed(), 2),
        ];
        Self { lines }
    }
}

impl Default for CartesianAids {
    fn default() -> Self {
        Self::new()
    }
}

impl AidSet for CartesianAids {
    fn recompute(&mut self, point: &Point3D, _spherical: &Spherical) {
        self.lines[RADIUS].buffer.upload(&radius_line(point));
        self.lines[DROP].buffer.upload(&drop_to_xy_plane(point));
        self.lines[TO_X].buffer.upload(&xy_to_x_axis(point));
        self.lines[TO_Y].buffer.upload(&xy_to_y_axis(point));
    }

    fn lines(&self) -> &[AidLine] {
        &self.lines
    }

    fn lines_mut(&mut self) -> &mut [AidLine] {
        &mut self.lines
    }
}
