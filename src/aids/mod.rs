//! Visual aids: the derived lines and arcs drawn around the point.
//!
//! Every aid is a fixed-capacity [`LineBuffer`] allocated once when its view is
//! built. A point change runs the aid's pure `recompute` function and uploads
//! the result into the buffer in place; only the vertex data and the draw
//! range change. An arc whose angle is undefined for the current point is
//! hidden by a draw range of zero.

mod cartesian;
mod spherical;

pub use cartesian::{drop_to_xy_plane, radius_line, xy_to_x_axis, xy_to_y_axis, CartesianAids};
pub use spherical::{azimuth_arc, polar_arc, SphericalAids};

use crate::constants::{DASH_SIZE, GAP_SIZE};
use crate::geometry::{Point3D, Spherical};

/// Which aid a buffer holds. The renderer picks colors by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AidKind {
    /// Origin to point, Cartesian view
    CartesianRadius,
    /// Dashed drop/projection line, Cartesian view
    Projection,
    /// Origin to point, spherical view
    SphericalRadius,
    /// Arc sweeping the polar angle
    PolarArc,
    /// Arc sweeping the azimuth in the XY plane
    AzimuthArc,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    Solid,
    Dashed { dash: f64, gap: f64 },
}

impl LineStyle {
    pub fn dashed() -> Self {
        LineStyle::Dashed {
            dash: DASH_SIZE,
            gap: GAP_SIZE,
        }
    }
}

/// Output of a pure recompute step, before it is written into a buffer
#[derive(Debug, Clone, PartialEq)]
pub struct AidGeometry {
    pub vertices: Vec<Point3D>,
    /// Number of leading vertices to draw
    pub draw_count: usize,
}

impl AidGeometry {
    pub fn visible(vertices: Vec<Point3D>) -> Self {
        let draw_count = vertices.len();
        Self {
            vertices,
            draw_count,
        }
    }

    pub fn hidden(vertices: Vec<Point3D>) -> Self {
        Self {
            vertices,
            draw_count: 0,
        }
    }
}

/// Fixed-size vertex buffer with a draw range.
///
/// Mirrors what a GPU line geometry exposes: positions are overwritten in
/// place, a dirty flag tells the renderer to re-read them, and dashed lines
/// carry cumulative distances that go stale whenever a position changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBuffer {
    positions: Vec<Point3D>,
    draw_count: usize,
    line_distances: Option<Vec<f64>>,
    dirty: bool,
}

impl LineBuffer {
    pub fn new(capacity: usize, with_distances: bool) -> Self {
        Self {
            positions: vec![Point3D::zeros(); capacity],
            draw_count: capacity,
            line_distances: with_distances.then(|| vec![0.0; capacity]),
            dirty: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Point3D] {
        &self.positions
    }

    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    /// Clamped to the capacity
    pub fn set_draw_range(&mut self, count: usize) {
        self.draw_count = count.min(self.capacity());
    }

    /// The vertices inside the draw range
    pub fn visible(&self) -> &[Point3D] {
        &self.positions[..self.draw_count]
    }

    pub fn line_distances(&self) -> Option<&[f64]> {
        self.line_distances.as_deref()
    }

    /// Cumulative distance from the first vertex to each vertex
    pub fn compute_line_distances(&mut self) {
        if let Some(distances) = self.line_distances.as_mut() {
            let mut total = 0.0;
            for (i, slot) in distances.iter_mut().enumerate() {
                if i > 0 {
                    total += (self.positions[i] - self.positions[i - 1]).norm();
                }
                *slot = total;
            }
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Writes `geometry` into the buffer in place. Extra input vertices are
    /// dropped; missing ones repeat the last provided vertex.
    pub fn upload(&mut self, geometry: &AidGeometry) {
        let fallback = geometry
            .vertices
            .last()
            .copied()
            .unwrap_or_else(Point3D::zeros);
        for (i, slot) in self.positions.iter_mut().enumerate() {
            *slot = geometry.vertices.get(i).copied().unwrap_or(fallback);
        }
        self.set_draw_range(geometry.draw_count);
        self.compute_line_distances();
        self.mark_dirty();
    }
}

/// One aid: its kind, its line style and its buffer
#[derive(Debug, Clone, PartialEq)]
pub struct AidLine {
    pub name: &'static str,
    pub kind: AidKind,
    pub style: LineStyle,
    pub buffer: LineBuffer,
}

impl AidLine {
    pub fn new(name: &'static str, kind: AidKind, style: LineStyle, capacity: usize) -> Self {
        let dashed = matches!(style, LineStyle::Dashed { .. });
        Self {
            name,
            kind,
            style,
            buffer: LineBuffer::new(capacity, dashed),
        }
    }
}

/// The aids of one view
pub trait AidSet {
    /// Rewrites every buffer from the current point
    fn recompute(&mut self, point: &Point3D, spherical: &Spherical);

    fn lines(&self) -> &[AidLine];

    fn lines_mut(&mut self) -> &mut [AidLine];
}
