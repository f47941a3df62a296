//! Rasterizes a 3D view (axes, aid lines and the point marker) onto a braille canvas.

use nalgebra::Vector3;

use super::braille::{BrailleCanvas, Dot};
use crate::aids::{AidLine, LineStyle};
use crate::color::{Axis, Rgb};
use crate::constants::{AXIS_LENGTH, POINT_RADIUS};
use crate::geometry::{PerspectiveCamera, Point3D};

pub const AXIS_PRIORITY: u8 = 1;
pub const PROJECTION_PRIORITY: u8 = 2;
pub const AID_PRIORITY: u8 = 3;
pub const MARKER_PRIORITY: u8 = 4;

/// Axis labels sit a little past the tips
const LABEL_OFFSET: f64 = 1.1;

/// An axis label in cell coordinates relative to the view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: char,
    pub color: Rgb,
}

/// World to dot-grid mapping for one camera
pub struct Projector<'a> {
    camera: &'a PerspectiveCamera,
    grid_w: f64,
    grid_h: f64,
}

impl<'a> Projector<'a> {
    pub fn new(camera: &'a PerspectiveCamera, canvas: &BrailleCanvas) -> Self {
        Self {
            camera,
            grid_w: canvas.grid_w as f64,
            grid_h: canvas.grid_h as f64,
        }
    }

    /// Dot coordinates (x right, y down) or `None` behind the camera
    pub fn to_dots(&self, world: &Point3D) -> Option<(f64, f64)> {
        let ndc = self.camera.project(world)?;
        Some((
            (ndc.x + 1.0) / 2.0 * self.grid_w,
            (1.0 - ndc.y) / 2.0 * self.grid_h,
        ))
    }

    /// Projected world length in dots, vertical
    pub fn size_in_dots(&self, world: &Point3D, length: f64) -> Option<f64> {
        self.camera
            .projected_size(world, length)
            .map(|ndc| ndc * self.grid_h / 2.0)
    }
}

/// Liang-Barsky clip of a segment to `[min, max]` on both axes
fn clip_segment(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-dx, x0 - min.0),
        (dx, max.0 - x0),
        (-dy, y0 - min.1),
        (dy, max.1 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
    }

    Some((
        (x0 + t0 * dx, y0 + t0 * dy),
        (x0 + t1 * dx, y0 + t1 * dy),
    ))
}

/// Draws `a`-`b`. Skipped when either end is behind the camera.
pub fn draw_segment(
    canvas: &mut BrailleCanvas,
    projector: &Projector,
    a: &Point3D,
    b: &Point3D,
    dot: Dot,
) {
    let (Some(pa), Some(pb)) = (projector.to_dots(a), projector.to_dots(b)) else {
        return;
    };
    let max = (canvas.grid_w as f64, canvas.grid_h as f64);
    let Some((pa, pb)) = clip_segment(pa, pb, (-1.0, -1.0), max) else {
        return;
    };
    canvas.line(
        pa.0.floor() as isize,
        pa.1.floor() as isize,
        pb.0.floor() as isize,
        pb.1.floor() as isize,
        dot,
    );
}

pub fn draw_polyline(
    canvas: &mut BrailleCanvas,
    projector: &Projector,
    vertices: &[Point3D],
    dot: Dot,
) {
    for pair in vertices.windows(2) {
        draw_segment(canvas, projector, &pair[0], &pair[1], dot);
    }
}

/// Dashes are laid out in world units along the cumulative `distances`,
/// so the pattern stays attached to the line as the camera moves.
pub fn draw_dashed(
    canvas: &mut BrailleCanvas,
    projector: &Projector,
    vertices: &[Point3D],
    distances: &[f64],
    dash: f64,
    gap: f64,
    dot: Dot,
) {
    let period = dash + gap;
    if period <= 0.0 {
        draw_polyline(canvas, projector, vertices, dot);
        return;
    }

    for i in 1..vertices.len().min(distances.len()) {
        let (a, b) = (vertices[i - 1], vertices[i]);
        let (start, end) = (distances[i - 1], distances[i]);
        let length = end - start;
        if length <= 0.0 {
            continue;
        }
        let at = |d: f64| a + (b - a) * ((d - start) / length);

        // Dash k covers [k * period, k * period + dash]
        let first = (start / period).floor() as i64;
        let last = (end / period).floor() as i64;
        for k in first..=last {
            let dash_start = k as f64 * period;
            let from = start.max(dash_start);
            let to = end.min(dash_start + dash);
            if from < to {
                draw_segment(canvas, projector, &at(from), &at(to), dot);
            }
        }
    }
}

pub fn draw_aid(canvas: &mut BrailleCanvas, projector: &Projector, line: &AidLine, color: Rgb) {
    let vertices = line.buffer.visible();
    match (line.style, line.buffer.line_distances()) {
        (LineStyle::Dashed { dash, gap }, Some(distances)) => {
            let dot = Dot {
                color,
                priority: PROJECTION_PRIORITY,
            };
            draw_dashed(canvas, projector, vertices, distances, dash, gap, dot);
        }
        _ => {
            let dot = Dot {
                color,
                priority: AID_PRIORITY,
            };
            draw_polyline(canvas, projector, vertices, dot);
        }
    }
}

fn axis_direction(axis: Axis) -> Vector3<f64> {
    match axis {
        Axis::X => Vector3::x(),
        Axis::Y => Vector3::y(),
        Axis::Z => Vector3::z(),
    }
}

/// Draws the three positive half-axes and returns their tip labels
pub fn draw_axes(
    canvas: &mut BrailleCanvas,
    projector: &Projector,
    color_of: impl Fn(Axis) -> Rgb,
) -> Vec<Label> {
    let origin = Point3D::zeros();
    let mut labels = Vec::new();

    for &axis in Axis::all() {
        let color = color_of(axis);
        let tip = axis_direction(axis) * AXIS_LENGTH;
        draw_segment(
            canvas,
            projector,
            &origin,
            &tip,
            Dot {
                color,
                priority: AXIS_PRIORITY,
            },
        );

        if let Some((x, y)) = projector.to_dots(&(tip * LABEL_OFFSET)) {
            if x >= 0.0 && y >= 0.0 && x < canvas.grid_w as f64 && y < canvas.grid_h as f64 {
                labels.push(Label {
                    col: (x / 2.0) as u16,
                    row: (y / 4.0) as u16,
                    text: axis.label(),
                    color,
                });
            }
        }
    }
    labels
}

/// Filled disc sized from the projected marker radius, at least one dot
pub fn draw_marker(canvas: &mut BrailleCanvas, projector: &Projector, point: &Point3D, color: Rgb) {
    let (Some((x, y)), Some(radius)) = (
        projector.to_dots(point),
        projector.size_in_dots(point, POINT_RADIUS),
    ) else {
        return;
    };
    canvas.disc(
        x,
        y,
        radius,
        Dot {
            color,
            priority: MARKER_PRIORITY,
        },
    );
}
