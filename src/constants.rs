//! Compile-time scene constants

/// Radius of the draggable point marker (world units)
pub const POINT_RADIUS: f64 = 0.1;
/// Length of each drawn coordinate axis
pub const AXIS_LENGTH: f64 = 3.0;
/// Segments used to tessellate every arc, regardless of its angular length
pub const ARC_SEGMENTS: usize = 64;
/// Where the point starts, and where `r` puts it back
pub const INITIAL_POINT: [f64; 3] = [1.5, 1.0, 1.2];

/// Below this radius an angle is considered undefined and its arc is hidden
pub const EPSILON: f64 = 1e-6;

// Dashed projection lines
/// Visible length of one dash (world units)
pub const DASH_SIZE: f64 = 0.1;
/// Gap between two dashes (world units)
pub const GAP_SIZE: f64 = 0.05;

// Camera clipping
/// Near clipping distance of the perspective cameras
pub const CAMERA_NEAR: f64 = 0.1;
/// Far clipping distance of the perspective cameras
pub const CAMERA_FAR: f64 = 100.0;
