//! Pointer drag of the point marker.
//!
//! Pointer-down over the marker starts a session: the drag plane faces the
//! camera and passes through the clicked spot on the marker, and the offset
//! between that spot and the marker center is kept so the point does not
//! jump under the pointer. Orbit input is disabled for the whole session.

use nalgebra::{Vector2, Vector3};
use tracing::debug;

use crate::geometry::{OrbitControls, PerspectiveCamera, Plane, Point3D, Sphere};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub plane: Plane,
    /// Clicked spot minus marker center
    pub offset: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Starts a drag when the pointer ray hits `marker`. Returns whether it did.
    pub fn pointer_down(
        &mut self,
        ndc: Vector2<f64>,
        camera: &PerspectiveCamera,
        marker: &Sphere,
        controls: &mut OrbitControls,
    ) -> bool {
        let ray = camera.ray_from_ndc(ndc);
        let Some(hit) = ray.intersect_sphere(marker) else {
            return false;
        };

        let plane = Plane::from_normal_and_coplanar_point(-camera.world_direction(), &hit);
        let offset = hit - marker.center;
        self.state = DragState::Dragging(DragSession { plane, offset });
        controls.enabled = false;

        debug!(
            "Drag started at ({:.3}, {:.3}, {:.3}), offset ({:.3}, {:.3}, {:.3})",
            hit.x, hit.y, hit.z, offset.x, offset.y, offset.z
        );
        true
    }

    /// New point position for the pointer at `ndc`, or `None` when idle or
    /// when the ray does not meet the drag plane (the point holds still).
    pub fn pointer_move(&self, ndc: Vector2<f64>, camera: &PerspectiveCamera) -> Option<Point3D> {
        let DragState::Dragging(session) = &self.state else {
            return None;
        };
        let ray = camera.ray_from_ndc(ndc);
        ray.intersect_plane(&session.plane)
            .map(|hit| hit - session.offset)
    }

    /// Ends the session wherever the pointer is. Returns whether one was active.
    pub fn pointer_up(&mut self, controls: &mut OrbitControls) -> bool {
        if !self.is_dragging() {
            return false;
        }
        self.state = DragState::Idle;
        controls.enabled = true;
        debug!("Drag ended");
        true
    }
}
