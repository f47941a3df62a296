//! Orbit-style camera controls.
//!
//! The camera circles `target` on a sphere whose pole is the camera's up
//! axis (+Y). Input accumulates into a pending rotation; [`OrbitControls::update`]
//! applies it once per frame, either fully or, with damping enabled, a
//! `damping_factor` share of it that decays over the following frames.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use nalgebra::Vector3;

use super::camera::PerspectiveCamera;
use super::spherical::Point3D;

/// Keeps the orbit away from the up axis, where `look_at` has no valid basis
const POLE_MARGIN: f64 = 1e-6;
/// Below this the pending rotation is considered settled
const SETTLED: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct OrbitDelta {
    /// Around the up axis
    theta: f64,
    /// Away from the up axis
    phi: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// When false, pointer and wheel input is ignored. Pending damping still settles.
    pub enabled: bool,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub target: Point3D,
    delta: OrbitDelta,
    scale: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f64::INFINITY,
            target: Vector3::zeros(),
            delta: OrbitDelta::default(),
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    /// Undamped controls with the given speeds and distance bounds
    pub fn new(rotate_speed: f64, zoom_speed: f64, distance: RangeInclusive<f64>) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            min_distance: *distance.start(),
            max_distance: *distance.end(),
            ..Self::default()
        }
    }

    pub fn with_damping(mut self, enable: bool, factor: f64) -> Self {
        self.enable_damping = enable;
        self.damping_factor = factor;
        self
    }

    pub fn rotate_left(&mut self, angle: f64) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f64) {
        self.delta.phi -= angle;
    }

    /// Pointer moved by `(dx, dy)` while rotating, in the same units as
    /// `viewport_height`. A drag across the full height turns a full circle.
    pub fn rotate_by_pointer(&mut self, dx: f64, dy: f64, viewport_height: f64) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        self.rotate_left(2.0 * PI * dx / viewport_height * self.rotate_speed);
        self.rotate_up(2.0 * PI * dy / viewport_height * self.rotate_speed);
    }

    fn zoom_scale(&self) -> f64 {
        0.95_f64.powf(self.zoom_speed)
    }

    /// Wheel input: positive steps move closer, negative steps move away
    pub fn zoom(&mut self, steps: i32) {
        if !self.enabled || steps == 0 {
            return;
        }
        let step = self.zoom_scale();
        if steps > 0 {
            self.scale *= step.powi(steps);
        } else {
            self.scale /= step.powi(-steps);
        }
    }

    /// True while damped rotation is still settling
    pub fn is_settling(&self) -> bool {
        self.delta.theta.abs() > SETTLED || self.delta.phi.abs() > SETTLED
    }

    /// Applies pending input to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.norm();

        let (mut theta, mut phi) = if radius == 0.0 {
            (0.0, PI / 2.0)
        } else {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        };

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.delta.theta * share;
        phi += self.delta.phi * share;
        phi = phi.clamp(POLE_MARGIN, PI - POLE_MARGIN);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let sin_phi_radius = phi.sin() * radius;
        let new_offset = Vector3::new(
            sin_phi_radius * theta.sin(),
            phi.cos() * radius,
            sin_phi_radius * theta.cos(),
        );

        let previous = camera.position;
        camera.position = self.target + new_offset;
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta.theta *= 1.0 - self.damping_factor;
            self.delta.phi *= 1.0 - self.damping_factor;
            if !self.is_settling() {
                self.delta = OrbitDelta::default();
            }
        } else {
            self.delta = OrbitDelta::default();
        }
        self.scale = 1.0;

        (camera.position - previous).norm_squared() > SETTLED * SETTLED
    }
}
