//! Application state shared by input handling and rendering.
//!
//! `AppState` is the single owner of the point and everything derived from it.
//! [`AppState::set_point`] rewrites the spherical form, the aid buffers of both
//! views and the readouts in one call, so a frame can never observe a point
//! whose dependents are stale.

use nalgebra::{Vector2, Vector3};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Block;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

use crate::aids::{AidSet, CartesianAids, SphericalAids};
use crate::color::Theme;
use crate::config::Config;
use crate::constants::{CAMERA_FAR, CAMERA_NEAR, INITIAL_POINT, POINT_RADIUS};
use crate::display::frame_loop::StepControl;
use crate::drag::DragController;
use crate::geometry::{OrbitControls, PerspectiveCamera, Point3D, Sphere, Spherical};
use crate::readout::{format_readouts, DisplayStrings};

/// Readout lines under the panes, without the help line
pub const READOUT_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Cartesian,
    Spherical,
}

impl ViewKind {
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Cartesian => "Cartesian",
            ViewKind::Spherical => "Spherical",
        }
    }
}

/// One pane: its camera, its orbit controls and the cells it draws into
#[derive(Debug, Clone)]
pub struct View {
    pub kind: ViewKind,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    viewport: Rect,
}

impl View {
    pub fn new(kind: ViewKind, config: &Config) -> Self {
        let cam = &config.camera;
        let mut camera = PerspectiveCamera::new(cam.fov_deg, 1.0, CAMERA_NEAR, CAMERA_FAR);
        camera.position = Vector3::from(cam.position);
        camera.look_at(Vector3::zeros());

        let controls = OrbitControls::new(
            cam.rotate_speed,
            cam.zoom_speed,
            cam.min_distance..=cam.max_distance,
        )
        .with_damping(cam.enable_damping, cam.damping_factor);

        Self {
            kind,
            camera,
            controls,
            viewport: Rect::default(),
        }
    }

    /// Drawable cells, inside the pane border
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect, cell_aspect: f64) {
        self.viewport = viewport;
        if viewport.width > 0 && viewport.height > 0 {
            self.camera
                .set_aspect(viewport.width as f64 / (viewport.height as f64 * cell_aspect));
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.viewport.contains((col, row).into())
    }

    /// Center of a terminal cell in this view's normalized device coordinates.
    /// Cells outside the viewport map outside `[-1, 1]`.
    pub fn cell_to_ndc(&self, col: u16, row: u16) -> Vector2<f64> {
        let w = self.viewport.width.max(1) as f64;
        let h = self.viewport.height.max(1) as f64;
        let x = (col as f64 - self.viewport.x as f64 + 0.5) / w;
        let y = (row as f64 - self.viewport.y as f64 + 0.5) / h;
        Vector2::new(x * 2.0 - 1.0, -(y * 2.0) + 1.0)
    }
}

/// Pane rectangles (including borders) and the status area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub cartesian: Rect,
    pub spherical: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn pane(&self, kind: ViewKind) -> Rect {
        match kind {
            ViewKind::Cartesian => self.cartesian,
            ViewKind::Spherical => self.spherical,
        }
    }
}

pub fn screen_layout(area: Rect, show_help: bool) -> ScreenLayout {
    let status_rows = READOUT_ROWS + u16::from(show_help);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(status_rows)])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    ScreenLayout {
        cartesian: panes[0],
        spherical: panes[1],
        status: rows[1],
    }
}

pub fn pane_block(kind: ViewKind) -> Block<'static> {
    Block::bordered().title(format!(" {} ", kind.title()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Reset,
    ToggleTheme,
    ToggleHelp,
    /// Persist theme and help visibility to the config file
    SavePrefs,
    /// Orbit both views by whole key steps
    Orbit { left: i8, up: i8 },
}

/// Terminal input, already decoupled from the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown { col: u16, row: u16 },
    PointerMove { col: u16, row: u16 },
    PointerUp { col: u16, row: u16 },
    /// Positive steps zoom in
    Scroll { col: u16, row: u16, steps: i32 },
    Key(KeyAction),
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Gesture {
    #[default]
    Idle,
    DragPoint,
    Orbit { view: ViewKind, col: u16, row: u16 },
}

/// What changed since the previous frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameChanges {
    pub cameras_moved: bool,
    pub geometry_changed: bool,
}

pub struct AppState {
    point: Point3D,
    spherical: Spherical,
    readouts: DisplayStrings,
    pub cartesian_aids: CartesianAids,
    pub spherical_aids: SphericalAids,
    cartesian: View,
    spherical_view: View,
    drag: DragController,
    gesture: Gesture,
    pub theme: Theme,
    pub show_help: bool,
    screen: Rect,
    pick_radius: f64,
    key_rotate: f64,
    cell_aspect: f64,
    config_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let mut state = Self {
            point: Point3D::zeros(),
            spherical: Spherical::default(),
            readouts: DisplayStrings::default(),
            cartesian_aids: CartesianAids::new(),
            spherical_aids: SphericalAids::new(),
            cartesian: View::new(ViewKind::Cartesian, config),
            spherical_view: View::new(ViewKind::Spherical, config),
            drag: DragController::new(),
            gesture: Gesture::Idle,
            theme: config.display.theme,
            show_help: config.display.show_help,
            screen: Rect::default(),
            pick_radius: POINT_RADIUS * config.interaction.pick_scale,
            key_rotate: config.interaction.key_rotate_deg.to_radians(),
            cell_aspect: config.interaction.cell_aspect,
            config_path: None,
        };
        state.set_point(Vector3::from(INITIAL_POINT));
        state
    }

    /// Where `SavePrefs` writes to
    pub fn set_config_path(&mut self, path: Option<PathBuf>) {
        self.config_path = path;
    }

    pub fn point(&self) -> &Point3D {
        &self.point
    }

    pub fn spherical(&self) -> &Spherical {
        &self.spherical
    }

    pub fn readouts(&self) -> &DisplayStrings {
        &self.readouts
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn view(&self, kind: ViewKind) -> &View {
        match kind {
            ViewKind::Cartesian => &self.cartesian,
            ViewKind::Spherical => &self.spherical_view,
        }
    }

    fn view_mut(&mut self, kind: ViewKind) -> &mut View {
        match kind {
            ViewKind::Cartesian => &mut self.cartesian,
            ViewKind::Spherical => &mut self.spherical_view,
        }
    }

    /// Pick target around the point. Larger than the drawn marker so a
    /// braille-sized dot can still be grabbed.
    pub fn marker(&self) -> Sphere {
        Sphere {
            center: self.point,
            radius: self.pick_radius,
        }
    }

    /// Moves the point and rewrites everything derived from it
    pub fn set_point(&mut self, point: Point3D) {
        self.point = point;
        self.spherical = Spherical::from_point(&point);
        self.cartesian_aids.recompute(&self.point, &self.spherical);
        self.spherical_aids.recompute(&self.point, &self.spherical);
        self.readouts = format_readouts(&self.point, &self.spherical);
        trace!(
            "Point ({:.3}, {:.3}, {:.3}) -> r {:.3}, theta {:.3}, phi {:.3}",
            point.x,
            point.y,
            point.z,
            self.spherical.r,
            self.spherical.theta,
            self.spherical.phi
        );
    }

    pub fn reset(&mut self) {
        debug!("Point reset");
        self.set_point(Vector3::from(INITIAL_POINT));
    }

    /// Lays the panes out over `area` and updates both cameras' aspect
    pub fn resize(&mut self, area: Rect) {
        self.screen = area;
        let layout = screen_layout(area, self.show_help);
        let cell_aspect = self.cell_aspect;
        for view in [&mut self.cartesian, &mut self.spherical_view] {
            let pane = layout.pane(view.kind);
            view.set_viewport(pane_block(view.kind).inner(pane), cell_aspect);
        }
        debug!("Viewport resized to {}x{}", area.width, area.height);
    }

    fn view_at(&self, col: u16, row: u16) -> Option<ViewKind> {
        [ViewKind::Cartesian, ViewKind::Spherical]
            .into_iter()
            .find(|kind| self.view(*kind).contains(col, row))
    }

    /// Per-frame update: settles orbit damping in both views
    pub fn update(&mut self) -> FrameChanges {
        let cart = self.cartesian.controls.update(&mut self.cartesian.camera);
        let sph = self
            .spherical_view
            .controls
            .update(&mut self.spherical_view.camera);

        let mut geometry_changed = false;
        for line in self.cartesian_aids.lines_mut() {
            geometry_changed |= line.buffer.take_dirty();
        }
        for line in self.spherical_aids.lines_mut() {
            geometry_changed |= line.buffer.take_dirty();
        }

        FrameChanges {
            cameras_moved: cart || sph,
            geometry_changed,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> StepControl {
        match event {
            InputEvent::PointerDown { col, row } => self.pointer_down(col, row),
            InputEvent::PointerMove { col, row } => self.pointer_move(col, row),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Scroll { col, row, steps } => {
                if let Some(kind) = self.view_at(col, row) {
                    self.view_mut(kind).controls.zoom(steps);
                }
            }
            InputEvent::Key(action) => return self.key(action),
            InputEvent::Resize { width, height } => self.resize(Rect::new(0, 0, width, height)),
        }
        StepControl::Continue
    }

    fn pointer_down(&mut self, col: u16, row: u16) {
        // a release lost outside the terminal leaves the previous gesture open
        self.pointer_up();

        let Some(kind) = self.view_at(col, row) else {
            return;
        };

        if kind == ViewKind::Cartesian {
            let ndc = self.cartesian.cell_to_ndc(col, row);
            let marker = self.marker();
            let cartesian = &mut self.cartesian;
            if self
                .drag
                .pointer_down(ndc, &cartesian.camera, &marker, &mut cartesian.controls)
            {
                self.gesture = Gesture::DragPoint;
                return;
            }
        }

        if self.view(kind).controls.enabled {
            debug!("Orbit started in {} view", kind.title());
            self.gesture = Gesture::Orbit { view: kind, col, row };
        }
    }

    fn pointer_move(&mut self, col: u16, row: u16) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::DragPoint => {
                let ndc = self.cartesian.cell_to_ndc(col, row);
                if let Some(point) = self.drag.pointer_move(ndc, &self.cartesian.camera) {
                    self.set_point(point);
                }
            }
            Gesture::Orbit {
                view,
                col: last_col,
                row: last_row,
            } => {
                let cell_aspect = self.cell_aspect;
                let view_ref = self.view_mut(view);
                let dx = col as f64 - last_col as f64;
                let dy = (row as f64 - last_row as f64) * cell_aspect;
                let height = view_ref.viewport.height as f64 * cell_aspect;
                view_ref.controls.rotate_by_pointer(dx, dy, height);
                self.gesture = Gesture::Orbit { view, col, row };
            }
        }
    }

    fn pointer_up(&mut self) {
        if let Gesture::Orbit { view, .. } = self.gesture {
            debug!("Orbit ended in {} view", view.title());
        }
        self.drag.pointer_up(&mut self.cartesian.controls);
        self.gesture = Gesture::Idle;
    }

    fn key(&mut self, action: KeyAction) -> StepControl {
        match action {
            KeyAction::Quit => return StepControl::Stop,
            KeyAction::Reset => self.reset(),
            KeyAction::ToggleTheme => {
                self.theme = self.theme.next();
                debug!("Theme changed to {:?}", self.theme);
            }
            KeyAction::ToggleHelp => {
                self.show_help = !self.show_help;
                let screen = self.screen;
                self.resize(screen);
            }
            KeyAction::SavePrefs => match &self.config_path {
                Some(path) => match Config::save_display_prefs(path, self.theme, self.show_help) {
                    Ok(()) => info!("Saved display preferences to {}", path.display()),
                    Err(e) => warn!("{}", e),
                },
                None => warn!("No config path to save preferences to"),
            },
            KeyAction::Orbit { left, up } => {
                let step = self.key_rotate;
                for view in [&mut self.cartesian, &mut self.spherical_view] {
                    if view.controls.enabled {
                        view.controls.rotate_left(left as f64 * step);
                        view.controls.rotate_up(up as f64 * step);
                    }
                }
            }
        }
        StepControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aids::AidKind;
    use approx::assert_relative_eq;

    fn state() -> AppState {
        let mut config = Config::default();
        config.camera.enable_damping = false;
        let mut state = AppState::new(&config);
        state.resize(Rect::new(0, 0, 120, 40));
        state
    }

    fn cell_of(view: &View, world: &Point3D) -> (u16, u16) {
        let ndc = view.camera.project(world).unwrap();
        let vp = view.viewport();
        let col = vp.x as f64 + (ndc.x + 1.0) / 2.0 * vp.width as f64;
        let row = vp.y as f64 + (1.0 - ndc.y) / 2.0 * vp.height as f64;
        (col.floor() as u16, row.floor() as u16)
    }

    fn draw_count(aids: &dyn AidSet, kind: AidKind) -> usize {
        aids.lines()
            .iter()
            .find(|line| line.kind == kind)
            .map(|line| line.buffer.draw_count())
            .unwrap()
    }

    #[test]
    fn test_starts_at_initial_point_with_readouts() {
        let state = state();
        assert_eq!(*state.point(), Vector3::from(INITIAL_POINT));
        assert_eq!(state.readouts().cartesian[0], "x: 1.500");
        assert_eq!(state.readouts().spherical[0], "r: 2.166");
    }

    #[test]
    fn test_layout_splits_panes_and_sets_aspect() {
        let state = state();
        let cart = state.view(ViewKind::Cartesian).viewport();
        let sph = state.view(ViewKind::Spherical).viewport();
        assert_eq!(cart, Rect::new(1, 1, 58, 35));
        assert_eq!(sph, Rect::new(61, 1, 58, 35));
        assert_relative_eq!(
            state.view(ViewKind::Cartesian).camera.aspect,
            58.0 / (35.0 * 2.0)
        );
    }

    #[test]
    fn test_views_know_their_pane() {
        let state = state();
        let layout = screen_layout(Rect::new(0, 0, 120, 40), true);
        for kind in [ViewKind::Cartesian, ViewKind::Spherical] {
            let view = state.view(kind);
            assert_eq!(view.kind, kind);
            assert_eq!(view.viewport(), pane_block(kind).inner(layout.pane(kind)));
        }
    }

    #[test]
    fn test_cell_to_ndc_corners() {
        let state = state();
        let view = state.view(ViewKind::Cartesian);
        let vp = view.viewport();
        let top_left = view.cell_to_ndc(vp.x, vp.y);
        assert!(top_left.x < -0.9 && top_left.y > 0.9);
        let bottom_right = view.cell_to_ndc(vp.right() - 1, vp.bottom() - 1);
        assert!(bottom_right.x > 0.9 && bottom_right.y < -0.9);
    }

    #[test]
    fn test_drag_moves_point_and_syncs_everything() {
        let mut state = state();
        let (col, row) = cell_of(state.view(ViewKind::Cartesian), state.point());

        state.handle_input(InputEvent::PointerDown { col, row });
        assert!(state.is_dragging());
        assert!(!state.view(ViewKind::Cartesian).controls.enabled);

        state.handle_input(InputEvent::PointerMove {
            col: col + 6,
            row: row + 3,
        });
        let moved = *state.point();
        assert!((moved - Vector3::from(INITIAL_POINT)).norm() > 0.1);
        assert_eq!(*state.spherical(), Spherical::from_point(&moved));
        assert_eq!(
            *state.readouts(),
            format_readouts(&moved, &Spherical::from_point(&moved))
        );
        let radius = &state.cartesian_aids.lines()[0];
        assert_eq!(radius.buffer.positions()[1], moved);

        // released over the other pane
        state.handle_input(InputEvent::PointerUp { col: 100, row: 10 });
        assert!(!state.is_dragging());
        assert!(state.view(ViewKind::Cartesian).controls.enabled);
    }

    #[test]
    fn test_press_during_drag_ends_the_drag_first() {
        let mut state = state();
        let (col, row) = cell_of(state.view(ViewKind::Cartesian), state.point());
        state.handle_input(InputEvent::PointerDown { col, row });
        assert!(state.is_dragging());

        // release was lost; next press lands in the Spherical pane
        let before = state.view(ViewKind::Spherical).camera.position;
        state.handle_input(InputEvent::PointerDown { col: 90, row: 10 });
        assert!(!state.is_dragging());
        assert!(state.view(ViewKind::Cartesian).controls.enabled);

        state.handle_input(InputEvent::PointerMove { col: 96, row: 10 });
        state.handle_input(InputEvent::PointerUp { col: 96, row: 10 });
        assert!(!state.is_dragging());
        assert!(state.view(ViewKind::Cartesian).controls.enabled);
        assert!(state.update().cameras_moved);
        assert_ne!(state.view(ViewKind::Spherical).camera.position, before);
        assert_eq!(*state.point(), Vector3::from(INITIAL_POINT));
    }

    #[test]
    fn test_second_press_on_marker_restarts_drag() {
        let mut state = state();
        let (col, row) = cell_of(state.view(ViewKind::Cartesian), state.point());
        state.handle_input(InputEvent::PointerDown { col, row });
        state.handle_input(InputEvent::PointerDown { col, row });
        assert!(state.is_dragging());
        state.handle_input(InputEvent::PointerUp { col, row });
        assert!(!state.is_dragging());
        assert!(state.view(ViewKind::Cartesian).controls.enabled);
    }

    #[test]
    fn test_miss_in_cartesian_pane_orbits_instead() {
        let mut state = state();
        let before = state.view(ViewKind::Cartesian).camera.position;
        state.handle_input(InputEvent::PointerDown { col: 3, row: 3 });
        assert!(!state.is_dragging());
        state.handle_input(InputEvent::PointerMove { col: 13, row: 3 });
        state.handle_input(InputEvent::PointerUp { col: 13, row: 3 });
        let changes = state.update();
        assert!(changes.cameras_moved);
        assert_ne!(state.view(ViewKind::Cartesian).camera.position, before);
        assert_eq!(*state.point(), Vector3::from(INITIAL_POINT));
    }

    #[test]
    fn test_spherical_pane_never_drags() {
        let mut state = state();
        let cart_before = state.view(ViewKind::Cartesian).camera.position;
        let (col, row) = cell_of(state.view(ViewKind::Spherical), state.point());
        state.handle_input(InputEvent::PointerDown { col, row });
        assert!(!state.is_dragging());
        state.handle_input(InputEvent::PointerMove { col: col + 5, row });
        state.update();
        assert_eq!(*state.point(), Vector3::from(INITIAL_POINT));
        assert_eq!(state.view(ViewKind::Cartesian).camera.position, cart_before);
    }

    #[test]
    fn test_scroll_zooms_only_the_pane_under_pointer() {
        let mut state = state();
        let cart_dist = state.view(ViewKind::Cartesian).camera.distance_to_target();
        let sph_dist = state.view(ViewKind::Spherical).camera.distance_to_target();
        state.handle_input(InputEvent::Scroll {
            col: 90,
            row: 10,
            steps: 2,
        });
        state.update();
        assert_relative_eq!(
            state.view(ViewKind::Spherical).camera.distance_to_target(),
            sph_dist * 0.95 * 0.95,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            state.view(ViewKind::Cartesian).camera.distance_to_target(),
            cart_dist,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_point_on_z_axis_hides_azimuth_arc() {
        let mut state = state();
        state.set_point(Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(draw_count(&state.spherical_aids, AidKind::AzimuthArc), 0);
        assert!(draw_count(&state.spherical_aids, AidKind::PolarArc) > 0);
        assert_eq!(state.readouts().spherical[2], "phi: 0.000 rad (0.0 deg)");
    }

    #[test]
    fn test_update_reports_geometry_once() {
        let mut state = state();
        assert!(state.update().geometry_changed);
        assert!(!state.update().geometry_changed);
        state.set_point(Vector3::new(1.0, 2.0, 3.0));
        assert!(state.update().geometry_changed);
    }

    #[test]
    fn test_keys() {
        let mut state = state();
        state.set_point(Vector3::new(-1.0, 0.5, 0.0));
        assert_eq!(
            state.handle_input(InputEvent::Key(KeyAction::Reset)),
            StepControl::Continue
        );
        assert_eq!(*state.point(), Vector3::from(INITIAL_POINT));

        state.handle_input(InputEvent::Key(KeyAction::ToggleTheme));
        assert_eq!(state.theme, Theme::Dark);

        let tall = state.view(ViewKind::Cartesian).viewport().height;
        state.handle_input(InputEvent::Key(KeyAction::ToggleHelp));
        assert!(!state.show_help);
        assert_eq!(state.view(ViewKind::Cartesian).viewport().height, tall + 1);

        let before = state.view(ViewKind::Spherical).camera.position;
        state.handle_input(InputEvent::Key(KeyAction::Orbit { left: 1, up: 0 }));
        state.update();
        assert_ne!(state.view(ViewKind::Spherical).camera.position, before);

        assert_eq!(
            state.handle_input(InputEvent::Key(KeyAction::Quit)),
            StepControl::Stop
        );
    }

    #[test]
    fn test_save_prefs_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut state = state();
        state.set_config_path(Some(path.clone()));
        state.handle_input(InputEvent::Key(KeyAction::ToggleTheme));
        state.handle_input(InputEvent::Key(KeyAction::SavePrefs));

        let saved = Config::load(&path).unwrap();
        assert_eq!(saved.display.theme, Theme::Dark);
        assert!(saved.display.show_help);
    }
}
