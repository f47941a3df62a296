use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::color::Theme;
use crate::error::{io_err, ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub fps: u32,
    pub theme: Theme,
    pub show_help: bool,
}

/// Initial camera placement and orbit behavior, shared by both views
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_deg: f64,
    pub position: [f64; 3],
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Marker hit sphere radius as a multiple of the drawn marker radius
    pub pick_scale: f64,
    /// Height / width of one terminal cell
    pub cell_aspect: f64,
    /// Orbit step of the arrow keys, degrees
    pub key_rotate_deg: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            theme: Theme::Light,
            show_help: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            position: [3.0, 3.0, 4.0],
            enable_damping: true,
            damping_factor: 0.1,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 1.0,
            max_distance: 20.0,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            pick_scale: 3.0,
            cell_aspect: 2.0,
            key_rotate_deg: 5.0,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config path (~/.config/coordsync/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("coordsync").join("config.toml"))
    }

    /// Load config from the default path if it exists.
    /// Returns None if the file doesn't exist; logs a warning when it is broken.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return None;
        }
        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("{}. Using defaults.", e);
                None
            }
        }
    }

    /// Write the commented template to the default path, returns the path
    pub fn init_default_config(force: bool) -> Result<PathBuf> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        Self::write_template(&path, force)?;
        Ok(path)
    }

    pub fn write_template(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }
        std::fs::write(path, Self::generate_config_template()).map_err(|e| io_err(path, e))
    }

    /// Writes the display preferences into the file at `path`, keeping its
    /// comments and every other setting. A missing file starts from the template.
    pub fn save_display_prefs(path: &Path, theme: Theme, show_help: bool) -> Result<()> {
        if !path.exists() {
            Self::write_template(path, false)?;
            info!("Created config file at {}", path.display());
        }

        let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .map_err(|source| ConfigError::Edit {
                path: path.to_path_buf(),
                source,
            })?;

        // Ensure [display] section exists
        if !doc.contains_key("display") {
            doc["display"] = toml_edit::table();
        }
        doc["display"]["theme"] = toml_edit::value(theme.name());
        doc["display"]["show_help"] = toml_edit::value(show_help);

        std::fs::write(path, doc.to_string()).map_err(|e| io_err(path, e))
    }

    /// Reject values the views cannot work with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.display.fps == 0 {
            return invalid("display.fps must be at least 1".to_string());
        }
        let camera = &self.camera;
        let interaction = &self.interaction;
        // max_distance alone may be inf (no outer limit)
        let finite = [
            ("camera.fov_deg", camera.fov_deg),
            ("camera.position[0]", camera.position[0]),
            ("camera.position[1]", camera.position[1]),
            ("camera.position[2]", camera.position[2]),
            ("camera.damping_factor", camera.damping_factor),
            ("camera.rotate_speed", camera.rotate_speed),
            ("camera.zoom_speed", camera.zoom_speed),
            ("camera.min_distance", camera.min_distance),
            ("interaction.pick_scale", interaction.pick_scale),
            ("interaction.cell_aspect", interaction.cell_aspect),
            ("interaction.key_rotate_deg", interaction.key_rotate_deg),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, value)| !value.is_finite()) {
            return invalid(format!("{} must be a finite number, got {}", name, value));
        }

        if !(camera.fov_deg > 0.0 && camera.fov_deg < 180.0) {
            return invalid(format!(
                "camera.fov_deg must be in (0, 180), got {}",
                camera.fov_deg
            ));
        }
        if !(camera.damping_factor > 0.0 && camera.damping_factor <= 1.0) {
            return invalid(format!(
                "camera.damping_factor must be in (0, 1], got {}",
                camera.damping_factor
            ));
        }
        if camera.max_distance.is_nan()
            || camera.min_distance < 0.0
            || camera.min_distance > camera.max_distance
        {
            return invalid(format!(
                "camera.min_distance ({}) must be between 0 and camera.max_distance ({})",
                camera.min_distance, camera.max_distance
            ));
        }
        if camera.position.iter().all(|c| *c == 0.0) {
            return invalid("camera.position must not be the origin".to_string());
        }
        if self.interaction.pick_scale <= 0.0 {
            return invalid(format!(
                "interaction.pick_scale must be positive, got {}",
                self.interaction.pick_scale
            ));
        }
        if self.interaction.cell_aspect <= 0.0 {
            return invalid(format!(
                "interaction.cell_aspect must be positive, got {}",
                self.interaction.cell_aspect
            ));
        }
        Ok(())
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# coordsync configuration
# This file is auto-generated. Edit as needed.

[display]
# Frames per second of the render loop
fps = 60
# Color theme: "light" or "dark"
theme = "light"
# Show the key help line under the readouts
show_help = true

[camera]
# Vertical field of view in degrees
fov_deg = 60.0
# Initial camera position (both views look at the origin)
position = [3.0, 3.0, 4.0]
# Smooth out orbit motion
enable_damping = true
# Share of the pending rotation applied per frame (0.0-1.0]
damping_factor = 0.1
# Orbit speed multiplier
rotate_speed = 1.0
# Scroll zoom speed multiplier
zoom_speed = 1.0
# Closest and farthest camera distance
min_distance = 1.0
max_distance = 20.0

[interaction]
# Grab radius around the point, as a multiple of the point's radius
pick_scale = 3.0
# Height / width of one terminal cell
cell_aspect = 2.0
# Arrow key orbit step in degrees
key_rotate_deg = 5.0
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::RunArgs) {
        if let Some(fps) = args.fps {
            self.display.fps = fps;
        }
        if let Some(theme) = args.theme {
            self.display.theme = theme;
        }
        if args.no_damping {
            self.camera.enable_damping = false;
        }
        if args.no_help {
            self.display.show_help = false;
        }
    }
}
