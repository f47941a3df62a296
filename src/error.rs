use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or writing the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config file already exists at {0:?} (use --force to overwrite)")]
    AlreadyExists(PathBuf),

    #[error("Failed to edit config file {path:?}: {source}")]
    Edit {
        path: PathBuf,
        source: toml_edit::TomlError,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
