//! Loading [`SessionConfig`] from TOML files.

use std::path::{Path, PathBuf};

use crate::core::{ConfigError, SessionConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Load configuration from a TOML file.
///
/// Missing keys take their default values.
pub fn load(path: &Path) -> Result<SessionConfig, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config: SessionConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file, falling back to defaults if the file
/// does not exist.
pub fn load_or_default(path: &Path) -> Result<SessionConfig, LoadError> {
    if path.exists() {
        load(path)
    } else {
        tracing::warn!(path = %path.display(), "config file not found, using defaults");
        Ok(SessionConfig::default())
    }
}
