//! Application configuration.
//!
//! One [`Config`] value is constructed at startup and passed by reference into
//! the components that need it; there is no ambient global state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration in {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings for one run of the booklet generator.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Path to the JSON show data consumed by the record provider.
    pub data_file: PathBuf,
    /// Directory holding the TTF font files; falls back to the bundled fonts.
    pub fonts_dir: Option<PathBuf>,
    /// Background image placed at the top of the title page.
    pub title_image: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("show_data.json"),
            fonts_dir: None,
            title_image: None,
        }
    }
}

impl Config {
    /// Loads the configuration from the JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
