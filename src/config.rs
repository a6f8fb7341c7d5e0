//! Configuration file handling.
//!
//! A program may keep default option values in a TOML file:
//!
//! ```toml
//! [options]
//! environment = "test"
//! all = true
//! ```
//!
//! Values from the file sit between the program's own seeds and the command
//! line: anything given as a switch wins.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::options::OptionSet;

/// Option key naming a configuration file chosen on the command line.
pub const CONFIG_KEY: &str = "config";

/// Contents of a configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default option values, keyed like the option set.
    #[serde(default)]
    pub options: OptionSet,
}

impl Config {
    /// Returns the default config file path for `program` on this platform.
    pub fn default_path(program: &str) -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(program)
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields the
    /// empty configuration.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Self::parse_toml(&content, path)
    }

    /// Loads a file the user named explicitly; here a missing file is an
    /// error.
    pub fn load_required(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Fills keys missing from `options` with this file's values.
    pub fn apply_to(&self, options: &mut OptionSet) {
        options.merge_defaults(&self.options);
    }
}
