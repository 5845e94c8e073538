//! CLI configuration file support.
//!
//! ```toml
//! default_time_zone = "America/New_York"
//!
//! [thresholds]
//! closing_soon_minutes = 90
//! opening_soon_minutes = 60
//! ```
//!
//! Every key is optional.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hours_engine::StatusThresholds;
use serde::Deserialize;

const CONFIG_PATH_VAR: &str = "HOURS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "hours.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Zone label used for facilities whose own label is empty.
    pub default_time_zone: Option<String>,
    pub thresholds: StatusThresholds,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load from `explicit`, then `$HOURS_CONFIG`, then `./hours.toml`.
    /// With none of those present, built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_PATH_VAR).map(PathBuf::from) {
            return Self::from_file(&path);
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }
}
