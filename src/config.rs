// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the TOML
//! configuration and applying command-line overrides on top of it.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Config file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Values given on the command line that win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub log_level: Option<String>,
}

/// Load configuration from a TOML file.
///
/// A missing file means defaults. A file that exists but does not parse
/// falls back to defaults with a warning.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        log::debug!("No config at {:?}, using defaults", path);
        return Config::default();
    }
    Config::load_or_default(path)
}

/// Load configuration, apply overrides and validate the result.
pub fn load_all(path: &Path, overrides: &Overrides) -> Result<Config> {
    let mut config = load_config(path);

    if let Some(base_url) = &overrides.base_url {
        config.store.base_url = base_url.clone();
    }
    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }

    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;

    Ok(config)
}
