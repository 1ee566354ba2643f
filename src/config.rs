//! Rotation configuration.
//!
//! Every setting has a stock default that reproduces the standard project
//! layout, so a project without a config file needs no setup at all:
//!
//! ```text
//! <root>/
//! ├── daily-rotate.toml        # Optional overrides
//! ├── daily/
//! │   ├── manifest.json        # Epoch + ordered puzzle ids
//! │   └── puzzles/
//! │       ├── p-0001.pl8       # One MessagePack record per id
//! │       └── ...
//! └── daily.pl8                # Output pack (rewritten every run)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! manifest = "daily/manifest.json"
//! puzzles_dir = "daily/puzzles"
//! extension = "pl8"
//! output = "daily.pl8"
//!
//! [pack]
//! id = "daily"
//! title = "Daily Puzzles"
//! max_window = 7
//! ```
//!
//! Relative paths resolve against the project root; absolute paths are used
//! as-is. The file is sparse: user values are merged on top of the stock
//! defaults, and unknown keys are rejected to catch typos early.

use crate::merge::DirSource;
use crate::window::MAX_WINDOW;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional config file in the project root.
pub const CONFIG_FILENAME: &str = "daily-rotate.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `daily-rotate.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RotateConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Output pack identity and window size.
    pub pack: PackConfig,
}

/// File locations, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub manifest: PathBuf,
    pub puzzles_dir: PathBuf,
    /// Extension of per-puzzle files, without the dot.
    pub extension: String,
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("daily/manifest.json"),
            puzzles_dir: PathBuf::from("daily/puzzles"),
            extension: "pl8".to_string(),
            output: PathBuf::from("daily.pl8"),
        }
    }
}

/// Identity of the generated pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    pub id: String,
    pub title: String,
    /// Maximum number of puzzles in the window.
    pub max_window: usize,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            id: "daily".to_string(),
            title: "Daily Puzzles".to_string(),
            max_window: MAX_WINDOW,
        }
    }
}

impl RotateConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pack.max_window == 0 {
            return Err(ConfigError::Validation(
                "pack.max_window must be at least 1".into(),
            ));
        }
        if self.pack.id.trim().is_empty() {
            return Err(ConfigError::Validation("pack.id must not be empty".into()));
        }
        let ext = self.paths.extension.trim();
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Validation(
                "paths.extension must be non-empty and given without a leading dot".into(),
            ));
        }
        Ok(())
    }

    /// Resolve every path against the project root.
    pub fn layout(&self, root: &Path) -> Layout {
        Layout {
            manifest: root.join(&self.paths.manifest),
            puzzles_dir: root.join(&self.paths.puzzles_dir),
            extension: self.paths.extension.clone(),
            output: root.join(&self.paths.output),
        }
    }
}

/// Concrete file locations for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub manifest: PathBuf,
    pub puzzles_dir: PathBuf,
    pub extension: String,
    pub output: PathBuf,
}

impl Layout {
    /// Filesystem source for the puzzle records.
    pub fn puzzle_source(&self) -> DirSource {
        DirSource::new(&self.puzzles_dir, &self.extension)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(RotateConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `daily-rotate.toml` from the project root as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config for a project root: stock defaults, then the user's file on top.
pub fn load_config(root: &Path) -> Result<RotateConfig, ConfigError> {
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(stock_defaults_value()?, overlay),
        None => stock_defaults_value()?,
    };
    let config: RotateConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `daily-rotate.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# daily-rotate configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# File locations (relative to the project root unless absolute)
# ---------------------------------------------------------------------------
[paths]
# JSON manifest: { "epoch": "YYYY-MM-DD", "puzzles": [{ "id": "..." }, ...] }
manifest = "daily/manifest.json"

# Directory holding one MessagePack file per puzzle id.
puzzles_dir = "daily/puzzles"

# Extension of the per-puzzle files, without the dot.
extension = "pl8"

# Output pack. Replaced completely on every run.
output = "daily.pl8"

# ---------------------------------------------------------------------------
# Output pack
# ---------------------------------------------------------------------------
[pack]
id = "daily"
title = "Daily Puzzles"

# How many days of puzzles are exposed at once (today plus earlier days).
max_window = 7
"##
}
