//! Configuration file support for polyband.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/polyband/config.toml`. Settings cover the polygon tool's
//! minimum-size gating and vertex handle sizing.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

pub use types::{HandleConfig, ToolConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# polyband configuration

[tool]
# Minimum rubberband size (image pixels) for a pointer-up to commit a vertex.
# A gesture passes when EITHER dimension reaches its minimum.
min_selection_width = 4.0
min_selection_height = 4.0

# Start drawing on a plain click instead of requiring a drag
draw_on_single_click = false

[handles]
# Vertex handle radius at zoom 1.0 (mouse and touch input)
radius = 6.0
touch_radius = 12.0
"#;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [tool]
/// min_selection_width = 4.0
/// min_selection_height = 4.0
/// draw_on_single_click = false
///
/// [handles]
/// radius = 6.0
/// touch_radius = 12.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Polygon tool gating
    #[serde(default)]
    pub tool: ToolConfig,

    /// Vertex handle sizing
    #[serde(default)]
    pub handles: HandleConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `min_selection_width` / `min_selection_height`: must be positive, else 4.0
    /// - `handles.radius` / `handles.touch_radius`: 1.0 - 30.0
    pub(crate) fn validate_and_clamp(&mut self) {
        // A zero or negative minimum behaves like an unset option
        if !(self.tool.min_selection_width.is_finite() && self.tool.min_selection_width > 0.0) {
            log::warn!(
                "Invalid min_selection_width {:.1}, falling back to {:.1}",
                self.tool.min_selection_width,
                types::default_min_selection_width()
            );
            self.tool.min_selection_width = types::default_min_selection_width();
        }

        if !(self.tool.min_selection_height.is_finite() && self.tool.min_selection_height > 0.0) {
            log::warn!(
                "Invalid min_selection_height {:.1}, falling back to {:.1}",
                self.tool.min_selection_height,
                types::default_min_selection_height()
            );
            self.tool.min_selection_height = types::default_min_selection_height();
        }

        if !(1.0..=30.0).contains(&self.handles.radius) {
            log::warn!(
                "Invalid handle radius {:.1}, clamping to 1.0-30.0 range",
                self.handles.radius
            );
            self.handles.radius = clamp_or_default(self.handles.radius, 6.0);
        }

        if !(1.0..=30.0).contains(&self.handles.touch_radius) {
            log::warn!(
                "Invalid touch handle radius {:.1}, clamping to 1.0-30.0 range",
                self.handles.touch_radius
            );
            self.handles.touch_radius = clamp_or_default(self.handles.touch_radius, 12.0);
        }
    }

    /// Returns the JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/polyband/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("polyband");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the config path cannot be determined, or the file exists
    /// but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if it does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(source: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(source)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Saves the current configuration to the given path, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot be
    /// serialized, or the file cannot be written.
    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path, or the
    /// directory or file cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(config_path, DEFAULT_CONFIG)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }
}

fn clamp_or_default(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(1.0, 30.0)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.tool.min_selection_width, 4.0);
        assert_eq!(config.tool.min_selection_height, 4.0);
        assert!(!config.tool.draw_on_single_click);
        assert_eq!(config.handles.radius, 6.0);
    }

    #[test]
    fn non_positive_minimums_fall_back_to_four() {
        let config = Config::from_toml(
            "[tool]\nmin_selection_width = 0.0\nmin_selection_height = -2.0\n",
        )
        .unwrap();
        assert_eq!(config.tool.min_selection_width, 4.0);
        assert_eq!(config.tool.min_selection_height, 4.0);
    }

    #[test]
    fn handle_radius_is_clamped() {
        let config = Config::from_toml("[handles]\nradius = 100.0\ntouch_radius = 0.1\n").unwrap();
        assert_eq!(config.handles.radius, 30.0);
        assert_eq!(config.handles.touch_radius, 1.0);
    }

    #[test]
    fn default_file_parses_to_defaults() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.tool.min_selection_width, 4.0);
        assert_eq!(config.handles.touch_radius, 12.0);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.tool.min_selection_width = 8.0;
        config.tool.draw_on_single_click = true;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tool.min_selection_width, 8.0);
        assert!(loaded.tool.draw_on_single_click);
    }

    #[test]
    fn create_default_file_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        Config::create_default_file(&path).unwrap();
        assert!(Config::create_default_file(&path).is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.tool.min_selection_height, 4.0);
    }
}
