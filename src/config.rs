//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/segviz/segviz.toml`
//! 3. Explicit config file: `--config <file>`
//! 4. Environment variables: `SEGVIZ_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, Script, Step};
use crate::domain::layout::{LayoutParams, CELL_SIZE, NODE_RADIUS, VERTICAL_SPACING};

/// Geometry handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub root_x: f32,
    pub root_y: f32,
    /// Horizontal spread at the root, halved per level
    pub width: f32,
    pub vertical_spacing: f32,
    pub node_radius: f32,
    /// Vertical position of the array row
    pub array_y: f32,
    pub cell_size: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            root_x: 600.0,
            root_y: 50.0,
            width: 1000.0,
            vertical_spacing: VERTICAL_SPACING,
            node_radius: NODE_RADIUS,
            array_y: 700.0,
            cell_size: CELL_SIZE,
        }
    }
}

impl From<&LayoutSettings> for LayoutParams {
    fn from(layout: &LayoutSettings) -> Self {
        Self {
            root_x: layout.root_x,
            root_y: layout.root_y,
            width: layout.width,
            vertical_spacing: layout.vertical_spacing,
        }
    }
}

/// Raw layout settings for intermediate parsing (`None` → inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub root_x: Option<f32>,
    pub root_y: Option<f32>,
    pub width: Option<f32>,
    pub vertical_spacing: Option<f32>,
    pub node_radius: Option<f32>,
    pub array_y: Option<f32>,
    pub cell_size: Option<f32>,
}

impl LayoutSettings {
    /// Overlay wins per field if specified.
    pub fn merge(&self, overlay: &RawLayoutSettings) -> Self {
        Self {
            root_x: overlay.root_x.unwrap_or(self.root_x),
            root_y: overlay.root_y.unwrap_or(self.root_y),
            width: overlay.width.unwrap_or(self.width),
            vertical_spacing: overlay.vertical_spacing.unwrap_or(self.vertical_spacing),
            node_radius: overlay.node_radius.unwrap_or(self.node_radius),
            array_y: overlay.array_y.unwrap_or(self.array_y),
            cell_size: overlay.cell_size.unwrap_or(self.cell_size),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data: Option<Vec<i64>>,
    pub strict_bounds: Option<bool>,
    pub layout: RawLayoutSettings,
    pub script: Option<Vec<Step>>,
}

/// Unified configuration for segviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Backing array the tree is built from
    pub data: Vec<i64>,
    /// Reject point updates outside the array instead of ignoring them
    pub strict_bounds: bool,
    pub layout: LayoutSettings,
    /// Steps for `segviz demo`; empty means the built-in walkthrough
    pub script: Vec<Step>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: vec![2, 1, 3, 4, 5, 7, 8, 9],
            strict_bounds: false,
            layout: LayoutSettings::default(),
            script: Vec::new(),
        }
    }
}

/// Get the XDG config directory for segviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "segviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("segviz.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// The configured script, or the built-in walkthrough when none is set.
    pub fn script(&self) -> Result<Script, ApplicationError> {
        if self.script.is_empty() {
            Ok(Script::demo())
        } else {
            Script::new(self.script.clone())
        }
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams::from(&self.layout)
    }

    /// Overlay config onto self (base): specified fields replace.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data: overlay.data.clone().unwrap_or_else(|| self.data.clone()),
            strict_bounds: overlay.strict_bounds.unwrap_or(self.strict_bounds),
            layout: self.layout.merge(&overlay.layout),
            script: overlay.script.clone().unwrap_or_else(|| self.script.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/segviz/segviz.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `SEGVIZ_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current)
    }

    /// Load defaults plus a single file, skipping global config and env vars.
    pub fn load_file_only(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Apply SEGVIZ_* environment variables as explicit overrides.
    ///
    /// `SEGVIZ_DATA=1,2,3`, `SEGVIZ_STRICT_BOUNDS=true`, `SEGVIZ_LAYOUT__WIDTH=800`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("SEGVIZ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<i64>>("data") {
            settings.data = val;
        }
        if let Ok(val) = config.get_bool("strict_bounds") {
            settings.strict_bounds = val;
        }
        if let Ok(val) = config.get_float("layout.root_x") {
            settings.layout.root_x = val as f32;
        }
        if let Ok(val) = config.get_float("layout.root_y") {
            settings.layout.root_y = val as f32;
        }
        if let Ok(val) = config.get_float("layout.width") {
            settings.layout.width = val as f32;
        }
        if let Ok(val) = config.get_float("layout.vertical_spacing") {
            settings.layout.vertical_spacing = val as f32;
        }
        if let Ok(val) = config.get_float("layout.node_radius") {
            settings.layout.node_radius = val as f32;
        }
        if let Ok(val) = config.get_float("layout.array_y") {
            settings.layout.array_y = val as f32;
        }
        if let Ok(val) = config.get_float("layout.cell_size") {
            settings.layout.cell_size = val as f32;
        }

        Ok(settings)
    }

    /// Serialize settings to TOML string.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize: {}", e),
        })
    }

    /// Generate a commented template config file.
    pub fn template() -> String {
        r#"# segviz configuration
# Global: ~/.config/segviz/segviz.toml
# Override with --config <file> or SEGVIZ_* environment variables

# Backing array for the tree (must not be empty)
# data = [2, 1, 3, 4, 5, 7, 8, 9]

# Reject point updates outside the array instead of ignoring them
# strict_bounds = false

[layout]
# root_x = 600.0
# root_y = 50.0
# width = 1000.0
# vertical_spacing = 80.0
# node_radius = 25.0
# array_y = 700.0
# cell_size = 50.0

# Steps for `segviz demo` (omit for the built-in walkthrough)
# [[script]]
# label = "Initial state"
# op = "reset"
#
# [[script]]
# op = "query"
# l = 2
# r = 5
#
# [[script]]
# op = "update"
# index = 3
# value = 10
#
# [[script]]
# op = "update_range"
# l = 1
# r = 4
# delta = 3
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Operation;

    #[test]
    fn given_defaults_then_demo_array_and_built_in_script() {
        let settings = Settings::default();
        assert_eq!(settings.data, vec![2, 1, 3, 4, 5, 7, 8, 9]);
        assert!(!settings.strict_bounds);
        assert_eq!(settings.script().unwrap(), Script::demo());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let base = Settings::default();
        let overlay = RawSettings {
            data: Some(vec![1, 2]),
            layout: RawLayoutSettings {
                width: Some(400.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.data, vec![1, 2]);
        assert_eq!(merged.layout.width, 400.0);
        assert_eq!(merged.layout.root_x, 600.0);
        assert!(merged.script.is_empty());
    }

    #[test]
    fn given_script_in_toml_when_parsing_raw_then_steps_loaded() {
        let raw: RawSettings = toml::from_str(
            r#"
strict_bounds = true

[[script]]
op = "update"
index = 0
value = 7
"#,
        )
        .unwrap();
        let merged = Settings::default().merge_with(&raw);
        assert!(merged.strict_bounds);
        assert_eq!(
            merged.script().unwrap().steps()[0].operation,
            Operation::Update { index: 0, value: 7 }
        );
    }

    #[test]
    fn given_template_when_parsed_then_valid_toml() {
        let raw: Result<RawSettings, _> = toml::from_str(&Settings::template());
        assert!(raw.is_ok(), "template should parse: {:?}", raw.err());
    }

    #[test]
    fn given_layout_settings_when_converted_then_params_match() {
        let params = Settings::default().layout_params();
        assert_eq!(params, LayoutParams::default());
    }
}
