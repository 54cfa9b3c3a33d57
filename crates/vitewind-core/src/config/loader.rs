//! Layered settings loader
//!
//! Loads settings from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User config (`config.yaml` in the platform config directory)
//! 3. Environment variables (VITEWIND_* prefix, plus NO_COLOR)

use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use crate::types::Settings;
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../embedded/config/"]
#[prefix = ""]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "defaults.yaml";
const USER_CONFIG_FILE: &str = "config.yaml";

/// Settings hierarchy loader
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    /// Directory holding the user config file, if one could be determined
    config_dir: Option<Utf8PathBuf>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Create a loader that reads the user config from the platform config directory
    pub fn new() -> Self {
        let config_dir = ProjectDirs::from("dev", "vitewind", "vitewind")
            .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.config_dir().to_path_buf()).ok());
        Self { config_dir }
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self {
            config_dir: Some(config_dir),
        }
    }

    /// Create a loader that only applies embedded defaults and env overrides
    pub fn without_user_config() -> Self {
        Self { config_dir: None }
    }

    /// Path of the user config file, whether or not it exists
    pub fn user_config_path(&self) -> Option<Utf8PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join(USER_CONFIG_FILE))
    }

    /// Load settings with layered precedence
    pub fn load(&self) -> Result<Settings> {
        let mut value = Self::load_embedded_defaults()?;

        if let Some(path) = self.user_config_path() {
            if path.exists() {
                debug!("Merging user config from {}", path);
                let overlay = Self::load_yaml_file(&path)?;
                merge_values(&mut value, overlay);
            }
        }

        let mut settings: Settings = serde_yaml_ng::from_value(value)
            .map_err(|e| Error::invalid_settings(format!("Failed to parse settings: {}", e)))?;

        apply_env_overrides(&mut settings)?;
        validate(&settings)?;

        Ok(settings)
    }

    fn load_embedded_defaults() -> Result<Value> {
        let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
            Error::invalid_settings(format!("Embedded config not found: {}", DEFAULTS_FILE))
        })?;

        let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
            Error::invalid_settings(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
        })?;

        Ok(serde_yaml_ng::from_str(content)?)
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_settings(format!("Failed to parse {}: {}", path, e)))?;

        // An empty file parses as null and means "no overrides"
        if value.is_null() {
            return Ok(Value::Mapping(Default::default()));
        }
        if !value.is_mapping() {
            return Err(Error::invalid_settings(format!(
                "{} must contain a YAML mapping",
                path
            )));
        }
        Ok(value)
    }
}

/// Merge `overlay` into `base`; mappings merge key by key, everything else is replaced
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => merge_values(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Apply environment variable overrides
fn apply_env_overrides(settings: &mut Settings) -> Result<()> {
    if let Ok(val) = env::var("VITEWIND_PACKAGE_MANAGER") {
        settings.package_manager = val.trim().to_string();
    }

    if let Ok(val) = env::var("VITEWIND_TEMPLATE") {
        settings.template = val.trim().to_string();
    }

    if let Ok(val) = env::var("VITEWIND_NO_COLOR") {
        let disabled: bool = val.trim().parse().map_err(|_| {
            Error::invalid_settings("VITEWIND_NO_COLOR must be `true` or `false`")
        })?;
        settings.color = !disabled;
    }

    // https://no-color.org: any non-empty value disables color
    if env::var("NO_COLOR").is_ok_and(|val| !val.is_empty()) {
        settings.color = false;
    }

    Ok(())
}

fn validate(settings: &Settings) -> Result<()> {
    settings.package_manager.parse::<PackageManager>()?;

    if settings.template.trim().is_empty() {
        return Err(Error::invalid_settings("template must not be empty"));
    }
    if settings.build_config.files.is_empty() {
        return Err(Error::invalid_settings(
            "build-config.files must list at least one file",
        ));
    }
    if settings.css.entrypoints.is_empty() {
        return Err(Error::invalid_settings(
            "css.entrypoints must list at least one file",
        ));
    }

    Ok(())
}
