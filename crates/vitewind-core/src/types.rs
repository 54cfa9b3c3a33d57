//! Settings types deserialized from the layered YAML configuration

use serde::{Deserialize, Serialize};

/// Fully resolved vitewind settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Package manager used for `create`, `install` and `add` (npm, pnpm, yarn, bun)
    pub package_manager: String,

    /// create-vite template selector
    pub template: String,

    /// package.json script suggested in the next-step instructions
    pub dev_script: String,

    /// Colorized terminal output
    pub color: bool,

    pub framework: FrameworkSettings,

    pub build_config: BuildConfigSettings,

    pub css: CssSettings,
}

/// CSS framework packages installed in step 3
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FrameworkSettings {
    pub packages: Vec<String>,
}

/// What to look for, and what to insert, in the bundler config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfigSettings {
    /// Candidate file names relative to the project root; first existing wins
    pub files: Vec<String>,

    /// Existing import line the plugin import is placed after
    pub anchor_import: String,

    /// Import line added for the framework's bundler plugin
    pub plugin_import: String,

    /// Name of the array-literal property holding the plugin list
    pub plugins_property: String,

    /// Call expression added as the first plugin entry
    pub plugin_call: String,
}

/// Stylesheets overwritten with the framework import directive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CssSettings {
    pub entrypoints: Vec<String>,
    pub directive: String,
}

impl CssSettings {
    /// File content written to every entrypoint
    pub fn content(&self) -> String {
        format!("{}\n", self.directive)
    }
}
