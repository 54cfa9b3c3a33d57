//! Error types for vitewind-core

use thiserror::Error;

/// Result type alias using vitewind-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding pipeline error types
#[derive(Error, Debug)]
pub enum Error {
    /// External command not on PATH
    #[error("Required command not found: {command}. Please ensure it is installed and in PATH")]
    CommandNotFound { command: String },

    /// External command exited unsuccessfully
    #[error("Command `{command}` failed{}{}", exit_suffix(.code), detail_suffix(.detail))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        detail: String,
    },

    /// Interactive input could not be read
    #[error("Failed to read input: {0}")]
    Prompt(String),

    /// Project name was empty after trimming
    #[error("Project name must not be empty")]
    EmptyProjectName,

    /// Scaffolding tool exited cleanly but did not create the project
    #[error("Project directory was not created: {path}")]
    ProjectNotCreated { path: String },

    /// One or more CSS entrypoints could not be written
    #[error("Failed to write CSS entrypoints: {message}")]
    CssWrite { message: String },

    /// None of the candidate build config files exist
    #[error("No build config file found in {dir} (looked for: {candidates})")]
    ConfigFileNotFound { dir: String, candidates: String },

    /// Build config content does not have the expected shape
    #[error("Unsupported build config: {message}")]
    UnsupportedConfig { message: String },

    /// Settings could not be loaded or are invalid
    #[error("Invalid settings: {message}")]
    InvalidSettings { message: String },

    /// Package manager name not recognised
    #[error("Unknown package manager: {name}. Valid package managers: npm, pnpm, yarn, bun")]
    UnknownPackageManager { name: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => " (terminated by signal)".to_string(),
    }
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", detail)
    }
}

impl Error {
    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a process failed error
    pub fn process_failed(
        command: impl Into<String>,
        code: Option<i32>,
        detail: impl Into<String>,
    ) -> Self {
        Self::ProcessFailed {
            command: command.into(),
            code,
            detail: detail.into(),
        }
    }

    /// Create a prompt error
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt(message.into())
    }

    /// Create an unsupported config error
    pub fn unsupported_config(message: impl Into<String>) -> Self {
        Self::UnsupportedConfig {
            message: message.into(),
        }
    }

    /// Create an invalid settings error
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings {
            message: message.into(),
        }
    }
}
