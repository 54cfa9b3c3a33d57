//! Package manager command templates

use crate::error::{Error, Result};
use std::str::FromStr;

/// Supported JavaScript package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Arguments that run create-vite for `name` with the given template
    pub fn create_args(&self, name: &str, template: &str) -> Vec<String> {
        let mut args = match self {
            // npm needs `--` so the template flag reaches create-vite
            Self::Npm => vec!["create", "vite@latest", name, "--"],
            Self::Pnpm | Self::Yarn | Self::Bun => vec!["create", "vite", name],
        };
        args.extend(["--template", template]);
        args.into_iter().map(String::from).collect()
    }

    /// Arguments that install the dependencies declared in package.json
    pub fn install_args(&self) -> Vec<String> {
        vec!["install".to_string()]
    }

    /// Arguments that add `packages` as dependencies
    pub fn add_args(&self, packages: &[String]) -> Vec<String> {
        let verb = match self {
            Self::Npm => "install",
            Self::Pnpm | Self::Yarn | Self::Bun => "add",
        };
        std::iter::once(verb.to_string())
            .chain(packages.iter().cloned())
            .collect()
    }

    /// Command line a user types to run a package.json script
    pub fn run_script_hint(&self, script: &str) -> String {
        match self {
            Self::Yarn => format!("yarn {}", script),
            Self::Npm | Self::Pnpm | Self::Bun => format!("{} run {}", self.program(), script),
        }
    }
}

impl FromStr for PackageManager {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            _ => Err(Error::UnknownPackageManager {
                name: s.to_string(),
            }),
        }
    }
}
