//! # vitewind-core
//!
//! Core library for the vitewind CLI providing:
//! - Layered settings (embedded defaults, user config, environment)
//! - Package manager command templates
//! - Idempotent patch rules for the Vite config
//! - The six-step scaffolding pipeline behind `Pipeline::run`
//!
//! The CLI binary is a thin adapter over this crate; other tools can drive the
//! same pipeline with their own `CommandRunner`, `Reporter` and `Prompter`.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitewind_core::{Pipeline, Session, SettingsLoader, TokioCommandRunner};
//! # use vitewind_core::{Reporter, Step};
//! # struct Quiet;
//! # impl Reporter for Quiet {
//! #     fn step(&self, _: Step) {}
//! #     fn start(&self, _: &str) {}
//! #     fn succeed(&self, _: &str) {}
//! #     fn fail(&self, _: &str) {}
//! #     fn warn(&self, _: &str) {}
//! #     fn info(&self, _: &str) {}
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsLoader::new().load()?;
//! let pipeline = Pipeline::new(
//!     settings,
//!     "/tmp",
//!     Arc::new(TokioCommandRunner),
//!     Arc::new(Quiet),
//! )?;
//!
//! let session = Session::new("demo", pipeline.base_dir())?;
//! let outcome = pipeline.run_session(session).await?;
//! assert!(outcome.warnings.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod package_manager;
pub mod patch;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod session;
pub mod types;

pub use config::SettingsLoader;
pub use error::{Error, Result};
pub use package_manager::PackageManager;
pub use pipeline::{Outcome, Pipeline};
pub use process::{CommandOutput, CommandRunner, Invocation, StdioMode, TokioCommandRunner};
pub use report::{Reporter, Step};
pub use session::{prompt_project_name, Prompter, Session};
pub use types::Settings;
