//! The scaffolding pipeline
//!
//! A run is a fixed sequence of six steps after the project-name prompt:
//!
//! 1. scaffold the project with create-vite (fatal on failure)
//! 2. install dependencies (fatal on failure)
//! 3. install the CSS framework packages (fatal on failure)
//! 4. patch the bundler config (best-effort, warns on failure)
//! 5. overwrite the CSS entrypoints (best-effort, warns on failure)
//! 6. print next steps
//!
//! Nothing is retried and nothing is rolled back: a project directory created
//! by step 1 stays on disk if a later step fails.

use crate::error::{Error, Result};
use crate::package_manager::PackageManager;
use crate::patch::{ConfigPatch, PatchReport};
use crate::process::{CommandRunner, Invocation, StdioMode};
use crate::report::{Reporter, Step};
use crate::session::{prompt_project_name, Prompter, Session};
use crate::types::Settings;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub session: Session,
    /// Best-effort steps that failed and need manual follow-up
    pub warnings: Vec<String>,
}

/// Runs the scaffolding steps against a base directory
pub struct Pipeline {
    settings: Settings,
    package_manager: PackageManager,
    base_dir: Utf8PathBuf,
    runner: Arc<dyn CommandRunner>,
    reporter: Arc<dyn Reporter>,
}

impl Pipeline {
    /// Create a pipeline that creates projects inside `base_dir`
    pub fn new(
        settings: Settings,
        base_dir: impl Into<Utf8PathBuf>,
        runner: Arc<dyn CommandRunner>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self> {
        let package_manager = settings.package_manager.parse()?;
        Ok(Self {
            settings,
            package_manager,
            base_dir: base_dir.into(),
            runner,
            reporter,
        })
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Prompt for the project name, then run every step
    pub async fn run(&self, prompter: &mut dyn Prompter) -> Result<Outcome> {
        let name = prompt_project_name(prompter)?;
        let session = Session::new(&name, &self.base_dir)?;
        self.run_session(session).await
    }

    /// Run every step for an already named session
    pub async fn run_session(&self, session: Session) -> Result<Outcome> {
        info!(
            "Creating project {} at {}",
            session.project_name(),
            session.project_path()
        );

        self.scaffold(&session).await?;
        self.install_dependencies(&session).await?;
        self.install_css_framework(&session).await?;

        let mut warnings = Vec::new();

        if let Err(e) = self.patch_build_config(&session).await {
            warnings.push(self.degrade(Step::PatchBuildConfig, &e, &self.manual_patch_hint()));
        }
        if let Err(e) = self.write_css_entrypoints(&session).await {
            warnings.push(self.degrade(Step::WriteCssEntrypoints, &e, &self.manual_css_hint()));
        }

        self.finish(&session);

        Ok(Outcome { session, warnings })
    }

    /// Step 1: generate the starter project with the terminal attached
    pub async fn scaffold(&self, session: &Session) -> Result<Utf8PathBuf> {
        self.reporter.step(Step::Scaffold);

        let pm = self.package_manager;
        self.runner.ensure_available(pm.program())?;

        let invocation = Invocation::new(
            pm.program(),
            pm.create_args(session.project_name(), &self.settings.template),
            &self.base_dir,
            StdioMode::Inherit,
        );
        self.reporter.info(&format!("Running {}", invocation));

        let output = self.runner.run(&invocation).await?;
        if let Err(e) = output.check(&invocation) {
            self.reporter.fail("Project generation failed");
            return Err(e);
        }

        let path = session.project_path();
        if !path.is_dir() {
            self.reporter.fail("Project generation failed");
            return Err(Error::ProjectNotCreated {
                path: path.to_string(),
            });
        }

        self.reporter.succeed(&format!("Created {}", session.project_name()));
        Ok(path.to_owned())
    }

    /// Step 2: install the generated project's dependencies
    pub async fn install_dependencies(&self, session: &Session) -> Result<()> {
        self.reporter.step(Step::InstallDependencies);

        let pm = self.package_manager;
        let invocation = Invocation::new(
            pm.program(),
            pm.install_args(),
            session.project_path(),
            StdioMode::Captured,
        );

        self.run_captured(
            &invocation,
            &format!("Running {}", invocation),
            "Dependencies installed",
        )
        .await
    }

    /// Step 3: add the CSS framework packages
    pub async fn install_css_framework(&self, session: &Session) -> Result<()> {
        self.reporter.step(Step::InstallCssFramework);

        let pm = self.package_manager;
        let packages = &self.settings.framework.packages;
        let invocation = Invocation::new(
            pm.program(),
            pm.add_args(packages),
            session.project_path(),
            StdioMode::Captured,
        );

        self.run_captured(
            &invocation,
            &format!("Running {}", invocation),
            &format!("Installed {}", packages.join(", ")),
        )
        .await
    }

    /// Step 4: wire the framework plugin into the bundler config
    ///
    /// Writes the file only when a rule changed it.
    pub async fn patch_build_config(&self, session: &Session) -> Result<PatchReport> {
        self.reporter.step(Step::PatchBuildConfig);

        let build_config = &self.settings.build_config;
        let path = find_build_config(session.project_path(), &build_config.files)?;

        let source = tokio::fs::read_to_string(&path).await?;
        let report = ConfigPatch::from_settings(build_config)?.apply(&source)?;

        if report.changed() {
            tokio::fs::write(&path, &report.content).await?;
            self.reporter.succeed(&format!("Updated {}", file_name(&path)));
        } else {
            self.reporter
                .succeed(&format!("{} already configured", file_name(&path)));
        }

        Ok(report)
    }

    /// Step 5: replace every CSS entrypoint with the framework import
    ///
    /// All files are written concurrently; each write targets a distinct file.
    pub async fn write_css_entrypoints(&self, session: &Session) -> Result<()> {
        self.reporter.step(Step::WriteCssEntrypoints);

        let content = self.settings.css.content();
        let mut writes = JoinSet::new();
        for entry in &self.settings.css.entrypoints {
            let path = session.project_path().join(entry);
            let content = content.clone();
            writes.spawn(async move {
                tokio::fs::write(&path, content)
                    .await
                    .map_err(|e| format!("{}: {}", path, e))
            });
        }

        let mut failures = Vec::new();
        while let Some(joined) = writes.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(message)) => failures.push(message),
                Err(e) => failures.push(e.to_string()),
            }
        }

        if !failures.is_empty() {
            failures.sort();
            return Err(Error::CssWrite {
                message: failures.join("; "),
            });
        }

        self.reporter
            .succeed(&format!("Wrote {}", self.settings.css.entrypoints.join(", ")));
        Ok(())
    }

    /// Step 6: print next-step instructions
    pub fn finish(&self, session: &Session) {
        self.reporter.step(Step::Finish);
        self.reporter
            .succeed(&format!("Project {} is ready", session.project_name()));
        self.reporter.info("Next steps:");
        self.reporter.info(&format!("  cd {}", session.project_name()));
        self.reporter.info(&format!(
            "  {}",
            self.package_manager.run_script_hint(&self.settings.dev_script)
        ));
    }

    async fn run_captured(&self, invocation: &Invocation, start: &str, done: &str) -> Result<()> {
        self.reporter.start(start);

        let result = match self.runner.run(invocation).await {
            Ok(output) => output.check(invocation),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.reporter.succeed(done);
                Ok(())
            }
            Err(e) => {
                self.reporter.fail(&format!("{} failed", invocation));
                Err(e)
            }
        }
    }

    /// Turn a best-effort step failure into a warning with manual instructions
    fn degrade(&self, step: Step, error: &Error, manual: &str) -> String {
        debug!("{} failed: {}", step.title(), error);

        let message = format!("{}: {}. {}", step.title(), error, manual);
        self.reporter.warn(&message);
        message
    }

    fn manual_patch_hint(&self) -> String {
        let build_config = &self.settings.build_config;
        format!(
            "Please add `{}` and `{}` to the {} array of your Vite config manually",
            build_config.plugin_import, build_config.plugin_call, build_config.plugins_property
        )
    }

    fn manual_css_hint(&self) -> String {
        format!(
            "Please replace the contents of {} with `{}` manually",
            self.settings.css.entrypoints.join(" and "),
            self.settings.css.directive
        )
    }
}

/// First existing build config file among `candidates`
fn find_build_config(project_dir: &Utf8Path, candidates: &[String]) -> Result<Utf8PathBuf> {
    candidates
        .iter()
        .map(|name| project_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::ConfigFileNotFound {
            dir: project_dir.to_string(),
            candidates: candidates.join(", "),
        })
}

fn file_name(path: &Utf8Path) -> &str {
    path.file_name().unwrap_or(path.as_str())
}
