//! External command execution

use crate::error::{Error, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// How the child process is attached to the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Child shares the terminal; its prompts and output are visible
    Inherit,
    /// stdin is closed, output is captured and only stderr is kept for errors
    Captured,
}

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Utf8PathBuf,
    pub stdio: StdioMode,
}

impl Invocation {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        cwd: impl AsRef<Utf8Path>,
        stdio: StdioMode,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.as_ref().to_owned(),
            stdio,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit information of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stderr (empty for inherited stdio)
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Convert a non-zero exit into a `ProcessFailed` error
    pub fn check(self, invocation: &Invocation) -> Result<()> {
        if self.success() {
            return Ok(());
        }
        Err(Error::process_failed(
            invocation.to_string(),
            self.code,
            last_line(&self.stderr),
        ))
    }
}

fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` and wait for it to exit
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Check that `program` can be found
    fn ensure_available(&self, program: &str) -> Result<()>;
}

/// Runs commands as child processes with `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        info!("Running: {} (in {})", invocation, invocation.cwd);

        // Resolve through PATH so Windows shims like npm.cmd are found
        let program = which::which(&invocation.program)
            .map_err(|_| Error::command_not_found(&invocation.program))?;

        let mut cmd = Command::new(program);
        cmd.args(&invocation.args).current_dir(&invocation.cwd);

        let output = match invocation.stdio {
            StdioMode::Inherit => {
                let status = cmd
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit())
                    .status()
                    .await?;
                CommandOutput {
                    code: status.code(),
                    stderr: String::new(),
                }
            }
            StdioMode::Captured => {
                let output = cmd.stdin(Stdio::null()).output().await?;
                CommandOutput {
                    code: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                }
            }
        };

        debug!("{} exited with {:?}", invocation.program, output.code);
        Ok(output)
    }

    fn ensure_available(&self, program: &str) -> Result<()> {
        which::which(program)
            .map(|_| ())
            .map_err(|_| Error::command_not_found(program))
    }
}
