//! vitewind CLI - Vite + React + Tailwind CSS project scaffolder
//!
//! This is the main entry point for the vitewind command-line interface.

mod cli;
mod output;
mod terminal;

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vitewind_core::{Pipeline, SettingsLoader, TokioCommandRunner};

use cli::Cli;
use terminal::{ConsoleReporter, TerminalSession};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI args (only --help/--version)
    let _cli = Cli::parse();

    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!();
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let settings = SettingsLoader::new()
        .load()
        .context("Failed to load settings")?;

    output::configure_colors(settings.color);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let base_dir = Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow!(
            "Current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;

    let pipeline = Pipeline::new(
        settings,
        base_dir,
        Arc::new(TokioCommandRunner),
        Arc::new(ConsoleReporter::new()),
    )?;

    output::header("Create Vite + React + Tailwind CSS project");

    // Released on drop, whichever way the run ends
    let terminal = TerminalSession::open();
    let mut prompter = terminal.prompter();
    let outcome = pipeline.run(&mut prompter).await?;

    if !outcome.warnings.is_empty() {
        println!();
        output::warning(&format!(
            "Finished with {} step(s) needing manual follow-up",
            outcome.warnings.len()
        ));
    }

    Ok(())
}

/// Initialize tracing from VITEWIND_LOG (default: warn)
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("VITEWIND_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
