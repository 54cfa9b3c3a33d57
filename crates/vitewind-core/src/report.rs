//! Progress reporting seam between the pipeline and the terminal

use std::fmt;

/// The numbered steps of a scaffolding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Scaffold,
    InstallDependencies,
    InstallCssFramework,
    PatchBuildConfig,
    WriteCssEntrypoints,
    Finish,
}

impl Step {
    /// Number of steps in a run
    pub const TOTAL: usize = 6;

    pub const ALL: [Step; Step::TOTAL] = [
        Step::Scaffold,
        Step::InstallDependencies,
        Step::InstallCssFramework,
        Step::PatchBuildConfig,
        Step::WriteCssEntrypoints,
        Step::Finish,
    ];

    /// 1-based position in the run
    pub fn number(&self) -> usize {
        match self {
            Step::Scaffold => 1,
            Step::InstallDependencies => 2,
            Step::InstallCssFramework => 3,
            Step::PatchBuildConfig => 4,
            Step::WriteCssEntrypoints => 5,
            Step::Finish => 6,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Scaffold => "Creating Vite + React project",
            Step::InstallDependencies => "Installing dependencies",
            Step::InstallCssFramework => "Installing Tailwind CSS",
            Step::PatchBuildConfig => "Configuring Vite plugin",
            Step::WriteCssEntrypoints => "Writing CSS entrypoints",
            Step::Finish => "Done",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.number(), Step::TOTAL, self.title())
    }
}

/// Receives progress events from the pipeline
///
/// `start` begins a long-running operation (rendered as a spinner by the CLI);
/// it is always closed by exactly one `succeed` or `fail`.
pub trait Reporter: Send + Sync {
    fn step(&self, step: Step);
    fn start(&self, message: &str);
    fn succeed(&self, message: &str);
    fn fail(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
}
