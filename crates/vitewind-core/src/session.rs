//! Per-run session state and the project-name prompt

use crate::error::{Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Question asked until a non-empty answer is given
pub const PROJECT_NAME_QUESTION: &str = "Project name";

/// State for a single scaffolding run
///
/// The project path is derived once from the base directory and name and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    project_name: String,
    project_path: Utf8PathBuf,
}

impl Session {
    /// Create a session for `name` inside `base_dir`
    ///
    /// The name is trimmed; an empty result is rejected.
    pub fn new(name: &str, base_dir: &Utf8Path) -> Result<Self> {
        let project_name = name.trim();
        if project_name.is_empty() {
            return Err(Error::EmptyProjectName);
        }

        Ok(Self {
            project_name: project_name.to_string(),
            project_path: base_dir.join(project_name),
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_path(&self) -> &Utf8Path {
        &self.project_path
    }
}

/// Source of interactive answers
pub trait Prompter {
    /// Ask `question` and return the raw answer
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Ask for the project name until a non-empty answer is given
///
/// Surrounding whitespace is trimmed. No other validation is applied.
pub fn prompt_project_name(prompter: &mut dyn Prompter) -> Result<String> {
    loop {
        let answer = prompter.ask(PROJECT_NAME_QUESTION)?;
        let name = answer.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
        debug!("Empty project name, asking again");
    }
}
