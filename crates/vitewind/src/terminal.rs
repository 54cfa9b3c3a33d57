//! Interactive terminal adapters for the pipeline
//!
//! `TerminalSession` owns the single terminal handle for a run. The prompter
//! borrows it, and dropping the session releases it (cursor restored, output
//! flushed) on every exit path.

use console::Term;
use dialoguer::Input;
use indicatif::ProgressBar;
use std::io::{BufRead, IsTerminal, Write};
use std::sync::Mutex;
use tracing::debug;
use vitewind_core::{Error, Prompter, Reporter, Result, Step};

use crate::output;

/// The run's terminal handle
pub struct TerminalSession {
    term: Term,
}

impl TerminalSession {
    /// Acquire the terminal for this run
    pub fn open() -> Self {
        debug!("Terminal session opened");
        Self {
            term: Term::stderr(),
        }
    }

    /// Prompter reading answers from this terminal
    pub fn prompter(&self) -> TerminalPrompter<'_> {
        TerminalPrompter { term: &self.term }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // A spinner or an interrupted prompt may have hidden the cursor
        let _ = self.term.show_cursor();
        let _ = self.term.flush();
        debug!("Terminal session closed");
    }
}

/// Prompter backed by dialoguer, with a line-reading fallback for piped input
pub struct TerminalPrompter<'a> {
    term: &'a Term,
}

impl Prompter for TerminalPrompter<'_> {
    fn ask(&mut self, question: &str) -> Result<String> {
        if interactive(std::io::stdin().is_terminal(), self.term) {
            return Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text_on(self.term)
                .map_err(|e| Error::prompt(e.to_string()));
        }

        // Piped input: print the question and read one line from stdin
        let mut term = self.term.clone();
        write!(term, "{}: ", question)?;
        term.flush()?;

        read_answer(std::io::stdin().lock())
    }
}

/// dialoguer reads keys from the tty, so both ends must be a terminal
fn interactive(stdin_is_terminal: bool, term: &Term) -> bool {
    stdin_is_terminal && term.features().is_attended()
}

/// Read one answer line; EOF means no answer will ever arrive
fn read_answer(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(Error::prompt("input closed before a project name was given"));
    }
    Ok(line)
}

/// Reporter rendering numbered steps, spinners and colored results
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the active spinner, if any, and clear its line
    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl Reporter for ConsoleReporter {
    fn step(&self, step: Step) {
        self.clear_spinner();
        output::step(step.number(), Step::TOTAL, step.title());
    }

    fn start(&self, message: &str) {
        self.clear_spinner();
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(output::spinner(message));
        }
    }

    fn succeed(&self, message: &str) {
        self.clear_spinner();
        output::success(message);
    }

    fn fail(&self, message: &str) {
        self.clear_spinner();
        output::error(message);
    }

    fn warn(&self, message: &str) {
        self.clear_spinner();
        output::warning(message);
    }

    fn info(&self, message: &str) {
        self.clear_spinner();
        output::info(message);
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
