//! Idempotent text patching of the bundler config
//!
//! Each rule is independent and reports whether it changed anything, so a
//! config that was already patched passes through untouched.

use crate::error::{Error, Result};
use crate::types::BuildConfigSettings;
use regex::Regex;
use tracing::debug;

/// A single named text transform
pub trait PatchRule: Send + Sync {
    /// Short rule name used in logs and reports
    fn name(&self) -> &'static str;

    /// Apply the rule; `Ok(None)` means the change is already present
    fn apply(&self, source: &str) -> Result<Option<String>>;
}

/// Insert `line` right after the first line containing `anchor`
#[derive(Debug, Clone)]
pub struct InsertImportAfter {
    anchor: String,
    line: String,
}

impl InsertImportAfter {
    pub fn new(anchor: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
            line: line.into(),
        }
    }

    /// True when `source` has the line, or any import of the same module
    fn already_imported(&self, source: &str) -> bool {
        if source.contains(&self.line) {
            return true;
        }
        let Some(specifier) = module_specifier(&self.line) else {
            return false;
        };
        let quoted = [format!("'{}'", specifier), format!("\"{}\"", specifier)];
        source.lines().map(str::trim_start).any(|line| {
            line.starts_with("import ") && quoted.iter().any(|q| line.contains(q.as_str()))
        })
    }
}

/// Module name of an `import ... from '<module>'` line
fn module_specifier(line: &str) -> Option<&str> {
    let line = line.trim_end().trim_end_matches(';');
    let quote = line.chars().last().filter(|c| *c == '\'' || *c == '"')?;
    let body = &line[..line.len() - 1];
    let start = body.rfind(quote)?;
    Some(&body[start + 1..])
}

impl PatchRule for InsertImportAfter {
    fn name(&self) -> &'static str {
        "insert-import"
    }

    fn apply(&self, source: &str) -> Result<Option<String>> {
        if self.already_imported(source) {
            return Ok(None);
        }

        let anchor_at = source.find(&self.anchor).ok_or_else(|| {
            Error::unsupported_config(format!("expected import `{}` not found", self.anchor))
        })?;

        let mut patched = String::with_capacity(source.len() + self.line.len() + 2);
        match source[anchor_at..].find('\n') {
            Some(offset) => {
                let eol = anchor_at + offset;
                let newline = if source[..eol].ends_with('\r') {
                    "\r\n"
                } else {
                    "\n"
                };
                patched.push_str(&source[..=eol]);
                patched.push_str(&self.line);
                patched.push_str(newline);
                patched.push_str(&source[eol + 1..]);
            }
            None => {
                // Anchor sits on the last line without a trailing newline
                patched.push_str(source);
                patched.push('\n');
                patched.push_str(&self.line);
            }
        }

        Ok(Some(patched))
    }
}

/// Insert `entry` as the first element of the `property: [...]` array literal
#[derive(Debug, Clone)]
pub struct InsertArrayEntry {
    property: String,
    entry: String,
    pattern: Regex,
}

impl InsertArrayEntry {
    pub fn new(property: impl Into<String>, entry: impl Into<String>) -> Result<Self> {
        let property = property.into();
        let pattern = Regex::new(&format!(r"\b{}\s*:\s*\[", regex::escape(&property)))?;
        Ok(Self {
            property,
            entry: entry.into(),
            pattern,
        })
    }
}

impl PatchRule for InsertArrayEntry {
    fn name(&self) -> &'static str {
        "insert-array-entry"
    }

    fn apply(&self, source: &str) -> Result<Option<String>> {
        if source.contains(&self.entry) {
            return Ok(None);
        }

        let mut matches = self.pattern.find_iter(source);
        let found = matches.next().ok_or_else(|| {
            Error::unsupported_config(format!("no `{}: [...]` array found", self.property))
        })?;
        if matches.next().is_some() {
            return Err(Error::unsupported_config(format!(
                "more than one `{}: [...]` array found",
                self.property
            )));
        }

        let open = found.end();
        let rest = &source[open..];
        let after_spaces = rest.trim_start_matches([' ', '\t']);

        let insertion = if after_spaces.starts_with('\n') || after_spaces.starts_with("\r\n") {
            // Multi-line array: new line, indented like the first existing element
            let newline = if after_spaces.starts_with("\r\n") {
                "\r\n"
            } else {
                "\n"
            };
            let indent = first_element_indent(after_spaces);
            format!("{}{}{},", newline, indent, self.entry)
        } else if after_spaces.starts_with(']') {
            self.entry.clone()
        } else {
            format!("{}, ", self.entry)
        };

        let mut patched = String::with_capacity(source.len() + insertion.len());
        patched.push_str(&source[..open]);
        patched.push_str(&insertion);
        patched.push_str(rest);

        Ok(Some(patched))
    }
}

/// Leading whitespace of the first non-blank line in `text`
fn first_element_indent(text: &str) -> &str {
    text.lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .map(|line| {
            let trimmed = line.trim_start();
            &line[..line.len() - trimmed.len()]
        })
        .unwrap_or("    ")
}

/// Result of running a `ConfigPatch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub content: String,
    /// Names of the rules that changed the content
    pub applied: Vec<&'static str>,
}

impl PatchReport {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Ordered set of patch rules applied to one file's content
pub struct ConfigPatch {
    rules: Vec<Box<dyn PatchRule>>,
}

impl ConfigPatch {
    pub fn new(rules: Vec<Box<dyn PatchRule>>) -> Self {
        Self { rules }
    }

    /// Rules for wiring the CSS framework plugin into the bundler config
    pub fn from_settings(settings: &BuildConfigSettings) -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(InsertImportAfter::new(
                &settings.anchor_import,
                &settings.plugin_import,
            )),
            Box::new(InsertArrayEntry::new(
                &settings.plugins_property,
                &settings.plugin_call,
            )?),
        ]))
    }

    /// Run every rule in order; any rule error aborts the whole patch
    pub fn apply(&self, source: &str) -> Result<PatchReport> {
        let mut content = source.to_string();
        let mut applied = Vec::new();

        for rule in &self.rules {
            match rule.apply(&content)? {
                Some(patched) => {
                    debug!("Patch rule {} applied", rule.name());
                    content = patched;
                    applied.push(rule.name());
                }
                None => debug!("Patch rule {} already satisfied", rule.name()),
            }
        }

        Ok(PatchReport { content, applied })
    }
}
