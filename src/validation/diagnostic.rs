//! Findings reported by manifest validation.

use std::fmt;

/// Prefix shared by every validation code.
pub const CODE_PREFIX: &str = "assetcrafter::validate";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The build would still run, but probably not as intended.
    Warning,
    /// The build would fail.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The manifest entry a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Source(String),
    Step(String),
    Output(String),
}

impl Entry {
    /// Name the entry is declared under.
    pub fn name(&self) -> &str {
        match self {
            Entry::Source(name) | Entry::Step(name) | Entry::Output(name) => name,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Source(name) => write!(f, "source '{}'", name),
            Entry::Step(name) => write!(f, "step '{}'", name),
            Entry::Output(name) => write!(f, "output '{}'", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short kebab-case code, shown after [`CODE_PREFIX`].
    pub code: &'static str,
    pub entry: Entry,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, entry: Entry, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, entry, message.into())
    }

    pub fn warning(code: &'static str, entry: Entry, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, entry, message.into())
    }

    fn new(severity: Severity, code: &'static str, entry: Entry, message: String) -> Self {
        Self {
            severity,
            code,
            entry,
            message,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Fully qualified code, e.g. `assetcrafter::validate::not-tiled`.
    pub fn qualified_code(&self) -> String {
        format!("{}::{}", CODE_PREFIX, self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {}: {}",
            self.severity,
            self.qualified_code(),
            self.entry,
            self.message
        )
    }
}

/// Diagnostics collected over a whole manifest, in check order.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}
