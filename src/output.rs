//! Terminal output for the assetcrafter CLI.
//!
//! Cargo-style status lines with right-aligned coloured verbs. Everything goes
//! to stderr; stdout is reserved for machine-readable output.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// How much the printer says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

/// Terminal-aware status printer.
///
/// Colour is enabled when stderr is a terminal.
pub struct Printer {
    color: bool,
    verbosity: Verbosity,
}

impl Printer {
    /// Printer at normal verbosity, coloured when stderr is a terminal.
    pub fn new() -> Self {
        Self::with_verbosity(Verbosity::Normal)
    }

    /// Printer at the given verbosity.
    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            color: io::stderr().is_terminal(),
            verbosity,
        }
    }

    /// A printer that prints nothing (library callers, tests).
    pub fn quiet() -> Self {
        Self {
            color: false,
            verbosity: Verbosity::Quiet,
        }
    }

    /// e.g. "   Composing level (4x4 tiles)"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(Verbosity::Normal, GREEN, verb, message);
    }

    /// Secondary status line, hidden when quiet.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(Verbosity::Normal, CYAN, verb, message);
    }

    /// Per-asset detail, only shown with `--verbose`.
    pub fn verbose(&self, verb: &str, message: &str) {
        self.print_line(Verbosity::Verbose, DIM, verb, message);
    }

    /// Warnings are shown unless the printer is quiet.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(Verbosity::Normal, YELLOW, verb, message);
    }

    /// Error line, always shown.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(Verbosity::Quiet, RED, verb, message);
    }

    /// Dim text (if colour enabled).
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Cyan text (if colour enabled).
    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    /// Format a diagnostic severity label with colour.
    pub fn severity(&self, label: &str, is_error: bool) -> String {
        let color = if is_error { RED } else { YELLOW };
        if self.color {
            format!("{BOLD}{color}{label}{RESET}")
        } else {
            label.to_string()
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, level: Verbosity, color: &str, verb: &str, message: &str) {
        if self.verbosity < level {
            return;
        }
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pluralize a count: `plural(1, "output", "outputs")` → "1 output".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Relative display path when `path` is under `base`, unchanged otherwise.
pub fn display_path(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// Format a pixel size as "WxH".
pub fn dimensions((width, height): (u32, u32)) -> String {
    format!("{}x{}", width, height)
}
