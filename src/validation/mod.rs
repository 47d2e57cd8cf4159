//! Static validation of build manifests.
//!
//! Runs a suite of checks against a parsed manifest and reports errors and
//! warnings without loading or writing any image. Used by
//! `assetcrafter validate`.

mod checks;
mod diagnostic;

use std::path::Path;

pub use diagnostic::{Diagnostic, Entry, Severity, ValidationResult};

use crate::manifest::Manifest;
use crate::output::Printer;

/// Run all validation checks against the manifest of the project at `root`.
pub fn validate_manifest(manifest: &Manifest, root: &Path) -> ValidationResult {
    let mut result = ValidationResult::new();

    result.merge(checks::check_duplicate_names(manifest));
    result.merge(checks::check_missing_files(manifest, root));
    result.merge(checks::check_references(manifest));
    result.merge(checks::check_steps(manifest));
    result.merge(checks::check_selections(manifest));

    result
}

/// Print diagnostics and a summary line to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        let label = printer.severity(&d.severity.to_string(), d.severity == Severity::Error);
        eprintln!(
            "  {}[{}]: {}: {}",
            label,
            d.qualified_code(),
            printer.cyan(&d.entry.to_string()),
            d.message
        );
        if let Some(help) = &d.help {
            eprintln!("    {} {}", printer.dim("help:"), help);
        }
    }

    let errors = result.error_count();
    let warnings = result.warning_count();

    if errors > 0 {
        printer.error(
            "Failed",
            &format!("{} error(s), {} warning(s)", errors, warnings),
        );
    } else if warnings > 0 {
        printer.warning("Valid", &format!("{} warning(s)", warnings));
    } else {
        printer.status("Valid", "no problems found");
    }
}
