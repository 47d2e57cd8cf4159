//! Static checks over a build manifest.
//!
//! Each check takes the manifest and returns a `ValidationResult`. None of
//! them decode images; only file existence is looked at.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::asset::{source_path, Grid, SOURCE_DIR};
use crate::build::STEP_KINDS;
use crate::compose::content_shape;
use crate::manifest::{IconAttributes, MapAttributes, Manifest, StepEntry};

use super::diagnostic::{Diagnostic, Entry, ValidationResult};

/// What a named asset will look like once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Produces {
    Plain,
    /// Tile map, with its grid when it can be known statically.
    Tiled(Option<Grid>),
}

/// Names defined by sources and steps, later definitions replacing earlier.
fn produced(manifest: &Manifest) -> HashMap<&str, Produces> {
    let mut names = HashMap::new();

    for source in &manifest.sources {
        let kind = match source.grid() {
            Some(grid) => Produces::Tiled(Some(grid)),
            None => Produces::Plain,
        };
        names.insert(source.name.as_str(), kind);
    }

    for step in &manifest.artifacts {
        let kind = match step.kind.as_str() {
            "map" => Produces::Tiled(map_grid(step)),
            _ => Produces::Plain,
        };
        names.insert(step.name.as_str(), kind);
    }

    names
}

fn map_grid(step: &StepEntry) -> Option<Grid> {
    let attrs: MapAttributes = step.attributes().ok()?;
    let (rows, cols) = content_shape(&attrs.content).ok()?;
    Grid::from_counts(rows, cols)
}

/// Warn when a name is defined more than once.
pub fn check_duplicate_names(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut seen = HashSet::new();

    let entries = manifest
        .sources
        .iter()
        .map(|s| Entry::Source(s.name.clone()))
        .chain(manifest.artifacts.iter().map(|s| Entry::Step(s.name.clone())));

    for entry in entries {
        if !seen.insert(entry.name().to_string()) {
            result.push(
                Diagnostic::warning(
                    "duplicate-name",
                    entry,
                    "name is already defined; this definition replaces the earlier one",
                )
                .with_help("Rename one of the entries if both are needed"),
            );
        }
    }

    let mut outputs = HashSet::new();
    for output in &manifest.output {
        if !outputs.insert(output.name.as_str()) {
            result.push(Diagnostic::warning(
                "duplicate-output",
                Entry::Output(output.name.clone()),
                "file is written more than once",
            ));
        }
    }

    result
}

/// Warn about source files that do not exist; the build will skip them.
pub fn check_missing_files(manifest: &Manifest, root: &Path) -> ValidationResult {
    let mut result = ValidationResult::new();
    let src_dir = root.join(SOURCE_DIR);

    for source in &manifest.sources {
        let path = source_path(&src_dir, &source.path);
        if !path.is_file() {
            result.push(
                Diagnostic::warning(
                    "missing-file",
                    Entry::Source(source.name.clone()),
                    format!("{} does not exist", path.display()),
                )
                .with_help("The source will be skipped and anything using it will fail"),
            );
        }
    }

    result
}

/// Every step and output must reference names defined before it.
pub fn check_references(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut defined: HashSet<&str> = manifest.sources.iter().map(|s| s.name.as_str()).collect();

    for step in &manifest.artifacts {
        for name in &step.sources {
            if !defined.contains(name.as_str()) {
                result.push(undefined(name, Entry::Step(step.name.clone())));
            }
        }
        defined.insert(step.name.as_str());
    }

    for output in &manifest.output {
        if !defined.contains(output.source.as_str()) {
            result.push(undefined(&output.source, Entry::Output(output.name.clone())));
        }
    }

    result
}

fn undefined(name: &str, entry: Entry) -> Diagnostic {
    Diagnostic::error(
        "undefined-reference",
        entry,
        format!("'{}' is not defined before it is used", name),
    )
    .with_help("Declare it under `sources` or as an earlier step")
}

/// Step types must be known and their attributes well formed.
pub fn check_steps(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();

    for step in &manifest.artifacts {
        match step.kind.as_str() {
            "map" => result.merge(check_map_step(step)),
            "icon" => result.merge(check_icon_step(step)),
            other => result.push(
                Diagnostic::error(
                    "unknown-step",
                    Entry::Step(step.name.clone()),
                    format!("unknown type '{}'", other),
                )
                .with_help(format!("Supported types: {}", STEP_KINDS.join(", "))),
            ),
        }
    }

    result
}

fn check_map_step(step: &StepEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    let entry = || Entry::Step(step.name.clone());

    if step.row.is_some() || step.col.is_some() {
        result.push(
            Diagnostic::error(
                "unexpected-selection",
                entry(),
                "map steps do not take `row`/`col`",
            )
            .with_help("Select tiles per cell in `content`, or on the output"),
        );
    }

    let attrs: MapAttributes = match step.attributes() {
        Ok(attrs) => attrs,
        Err(e) => {
            result.push(Diagnostic::error("invalid-attributes", entry(), e.to_string()));
            return result;
        }
    };

    if step.sources.is_empty() {
        result.push(Diagnostic::error("no-sources", entry(), "map has no sources"));
    }

    if let Err(e) = content_shape(&attrs.content) {
        result.push(Diagnostic::error("malformed-grid", entry(), e.to_string()));
    }

    for cell in attrs.content.iter().flatten() {
        if cell.source >= step.sources.len() {
            result.push(Diagnostic::error(
                "source-index",
                entry(),
                format!(
                    "content references source {} but only {} are listed",
                    cell.source,
                    step.sources.len()
                ),
            ));
        }
    }

    result
}

fn check_icon_step(step: &StepEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    let entry = || Entry::Step(step.name.clone());

    if let Err(e) = step.attributes::<IconAttributes>() {
        result.push(Diagnostic::error("invalid-attributes", entry(), e.to_string()));
    }

    match step.sources.len() {
        0 => result.push(Diagnostic::error("no-sources", entry(), "icon has no sources")),
        1 => {}
        n => result.push(Diagnostic::warning(
            "extra-sources",
            entry(),
            format!("{} sources listed but only the first is used", n),
        )),
    }

    result
}

/// Tile selections on icon steps and outputs must be complete, target a
/// tile map, and fit its grid.
pub fn check_selections(manifest: &Manifest) -> ValidationResult {
    let mut result = ValidationResult::new();
    let produced = produced(manifest);

    let selections = manifest
        .artifacts
        .iter()
        .filter(|step| step.kind == "icon")
        .filter_map(|step| {
            let target = step.sources.first()?;
            Some((Entry::Step(step.name.clone()), target, step.selection()))
        })
        .chain(manifest.output.iter().map(|output| {
            (
                Entry::Output(output.name.clone()),
                &output.source,
                output.selection(),
            )
        }));

    for (entry, target, selection) in selections {
        let (row, col) = match selection {
            Ok(Some(pair)) => pair,
            Ok(None) => continue,
            Err(_) => {
                result.push(Diagnostic::error(
                    "incomplete-selection",
                    entry,
                    "gives only one of `row` and `col`",
                ));
                continue;
            }
        };

        match produced.get(target.as_str()) {
            Some(Produces::Plain) => result.push(
                Diagnostic::error(
                    "not-tiled",
                    entry,
                    format!("selects a tile from '{}', which has no grid", target),
                )
                .with_help("Give the source `rows` and `cols`, or drop `row`/`col`"),
            ),
            Some(Produces::Tiled(Some(grid))) if row >= grid.rows() || col >= grid.cols() => {
                result.push(
                    Diagnostic::error(
                        "tile-out-of-bounds",
                        entry,
                        format!(
                            "selects tile ({}, {}) but '{}' is {}x{}",
                            row,
                            col,
                            target,
                            grid.rows(),
                            grid.cols()
                        ),
                    )
                    .with_help("Tile indices are zero-based"),
                )
            }
            // Undefined targets are reported by check_references.
            _ => {}
        }
    }

    result
}
