//! Build orchestration.
//!
//! A build runs in three phases against an explicit project root:
//!
//! 1. load every manifest source from `src/` (missing files are skipped with a
//!    warning),
//! 2. run the processing steps in order, each adding one named asset,
//! 3. write every output to `out/`, which is cleared first.
//!
//! The first fatal error stops the build. Outputs already written are left in
//! place.

mod steps;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::asset::{Asset, OUTPUT_DIR, SOURCE_DIR};
use crate::error::{CraftError, Result};
use crate::manifest::{Manifest, OutputEntry};
use crate::output::{dimensions, display_path, plural, Printer};

pub use steps::{run_step, STEP_KINDS};

/// Assets available to steps and outputs, keyed by name.
///
/// Inserting an existing name replaces the earlier asset.
#[derive(Debug, Default)]
pub struct AssetTable {
    assets: HashMap<String, Asset>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `asset` under `name`, returning the asset it replaced.
    pub fn insert(&mut self, name: impl Into<String>, asset: Asset) -> Option<Asset> {
        self.assets.insert(name.into(), asset)
    }

    /// Look up `name`, failing with the referrer in the error.
    pub fn get(&self, name: &str, referenced_by: &str) -> Result<&Asset> {
        self.assets
            .get(name)
            .ok_or_else(|| CraftError::UndefinedAssetReference {
                name: name.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Sources loaded from disk.
    pub sources_loaded: usize,

    /// Sources whose file was missing.
    pub sources_skipped: Vec<String>,

    /// Processing steps run.
    pub steps_run: usize,

    /// Files written, in manifest order.
    pub outputs: Vec<PathBuf>,
}

/// One build of a project directory.
pub struct Build<'a> {
    root: PathBuf,
    manifest: Option<PathBuf>,
    printer: &'a Printer,
}

impl<'a> Build<'a> {
    /// Build the project rooted at `root`, reporting through `printer`.
    pub fn new(root: impl Into<PathBuf>, printer: &'a Printer) -> Self {
        Self {
            root: root.into(),
            manifest: None,
            printer,
        }
    }

    /// Use this manifest instead of looking for `assets.json`. Relative
    /// paths resolve against the project root.
    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    /// Manifest file this build reads.
    pub fn manifest_path(&self) -> Result<PathBuf> {
        match &self.manifest {
            Some(path) => Ok(self.root.join(path)),
            None => Manifest::locate(&self.root),
        }
    }

    /// Load sources, run steps, and write outputs into a fresh `out/`.
    ///
    /// Stops at the first unrecoverable error; outputs already written stay
    /// on disk.
    pub fn run(&self) -> Result<BuildReport> {
        let manifest_path = self.manifest_path()?;
        let manifest = Manifest::load(&manifest_path)?;
        self.printer
            .info("Manifest", &display_path(&manifest_path, &self.root));

        let out_dir = prepare_output_dir(&self.root)?;
        let mut report = BuildReport::default();
        let mut assets = AssetTable::new();

        self.load_sources(&manifest, &mut assets, &mut report)?;

        for step in &manifest.artifacts {
            let asset = run_step(step, &assets, self.printer)?;
            assets.insert(step.name.clone(), asset);
            report.steps_run += 1;
        }

        for output in &manifest.output {
            let path = self.write_output(output, &assets, &out_dir)?;
            report.outputs.push(path);
        }

        self.printer.status(
            "Finished",
            &format!(
                "{} to {}",
                plural(report.outputs.len(), "output", "outputs"),
                display_path(&out_dir, &self.root)
            ),
        );

        Ok(report)
    }

    fn load_sources(
        &self,
        manifest: &Manifest,
        assets: &mut AssetTable,
        report: &mut BuildReport,
    ) -> Result<()> {
        let src_dir = self.root.join(SOURCE_DIR);

        for source in &manifest.sources {
            match Asset::load(&src_dir, &source.path, source.grid()) {
                Ok(asset) => {
                    self.printer.verbose(
                        "Loading",
                        &format!(
                            "{} ({}, {})",
                            source.name,
                            dimensions(asset.size()),
                            asset.mode()
                        ),
                    );
                    assets.insert(source.name.clone(), asset);
                    report.sources_loaded += 1;
                }
                Err(e) if e.is_recoverable() => {
                    self.printer.warning("Skipping", &e.to_string());
                    report.sources_skipped.push(source.name.clone());
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    fn write_output(
        &self,
        output: &OutputEntry,
        assets: &AssetTable,
        out_dir: &Path,
    ) -> Result<PathBuf> {
        let asset = assets.get(&output.source, &format!("output '{}'", output.name))?;

        let path = match output.selection()? {
            Some((row, col)) => {
                let map = asset.as_tiled().ok_or_else(|| CraftError::NotTiled {
                    name: output.source.clone(),
                })?;
                map.select(row, col)?
                    .store(out_dir, &output.name, output.mode())?
            }
            None => asset.store(out_dir, &output.name, output.mode())?,
        };

        self.printer.status(
            "Writing",
            &format!("{} ({})", display_path(&path, &self.root), output.mode()),
        );
        Ok(path)
    }
}

/// Create an empty `out/` under `root`, clearing any previous contents.
pub fn prepare_output_dir(root: &Path) -> Result<PathBuf> {
    let out_dir = root.join(OUTPUT_DIR);

    if out_dir.exists() {
        if !out_dir.is_dir() {
            return Err(CraftError::OutputPathBlocked { path: out_dir });
        }
        fs::remove_dir_all(&out_dir).map_err(|e| CraftError::Io {
            path: out_dir.clone(),
            message: format!("Failed to clear output directory: {}", e),
        })?;
    }

    fs::create_dir_all(&out_dir).map_err(|e| CraftError::Io {
        path: out_dir.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    Ok(out_dir)
}
