//! Build command implementation.
//!
//! Reads the project manifest and writes every declared output to `out/`.

use std::path::PathBuf;

use clap::Args;

use crate::build::{Build, BuildReport};
use crate::error::Result;
use crate::output::{Printer, Verbosity};

/// Build all outputs listed in the manifest
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory containing the manifest, `src/` and `out/`
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Manifest file to read instead of assets.json / assets.yaml
    #[arg(long, short)]
    pub manifest: Option<PathBuf>,

    /// Print every loaded source
    #[arg(long, short, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(long, short)]
    pub quiet: bool,
}

impl BuildArgs {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

pub fn run(args: BuildArgs) -> Result<BuildReport> {
    let printer = Printer::with_verbosity(args.verbosity());

    let mut build = Build::new(&args.path, &printer);
    if let Some(manifest) = &args.manifest {
        build = build.with_manifest(manifest);
    }

    build.run()
}
