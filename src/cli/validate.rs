use std::path::PathBuf;

use clap::Args;

use crate::error::{CraftError, Result};
use crate::manifest::Manifest;
use crate::output::{display_path, Printer};
use crate::validation::{print_diagnostics, validate_manifest, ValidationResult};

/// Check the manifest without reading or writing images
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project directory containing the manifest
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Manifest file to read instead of assets.json / assets.yaml
    #[arg(long, short)]
    pub manifest: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let printer = Printer::new();
    let result = check(&args, &printer)?;
    print_diagnostics(&result, &printer);

    if result.has_errors() {
        return Err(CraftError::Manifest {
            message: format!("validation failed with {} error(s)", result.error_count()),
            help: None,
        });
    }
    Ok(())
}

fn check(args: &ValidateArgs, printer: &Printer) -> Result<ValidationResult> {
    let manifest_path = match &args.manifest {
        Some(path) => args.path.join(path),
        None => Manifest::locate(&args.path)?,
    };
    printer.status("Checking", &printer.cyan(&display_path(&manifest_path, &args.path)));

    let manifest = Manifest::load(&manifest_path)?;
    Ok(validate_manifest(&manifest, &args.path))
}
