pub mod build;
pub mod completions;
pub mod validate;

use clap::{Parser, Subcommand};

/// assetcrafter - compose sprite sheets, tile maps and icons from source images
///
/// Without a subcommand, builds the project in PATH (default: current directory).
#[derive(Parser, Debug)]
#[command(name = "assetcrafter")]
#[command(version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub build: build::BuildArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build all outputs listed in the manifest
    Build(build::BuildArgs),

    /// Check the manifest without reading or writing images
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
