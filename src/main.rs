use assetcrafter::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build(args)) => {
            assetcrafter::cli::build::run(args)?;
        }
        Some(Commands::Validate(args)) => assetcrafter::cli::validate::run(args)?,
        Some(Commands::Completions(args)) => assetcrafter::cli::completions::run(args)?,
        None => {
            assetcrafter::cli::build::run(cli.build)?;
        }
    }

    Ok(())
}
