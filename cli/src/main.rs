#![deny(missing_docs)]

//! # apigen CLI
//!
//! Command Line Interface for the retargetable API client-library
//! generator.
//!
//! Supported Commands:
//! - `generate`: Specification -> Model -> Codec -> Rendered output tree.

use crate::error::CliResult;
use clap::{Parser, Subcommand};

mod cmdline;
mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "API client-library generator")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates a client library from an API specification.
    Generate(generate::GenerateArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate(args) => {
            generate::execute(args)?;
        }
    }

    Ok(())
}
