#![deny(missing_docs)]

//! # Generate Command
//!
//! Parses a specification, projects it through the selected language codec,
//! and writes the rendered output tree.

use crate::cmdline;
use crate::error::CliResult;
use apigen_core::generate;
use std::path::PathBuf;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Root of the project the output belongs to.
    #[clap(long, default_value = ".")]
    pub project_root: String,

    /// Format of the specification source (e.g. `model`).
    #[clap(long, default_value = "model")]
    pub specification_format: String,

    /// Path to the specification source.
    #[clap(long, default_value = "")]
    pub specification_source: String,

    /// Path to the service-configuration overlay.
    #[clap(long, default_value = "")]
    pub service_config: String,

    /// Parser option, `key=value`. Repeatable.
    #[clap(long = "source-option")]
    pub source_option: Vec<String>,

    /// Target language (e.g. `rust`, `go`).
    #[clap(long, default_value = "")]
    pub language: String,

    /// Directory receiving the generated tree.
    #[clap(long, default_value = "generated")]
    pub output: PathBuf,

    /// Template directory override; empty selects the codec default.
    #[clap(long, default_value = "")]
    pub template_dir: String,

    /// Codec option, `key=value`. Repeatable.
    /// Example: `--codec-option package:gax=package=gcp-sdk-gax,path=src/gax`
    #[clap(long = "codec-option")]
    pub codec_option: Vec<String>,
}

/// Executes one generation run.
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let cmdline = cmdline::merge(
        args.project_root.clone(),
        args.specification_format.clone(),
        args.specification_source.clone(),
        args.service_config.clone(),
        &args.source_option,
        args.language.clone(),
        args.output.clone(),
        args.template_dir.clone(),
        &args.codec_option,
    )?;
    println!(
        "Generating {} client for {}...",
        cmdline.codec.language, cmdline.parser.source
    );
    generate(&cmdline.specification_format, &cmdline.parser, &cmdline.codec)?;
    println!("Generation completed successfully.");
    Ok(())
}
