//! Merges raw command-line arguments into the option structs the engine
//! consumes. Repeatable `key=value` flags land in always-present maps, so
//! downstream code never distinguishes "absent" from "empty".

use crate::error::{CliError, CliResult};
use apigen_core::{CodecOptions, ParserOptions};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The fully merged invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLine {
    /// Root of the project being generated into.
    pub project_root: String,
    /// The specification format key, e.g. `model`.
    pub specification_format: String,
    /// Parser-facing options.
    pub parser: ParserOptions,
    /// Codec-facing options.
    pub codec: CodecOptions,
}

/// Builds the merged invocation from the parsed arguments.
#[allow(clippy::too_many_arguments)]
pub fn merge(
    project_root: String,
    specification_format: String,
    specification_source: String,
    service_config: String,
    source_options: &[String],
    language: String,
    output: PathBuf,
    template_dir: String,
    codec_options: &[String],
) -> CliResult<CommandLine> {
    Ok(CommandLine {
        project_root: project_root.clone(),
        specification_format,
        parser: ParserOptions {
            source: specification_source,
            service_config,
            options: parse_key_values(source_options, "--source-option")?,
        },
        codec: CodecOptions {
            language,
            project_root,
            out_dir: output,
            template_dir,
            options: parse_key_values(codec_options, "--codec-option")?,
        },
    })
}

/// Splits each `key=value` entry at the first `=`, keeping the value
/// verbatim. `package:` option values carry their own `=` signs, which is
/// why only the first one separates key from value.
fn parse_key_values(entries: &[String], flag: &str) -> CliResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(CliError::Usage(format!(
                "invalid {} '{}': expected key=value",
                flag, entry
            )));
        };
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
