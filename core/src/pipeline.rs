//! # Generation Pipeline
//!
//! The end-to-end run: load the specification, normalize the model, build
//! the generation state, project through the codec, render, and format the
//! generated tree. Rendering sits behind [`Renderer`] so the pipeline can
//! be exercised without a template engine.

use crate::api::pagination::mark_pagination;
use crate::api::state::State;
use crate::codec::new_codec;
use crate::config::{validate_codec_options, CodecOptions, ParserOptions};
use crate::error::{AppError, AppResult};
use crate::formatter::{format_source_tree, CommandExecutor, ShellExecutor};
use crate::loader::parse_specification;
use crate::templatedata::TemplateData;
use std::path::Path;

/// Writes the projected template data into the output directory.
pub trait Renderer {
    /// Renders `data` under `out_dir`.
    fn render(&self, data: &TemplateData, out_dir: &Path) -> AppResult<()>;
}

/// Renders the projection as one pretty-printed JSON document.
///
/// The default renderer: the document is the full template-data contract,
/// so it doubles as the golden-file format for regression testing.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, data: &TemplateData, out_dir: &Path) -> AppResult<()> {
        std::fs::create_dir_all(out_dir)?;
        let stem = if data.name_to_lower.is_empty() {
            "api"
        } else {
            data.name_to_lower.as_str()
        };
        let rendered = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::General(format!("cannot serialize template data: {}", e)))?;
        std::fs::write(out_dir.join(format!("{}.json", stem)), rendered)?;
        Ok(())
    }
}

/// Runs one full generation with the default renderer and executor.
pub fn generate(
    specification_format: &str,
    parser_opts: &ParserOptions,
    codec_opts: &CodecOptions,
) -> AppResult<()> {
    generate_with(
        specification_format,
        parser_opts,
        codec_opts,
        &JsonRenderer,
        &ShellExecutor,
    )
}

/// Runs one full generation with injected rendering and process execution.
///
/// Option validation runs first so configuration mistakes surface before
/// any file is read.
pub fn generate_with<R: Renderer, E: CommandExecutor>(
    specification_format: &str,
    parser_opts: &ParserOptions,
    codec_opts: &CodecOptions,
    renderer: &R,
    executor: &E,
) -> AppResult<()> {
    validate_codec_options(&codec_opts.options)?;
    let codec = new_codec(codec_opts)?;
    let mut model = parse_specification(specification_format, parser_opts)?;
    mark_pagination(&mut model);
    let mut state = State::build(&model)?;
    let data = TemplateData::new(&model, codec.as_ref(), &mut state)?;
    renderer.render(&data, &codec_opts.out_dir)?;
    format_source_tree(&codec_opts.language, &codec_opts.out_dir, executor)
}
