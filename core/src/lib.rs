#![deny(missing_docs)]

//! # apigen-core
//!
//! The engine of a retargetable API client-library generator. A parser
//! produces the canonical [`api::Api`] model, a per-language [`codec::Codec`]
//! maps it onto target vocabulary, and [`templatedata::TemplateData`]
//! flattens the result into render-ready records. The
//! [`pipeline`] module wires the stages into one deterministic run.

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod formatter;
pub mod loader;
pub mod pipeline;
pub mod templatedata;

pub use config::{CodecOptions, ParserOptions};
pub use error::{AppError, AppResult};
pub use pipeline::generate;
