//! CLI error type, wrapping the core error for exit-path reporting.

use apigen_core::AppError;
use derive_more::{Display, From};

/// Errors surfaced by the command-line front end.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A failure reported by the generation engine.
    #[display("{_0}")]
    Core(AppError),

    /// A malformed command-line invocation.
    #[from(ignore)]
    #[display("Usage Error: {_0}")]
    Usage(String),
}

impl std::error::Error for CliError {}

/// Helper type alias for Result using CliError.
pub type CliResult<T> = Result<T, CliError>;
