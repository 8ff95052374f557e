//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate. One variant per failure class:
/// unresolved references, untranslatable constructs, external process
/// failures, malformed options, and IO. Every failure is terminal for the
/// generation run that produced it.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// An identifier could not be resolved through the generation state.
    #[from(ignore)]
    #[display("unresolved reference '{id}' (referenced by {referrer})")]
    Reference {
        /// The identifier that failed to resolve.
        id: String,
        /// The entity that held the dangling reference.
        referrer: String,
    },

    /// A codec could not represent a construct in its target language.
    #[from(ignore)]
    #[display("cannot map {construct} to {language}")]
    Mapping {
        /// Description of the offending construct.
        construct: String,
        /// The target language of the codec that failed.
        language: String,
    },

    /// An external process (parser, formatter) failed.
    #[from(ignore)]
    #[display("external command failed: {command}: {detail}")]
    External {
        /// The command line that was invoked.
        command: String,
        /// Captured stderr/stdout, or the launch failure.
        detail: String,
    },

    /// A malformed or unknown configuration option.
    /// Raised at configuration-merge time, before any model work.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
