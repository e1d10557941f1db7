//! Error types for the splitter and citation utilities.

use thiserror::Error;

/// Errors surfaced by this crate.
///
/// Only caller-supplied configuration, tokenizer loading and source
/// serialization can fail.
/// Malformed citation markers and unresolved source ids are reported in
/// the returned values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Splitter configuration rejected before any work started
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Tokenizer data could not be loaded
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Sources could not be serialized for a streamed response
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
