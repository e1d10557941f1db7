//! Configuration types for splitting and for the HTTP service.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::splitter::separators::default_separators;
use crate::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

/// Where a separator ends up after a split.
///
/// Separators are never dropped, so joining the fragments always
/// reconstructs the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepSeparator {
    /// Prefix of the following fragment
    Start,
    /// Suffix of the preceding fragment
    #[default]
    End,
}

/// Configuration for a single splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Maximum measured length per chunk
    pub chunk_size: usize,

    /// Measured length shared between adjacent chunks
    pub chunk_overlap: usize,

    /// Separators from most to least preferred
    pub separators: Vec<String>,

    /// Which side of a split the separator stays on
    #[serde(default)]
    pub keep_separator: KeepSeparator,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: default_separators(),
            keep_separator: KeepSeparator::default(),
        }
    }
}

impl SplitterConfig {
    /// Create a config with the given chunk size and no overlap.
    pub fn with_size(size: usize) -> Self {
        Self {
            chunk_size: size,
            chunk_overlap: 0,
            ..Default::default()
        }
    }

    /// Set the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Replace the separator hierarchy.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Set the separator placement policy.
    pub fn with_keep_separator(mut self, keep: KeepSeparator) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Reject configurations the splitter cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid_config("chunk_size must be greater than 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.separators.is_empty() {
            return Err(Error::invalid_config("separator hierarchy must not be empty"));
        }
        Ok(())
    }
}

/// How the service measures chunk length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthFunction {
    /// Unicode scalar values
    Chars,
    /// Extended grapheme clusters
    Graphemes,
    /// cl100k_base tokens
    #[default]
    Tokens,
}

impl std::str::FromStr for LengthFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chars" | "characters" => Ok(LengthFunction::Chars),
            "graphemes" => Ok(LengthFunction::Graphemes),
            "tokens" | "tiktoken" => Ok(LengthFunction::Tokens),
            other => Err(Error::invalid_config(format!(
                "unknown length function: {other}"
            ))),
        }
    }
}

/// Service configuration loaded from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Default chunk size
    pub default_chunk_size: usize,

    /// Default chunk overlap
    pub default_chunk_overlap: usize,

    /// Default length function
    pub length_function: LengthFunction,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3017,
            default_chunk_size: DEFAULT_CHUNK_SIZE,
            default_chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            length_function: LengthFunction::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            default_chunk_size: std::env::var("CHUNK_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_chunk_size),
            default_chunk_overlap: std::env::var("CHUNK_OVERLAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_chunk_overlap),
            length_function: std::env::var("LENGTH_FUNCTION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.length_function),
        }
    }

    /// The splitter configuration requests start from.
    pub fn splitter_config(&self) -> SplitterConfig {
        SplitterConfig {
            chunk_size: self.default_chunk_size,
            chunk_overlap: self.default_chunk_overlap,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SplitterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_overlap_not_smaller_than_size_rejected() {
        let config = SplitterConfig::with_size(10).with_overlap(10);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("chunk_overlap"));
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(SplitterConfig::with_size(0).validate().is_err());
    }

    #[test]
    fn test_empty_separators_rejected() {
        let config = SplitterConfig::with_size(10).with_separators(Vec::<String>::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_length_function_parsing() {
        assert_eq!("chars".parse::<LengthFunction>().unwrap(), LengthFunction::Chars);
        assert_eq!("TOKENS".parse::<LengthFunction>().unwrap(), LengthFunction::Tokens);
        assert!("bytes".parse::<LengthFunction>().is_err());
    }
}
