//! Citation type definitions.

use serde::{Deserialize, Serialize};

use super::SourceMetadata;

/// One citation marker found in generated text.
///
/// `start..end` is the byte range of the whole marker, brackets included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationSpan {
    /// Identifier between the brackets
    pub raw_id: String,
    pub start: usize,
    pub end: usize,
}

impl CitationSpan {
    pub fn new(raw_id: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            raw_id: raw_id.into(),
            start,
            end,
        }
    }
}

/// A citation span paired with the source it resolved to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedCitation {
    pub span: CitationSpan,

    /// `None` when the identifier is not in the source map
    pub source: Option<SourceMetadata>,
}

impl MappedCitation {
    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }
}

/// A citation after renumbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCitation {
    /// Number shown in the rewritten text, starting at 1
    pub display_number: usize,

    /// Identifier the model originally cited
    pub source_id: String,

    /// Resolved source, `None` for a dangling citation
    #[serde(default)]
    pub source: Option<SourceMetadata>,
}

/// Rewritten text plus its reference list in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedText {
    pub text: String,
    pub citations: Vec<NormalizedCitation>,
}

impl NormalizedText {
    /// Identifiers that did not resolve to a source.
    pub fn unresolved(&self) -> Vec<&str> {
        self.citations
            .iter()
            .filter(|c| c.source.is_none())
            .map(|c| c.source_id.as_str())
            .collect()
    }
}
