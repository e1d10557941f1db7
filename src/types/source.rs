//! Source metadata used to resolve citations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata describing a retrieved source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// ID of the underlying document
    pub document_id: String,

    /// Human-readable title
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,

    /// Where in the document the cited text lives (URL, page, chunk id)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub locator: Option<String>,
}

impl SourceMetadata {
    /// Create metadata for a document with no title or locator.
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            title: None,
            locator: None,
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the locator.
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }
}

/// Lookup from citation identifier to source metadata.
pub type SourceMap = HashMap<String, SourceMetadata>;

/// A retrieved passage the generator is allowed to cite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedSource {
    /// Identifier the model is told to cite, e.g. `a1b2c3d`
    pub citation_id: String,

    /// Retrieved passage text
    pub text: String,

    pub metadata: SourceMetadata,
}

impl RetrievedSource {
    pub fn new(
        citation_id: impl Into<String>,
        text: impl Into<String>,
        metadata: SourceMetadata,
    ) -> Self {
        Self {
            citation_id: citation_id.into(),
            text: text.into(),
            metadata,
        }
    }
}
