//! Chunk type definitions.

use serde::{Deserialize, Serialize};

/// A bounded slice of a source text produced by the splitter.
///
/// Chunks are the unit of content that gets embedded and indexed. Offsets
/// are byte offsets into the original text, so
/// `&source[chunk.start_offset..chunk.end_offset()] == chunk.text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// The text of the chunk
    pub text: String,

    /// Byte offset of the chunk in the original text
    pub start_offset: usize,

    /// Order of this chunk within the split output (0-indexed)
    pub index: usize,

    /// Length of `text` as reported by the measurer used for splitting
    pub length: usize,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(text: String, start_offset: usize, index: usize, length: usize) -> Self {
        Self {
            text,
            start_offset,
            index,
            length,
        }
    }

    /// Byte offset one past the end of the chunk in the original text.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    /// Number of bytes this chunk shares with the one before it.
    pub fn overlap_with(&self, previous: &Chunk) -> usize {
        previous.end_offset().saturating_sub(self.start_offset)
    }
}

/// A document handed to [`TextSplitter::split_documents`].
///
/// [`TextSplitter::split_documents`]: crate::splitter::TextSplitter::split_documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Caller-defined document identifier
    pub id: String,

    /// Raw document text
    pub content: String,

    /// Arbitrary metadata copied onto every chunk of this document
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl SourceDocument {
    /// Create a document without metadata.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach metadata to the document.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A chunk tagged with the document it was split from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// ID of the document this chunk was extracted from
    pub document_id: String,

    #[serde(flatten)]
    pub chunk: Chunk,

    /// Copy of the source document's metadata
    #[serde(skip_serializing_if = "serde_json::Value::is_null", default)]
    pub metadata: serde_json::Value,
}
