//! Splitter trait and length measurers.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};
use crate::types::{Chunk, DocumentChunk, SourceDocument};

/// The core trait that text splitters implement.
///
/// A splitter is configured once, so splitting itself cannot fail.
pub trait TextSplitter: Send + Sync {
    /// Get the name of this splitter.
    fn name(&self) -> &'static str;

    /// Split text into ordered, possibly overlapping chunks.
    fn split_text(&self, text: &str) -> Vec<Chunk>;

    /// Split every document, tagging each chunk with its document id and
    /// a copy of the document metadata. Chunk indices restart at 0 per
    /// document.
    fn split_documents(&self, documents: &[SourceDocument]) -> Vec<DocumentChunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .map(move |chunk| DocumentChunk {
                        document_id: doc.id.clone(),
                        chunk,
                        metadata: doc.metadata.clone(),
                    })
            })
            .collect()
    }

    /// Get the description of this splitter.
    fn description(&self) -> &'static str {
        "A text splitter"
    }
}

/// Measures the length of a piece of text.
///
/// The splitter never assumes measurements are additive, it always
/// re-measures the candidate chunk as a whole.
pub trait LengthMeasurer: Send + Sync {
    fn measure(&self, text: &str) -> usize;
}

impl<F> LengthMeasurer for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn measure(&self, text: &str) -> usize {
        self(text)
    }
}

/// Counts Unicode scalar values.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCounter;

impl LengthMeasurer for CharCounter {
    fn measure(&self, text: &str) -> usize {
        text.chars().count()
    }
}

/// Counts extended grapheme clusters, i.e. user-perceived characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphemeCounter;

impl LengthMeasurer for GraphemeCounter {
    fn measure(&self, text: &str) -> usize {
        text.graphemes(true).count()
    }
}

/// Token counter backed by tiktoken.
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

impl TiktokenCounter {
    /// Create a counter with the cl100k_base encoding (GPT-4/ChatGPT).
    pub fn new() -> Result<Self> {
        Self::with_encoding("cl100k_base")
    }

    /// Create a token counter with a specific encoding.
    pub fn with_encoding(encoding_name: &str) -> Result<Self> {
        let bpe = match encoding_name {
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" => tiktoken_rs::r50k_base(),
            other => {
                return Err(Error::invalid_config(format!(
                    "unknown tiktoken encoding: {other}"
                )))
            }
        }
        .map_err(|e| Error::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }

    /// Count the number of tokens in the given text.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl LengthMeasurer for TiktokenCounter {
    fn measure(&self, text: &str) -> usize {
        self.count_tokens(text)
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter").finish_non_exhaustive()
    }
}
