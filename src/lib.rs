//! RAG Prep Library
//!
//! Shared text utilities for retrieval-augmented generation pipelines:
//! recursive text splitting for indexing, and citation extraction and
//! renumbering for model answers that reference retrieved sources.
//! Everything here is a pure function of its inputs.

pub mod api;
pub mod citations;
pub mod error;
pub mod splitter;
pub mod types;

pub use citations::{
    extract_citations, format_sources_for_llm, format_sources_for_stream,
    map_citations_to_sources, normalize_citations, reassign_citations_in_order, source_map_from,
};
pub use error::{Error, Result};
pub use splitter::{split_text, LengthMeasurer, RecursiveTextSplitter, TextSplitter};
pub use types::{Chunk, CitationSpan, NormalizedCitation, SourceMap, SourceMetadata, SplitterConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::citations::*;
    pub use crate::error::{Error, Result};
    pub use crate::splitter::*;
    pub use crate::types::*;
}

/// Default chunk size in tokens
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default chunk overlap in tokens
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
