//! Citation extraction and normalization for generated answers.
//!
//! The three steps can be used independently or composed with
//! [`normalize_citations`]:
//! 1. [`extract_citations`] finds `[id]` markers in the text
//! 2. [`map_citations_to_sources`] resolves ids against a [`SourceMap`]
//! 3. [`reassign_citations_in_order`] renumbers them from 1 and rewrites the text

mod extract;
mod mapping;
mod prompt;
mod reorder;

pub use extract::extract_citations;
pub use mapping::map_citations_to_sources;
pub use prompt::{
    format_sources_for_llm, format_sources_for_stream, source_map_from, STREAM_SOURCES_CLOSE,
    STREAM_SOURCES_OPEN,
};
pub use reorder::reassign_citations_in_order;

use tracing::debug;

use crate::types::{NormalizedText, SourceMap};

/// Extract, resolve and renumber citations in one pass over `text`.
pub fn normalize_citations(text: &str, sources: &SourceMap) -> NormalizedText {
    let spans = extract_citations(text);
    let mapped = map_citations_to_sources(&spans, sources);
    let normalized = reassign_citations_in_order(text, &mapped);

    debug!(
        markers = spans.len(),
        distinct = normalized.citations.len(),
        unresolved = normalized.unresolved().len(),
        "Normalized citations"
    );

    normalized
}
