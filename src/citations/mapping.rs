//! Resolving citation spans against the caller's source map.

use tracing::debug;

use crate::types::{CitationSpan, MappedCitation, SourceMap};

/// Pair each span with its source metadata.
///
/// Unknown identifiers map to `None` so a renderer can flag the dangling
/// citation instead of the whole response failing.
pub fn map_citations_to_sources(spans: &[CitationSpan], sources: &SourceMap) -> Vec<MappedCitation> {
    spans
        .iter()
        .map(|span| {
            let source = sources.get(&span.raw_id).cloned();
            if source.is_none() {
                debug!(raw_id = %span.raw_id, start = span.start, "Unresolved citation");
            }
            MappedCitation {
                span: span.clone(),
                source,
            }
        })
        .collect()
}
