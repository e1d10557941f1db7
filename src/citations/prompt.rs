//! Rendering retrieved sources into the generation prompt.

use crate::error::{Error, Result};
use crate::types::{RetrievedSource, SourceMap};

/// Opening tag of the source block in a streamed response.
pub const STREAM_SOURCES_OPEN: &str = "<sources>";

/// Closing tag of the source block in a streamed response.
pub const STREAM_SOURCES_CLOSE: &str = "</sources>";

/// Render sources as the context block the model cites from.
///
/// Each source is introduced by the exact marker the model should emit,
/// so well-behaved output round-trips through [`extract_citations`].
///
/// [`extract_citations`]: super::extract_citations
pub fn format_sources_for_llm(sources: &[RetrievedSource]) -> String {
    let mut out = String::new();
    for source in sources {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("Source [{}]:", source.citation_id));
        if let Some(title) = &source.metadata.title {
            out.push_str(&format!(" {title}"));
        }
        out.push('\n');
        out.push_str(source.text.trim_end());
        out.push('\n');
    }
    out
}

/// Render sources as a tagged JSON block a streaming response emits before
/// the answer, e.g. `<sources>[{"citation_id":"a1b2c3d",...}]</sources>`.
pub fn format_sources_for_stream(sources: &[RetrievedSource]) -> Result<String> {
    let body = serde_json::to_string(sources).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(format!("{STREAM_SOURCES_OPEN}{body}{STREAM_SOURCES_CLOSE}"))
}

/// Build the source map for the citation pipeline from retrieved sources.
/// Later entries win on duplicate ids.
pub fn source_map_from(sources: &[RetrievedSource]) -> SourceMap {
    sources
        .iter()
        .map(|s| (s.citation_id.clone(), s.metadata.clone()))
        .collect()
}
