//! Citation marker extraction.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::CitationSpan;

lazy_static! {
    /// `[` ID `]`, where ID starts alphanumeric and may contain `_ . : -`.
    static ref CITATION_PATTERN: Regex =
        Regex::new(r"\[([A-Za-z0-9][A-Za-z0-9_.:\-]{0,63})\]").expect("valid citation pattern");
}

/// Extract citation markers in order of appearance.
///
/// Markers have the form `[id]`. Anything else in brackets is ignored:
/// an opening bracket with no close before the next `[`, ids with spaces
/// or punctuation outside the grammar, and Markdown link labels
/// (`[text](url)`). Skipped markers are never an error.
pub fn extract_citations(text: &str) -> Vec<CitationSpan> {
    CITATION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let marker = caps.get(0)?;
            if text[marker.end()..].starts_with('(') {
                return None;
            }
            let id = caps.get(1)?;
            Some(CitationSpan::new(id.as_str(), marker.start(), marker.end()))
        })
        .collect()
}
