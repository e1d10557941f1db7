//! Renumbering citations in order of first appearance.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{MappedCitation, NormalizedCitation, NormalizedText};

/// Renumber citations 1, 2, 3, ... in order of first appearance.
///
/// Each distinct id gets the next number the first time it is seen and
/// keeps it for repeats. Every marker is rewritten to `[n]`; all other
/// text is copied through untouched. Spans outside `text`, off a char
/// boundary, or overlapping an earlier span are skipped.
///
/// Running this on its own output, with sources keyed by the new
/// numbers, leaves the text unchanged.
pub fn reassign_citations_in_order(text: &str, citations: &[MappedCitation]) -> NormalizedText {
    let mut ordered: Vec<&MappedCitation> = citations.iter().collect();
    ordered.sort_by_key(|c| c.span.start);

    let mut numbers: HashMap<&str, usize> = HashMap::new();
    let mut references: Vec<NormalizedCitation> = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for citation in ordered {
        let span = &citation.span;
        let in_bounds = span.start < span.end
            && span.end <= text.len()
            && text.is_char_boundary(span.start)
            && text.is_char_boundary(span.end);
        if !in_bounds || span.start < cursor {
            debug!(
                raw_id = %span.raw_id,
                start = span.start,
                end = span.end,
                "Skipping invalid or overlapping citation span"
            );
            continue;
        }

        let number = match numbers.get(span.raw_id.as_str()) {
            Some(&n) => n,
            None => {
                let n = references.len() + 1;
                numbers.insert(span.raw_id.as_str(), n);
                references.push(NormalizedCitation {
                    display_number: n,
                    source_id: span.raw_id.clone(),
                    source: citation.source.clone(),
                });
                n
            }
        };

        out.push_str(&text[cursor..span.start]);
        out.push_str(&format!("[{number}]"));
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);

    NormalizedText {
        text: out,
        citations: references,
    }
}
