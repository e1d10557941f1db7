//! Recursive character text splitter with hierarchical separators.

use std::ops::Range;

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::base::{LengthMeasurer, TextSplitter};
use crate::error::Result;
use crate::types::{Chunk, KeepSeparator, SplitterConfig};

/// Splitter that divides text hierarchically and merges it back up.
///
/// Separators are tried in order of preference. A fragment is only split
/// with a finer separator when it still exceeds `chunk_size` on its own,
/// so coarse boundaries (paragraphs, lines) survive whenever they fit.
/// The resulting pieces are merged greedily into chunks, and each chunk
/// after the first re-includes a trailing slice of its predecessor of at
/// most `chunk_overlap`.
///
/// Descent through the hierarchy uses an explicit worklist, so deeply
/// nested or separator-free inputs cannot exhaust the call stack.
pub struct RecursiveTextSplitter<M> {
    config: SplitterConfig,
    measurer: M,
}

impl<M: LengthMeasurer> RecursiveTextSplitter<M> {
    /// Create a splitter, rejecting an invalid configuration up front.
    pub fn new(config: SplitterConfig, measurer: M) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, measurer })
    }

    /// Get the configuration this splitter was built with.
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }
}

impl<M: LengthMeasurer> TextSplitter for RecursiveTextSplitter<M> {
    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Hierarchically splits text using multiple separator levels"
    }

    fn split_text(&self, text: &str) -> Vec<Chunk> {
        split_validated(text, &self.config, &self.measurer)
    }
}

/// Split `text` with the given configuration and length measurer.
///
/// Fails only when the configuration is invalid, before any splitting work.
pub fn split_text(
    text: &str,
    config: &SplitterConfig,
    measurer: &dyn LengthMeasurer,
) -> Result<Vec<Chunk>> {
    config.validate()?;
    Ok(split_validated(text, config, measurer))
}

fn split_validated<M: LengthMeasurer + ?Sized>(
    text: &str,
    config: &SplitterConfig,
    measurer: &M,
) -> Vec<Chunk> {
    if text.is_empty() {
        return vec![];
    }

    let pieces = atomic_pieces(text, config, measurer);
    let chunks = merge_pieces(text, &pieces, config, measurer);

    debug!(
        bytes = text.len(),
        pieces = pieces.len(),
        chunks = chunks.len(),
        "Split text"
    );

    chunks
}

/// A byte range still waiting to be split, and the first separator level
/// allowed for it.
struct Task {
    range: Range<usize>,
    level: usize,
}

/// A contiguous slice of the text that fits `chunk_size` (unless it is
/// indivisible), plus the first separator level finer than the one that
/// produced it.
struct Piece {
    range: Range<usize>,
    level: usize,
}

/// Break `text` into contiguous pieces that each fit `chunk_size`, except
/// for indivisible pieces that are emitted oversized.
fn atomic_pieces<M: LengthMeasurer + ?Sized>(
    text: &str,
    config: &SplitterConfig,
    measurer: &M,
) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut stack = vec![Task {
        range: 0..text.len(),
        level: 0,
    }];

    while let Some(Task { range, level }) = stack.pop() {
        let fragment = &text[range.clone()];
        if measurer.measure(fragment) <= config.chunk_size {
            pieces.push(Piece { range, level });
            continue;
        }

        let Some((chosen, separator)) = select_separator(fragment, &config.separators, level)
        else {
            // Hierarchy exhausted, keep the fragment whole
            pieces.push(Piece { range, level });
            continue;
        };

        // Pushed in reverse so pieces pop off in document order
        for part in split_keeping_separator(fragment, separator, config.keep_separator)
            .into_iter()
            .rev()
        {
            stack.push(Task {
                range: range.start + part.start..range.start + part.end,
                level: chosen + 1,
            });
        }
    }

    pieces
}

/// Find the first separator at or after `level` that occurs in `text`.
/// The empty separator always applies.
fn select_separator<'s>(
    text: &str,
    separators: &'s [String],
    level: usize,
) -> Option<(usize, &'s str)> {
    separators
        .iter()
        .enumerate()
        .skip(level)
        .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
        .map(|(i, sep)| (i, sep.as_str()))
}

/// Split on `separator`, attaching each occurrence to one side of the cut.
/// Returns non-empty ranges relative to `text` that cover it exactly.
fn split_keeping_separator(
    text: &str,
    separator: &str,
    keep: KeepSeparator,
) -> Vec<Range<usize>> {
    if separator.is_empty() {
        return text
            .grapheme_indices(true)
            .map(|(i, g)| i..i + g.len())
            .collect();
    }

    let mut parts = Vec::new();
    let mut start = 0;

    for (pos, matched) in text.match_indices(separator) {
        let cut = match keep {
            KeepSeparator::End => pos + matched.len(),
            KeepSeparator::Start => pos,
        };
        if cut > start {
            parts.push(start..cut);
            start = cut;
        }
    }

    if start < text.len() {
        parts.push(start..text.len());
    }

    parts
}

/// Greedily merge pieces into chunks, back-filling overlap between them.
fn merge_pieces<M: LengthMeasurer + ?Sized>(
    text: &str,
    pieces: &[Piece],
    config: &SplitterConfig,
    measurer: &M,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut next = 0;

    while next < pieces.len() {
        let mut last = next;

        // The first unconsumed piece is always taken, even if oversized
        while last + 1 < pieces.len()
            && measurer.measure(&text[start..pieces[last + 1].range.end]) <= config.chunk_size
        {
            last += 1;
        }

        let chunk_text = &text[start..pieces[last].range.end];
        chunks.push(Chunk::new(
            chunk_text.to_string(),
            start,
            chunks.len(),
            measurer.measure(chunk_text),
        ));

        if last + 1 >= pieces.len() {
            break;
        }

        start = overlap_start(text, pieces, start, last, config, measurer);
        next = last + 1;
    }

    chunks
}

/// Pick the byte offset where the next chunk starts.
///
/// The closed chunk spans `chunk_start..pieces[last].end`. Whole pieces are
/// walked back first while the trailing slice stays within `chunk_overlap`
/// and still leaves room for the next unconsumed piece. The piece straddling
/// that boundary is then searched for a closer cut using the separators finer
/// than the one that produced it. The result is always greater than
/// `chunk_start`, so every chunk advances.
fn overlap_start<M: LengthMeasurer + ?Sized>(
    text: &str,
    pieces: &[Piece],
    chunk_start: usize,
    last: usize,
    config: &SplitterConfig,
    measurer: &M,
) -> usize {
    let closed_end = pieces[last].range.end;
    if config.chunk_overlap == 0 {
        return closed_end;
    }

    let next_end = pieces[last + 1].range.end;
    let fits = |start: usize| {
        measurer.measure(&text[start..closed_end]) <= config.chunk_overlap
            && measurer.measure(&text[start..next_end]) <= config.chunk_size
    };

    let mut idx = last + 1;
    while idx > 0
        && pieces[idx - 1].range.start > chunk_start
        && fits(pieces[idx - 1].range.start)
    {
        idx -= 1;
    }

    let boundary = pieces[idx].range.start;
    if idx == 0 {
        return boundary;
    }

    let straddling = &pieces[idx - 1];
    let lower = straddling.range.start.max(chunk_start);
    finer_boundary(text, straddling, lower, boundary, config, &fits).unwrap_or(boundary)
}

/// Earliest cut inside `piece`, strictly between `lower` and `upper`, that
/// satisfies `fits`.
///
/// Cuts come from the non-empty separators at or after the piece's level.
/// Grapheme cuts are tried only when none of those fit and the hierarchy
/// ends in the empty separator.
fn finer_boundary(
    text: &str,
    piece: &Piece,
    lower: usize,
    upper: usize,
    config: &SplitterConfig,
    fits: &dyn Fn(usize) -> bool,
) -> Option<usize> {
    if lower >= upper {
        return None;
    }

    let finer = config.separators.get(piece.level..).unwrap_or(&[]);
    let fragment = &text[piece.range.clone()];
    let cuts_for = |separator: &str| -> Vec<usize> {
        split_keeping_separator(fragment, separator, config.keep_separator)
            .into_iter()
            .map(|part| piece.range.start + part.start)
            .filter(|&cut| cut > lower && cut < upper)
            .collect()
    };

    let mut cuts: Vec<usize> = finer
        .iter()
        .filter(|sep| !sep.is_empty())
        .flat_map(|sep| cuts_for(sep.as_str()))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    if let Some(cut) = cuts.into_iter().find(|&cut| fits(cut)) {
        return Some(cut);
    }

    if finer.iter().any(|sep| sep.is_empty()) {
        return cuts_for("").into_iter().find(|&cut| fits(cut));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::splitter::{CharCounter, TiktokenCounter};
    use crate::types::SourceDocument;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Retrieval pipelines split documents before embedding them. \
        Each chunk must stay small enough for the model.\n\n\
        Overlap keeps context across boundaries! Does it work? It should; mostly, anyway.\n\
        Unicode text like café, naïve and 日本語のテキスト must survive intact.\n\n\
        A final paragraph closes the sample.";

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Rebuild the source by dropping each chunk's overlapping prefix.
    fn reconstruct(chunks: &[Chunk]) -> String {
        let mut out = String::new();
        let mut covered = 0;
        for chunk in chunks {
            assert!(chunk.start_offset <= covered, "gap before chunk {}", chunk.index);
            out.push_str(&chunk.text[covered - chunk.start_offset..]);
            covered = chunk.end_offset();
        }
        out
    }

    fn words_config(size: usize, overlap: usize) -> SplitterConfig {
        SplitterConfig::with_size(size)
            .with_overlap(overlap)
            .with_separators([" ", ""])
    }

    #[test]
    fn test_empty_text() {
        let chunks = split_text("", &SplitterConfig::with_size(10), &CharCounter).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_text() {
        let chunks =
            split_text("Hello, world!", &SplitterConfig::with_size(100), &CharCounter).unwrap();
        assert_eq!(chunks, vec![Chunk::new("Hello, world!".to_string(), 0, 0, 13)]);
    }

    #[test]
    fn test_invalid_config_rejected_eagerly() {
        let config = SplitterConfig::with_size(10).with_overlap(10);
        let err = split_text("", &config, &CharCounter).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
        assert!(RecursiveTextSplitter::new(config, CharCounter).is_err());
    }

    #[test]
    fn test_paragraph_boundaries_preferred() {
        let text = "para one\n\npara two";
        let chunks = split_text(text, &SplitterConfig::with_size(12), &CharCounter).unwrap();
        assert_eq!(texts(&chunks), vec!["para one\n\n", "para two"]);
        assert_eq!(chunks[1].start_offset, 10);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_keep_separator_start() {
        let text = "para one\n\npara two";
        let config = SplitterConfig::with_size(12).with_keep_separator(KeepSeparator::Start);
        let chunks = split_text(text, &config, &CharCounter).unwrap();
        assert_eq!(texts(&chunks), vec!["para one", "\n\npara two"]);
        assert_eq!(chunks[1].start_offset, 8);
    }

    #[test]
    fn test_overlap_backfill() {
        let text = "one two three four five";
        let config = SplitterConfig::with_size(10)
            .with_overlap(4)
            .with_separators([" "]);
        let chunks = split_text(text, &config, &CharCounter).unwrap();

        assert_eq!(texts(&chunks), vec!["one two ", "two three ", "four five"]);
        let offsets: Vec<usize> = chunks.iter().map(|c| c.start_offset).collect();
        assert_eq!(offsets, vec![0, 4, 14]);
    }

    #[test]
    fn test_overlap_falls_back_to_graphemes() {
        let text = "one two three four five";
        let chunks = split_text(text, &words_config(10, 4), &CharCounter).unwrap();

        assert_eq!(
            texts(&chunks),
            vec!["one two ", "two three ", "ree four ", "our five"]
        );
        let offsets: Vec<usize> = chunks.iter().map(|c| c.start_offset).collect();
        assert_eq!(offsets, vec![0, 4, 10, 15]);
    }

    #[test]
    fn test_overlap_inside_paragraph_piece() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota\n\n\
            kappa lambda mu nu xi omicron pi rho sigma tau";
        let config = SplitterConfig::with_size(60).with_overlap(10);
        let chunks = split_text(text, &config, &CharCounter).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].start_offset, 46);
        assert!(chunks[1].text.starts_with("iota\n\nkappa"));
        let shared = chunks[1].overlap_with(&chunks[0]);
        assert!(shared > 0);
        assert!(chunks[0].text.ends_with(&chunks[1].text[..shared]));
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_overlap_inside_sentence_pieces() {
        let text = "First sentence is here. Second sentence is here. Third sentence is here.";
        let config = SplitterConfig::with_size(32).with_overlap(8);
        let chunks = split_text(text, &config, &CharCounter).unwrap();

        assert_eq!(
            texts(&chunks),
            vec![
                "First sentence is here. ",
                "here. Second sentence is here. ",
                "here. Third sentence is here.",
            ]
        );
        for pair in chunks.windows(2) {
            let shared = pair[1].overlap_with(&pair[0]);
            assert!(shared > 0, "no overlap before chunk {}", pair[1].index);
            assert!(CharCounter.measure(&pair[1].text[..shared]) <= 8);
        }
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_zero_overlap_has_no_backfill() {
        let text = "one two three four five";
        let chunks = split_text(text, &words_config(10, 0), &CharCounter).unwrap();
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].overlap_with(&pair[0]), 0);
        }
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_overlap_present_when_content_allows() {
        let text = "the cat sat on the mat and the dog ran off";
        let config = SplitterConfig::with_size(12).with_overlap(4);
        let chunks = split_text(text, &config, &CharCounter).unwrap();

        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let shared = pair[1].overlap_with(&pair[0]);
            assert!(shared > 0, "no overlap before chunk {}", pair[1].index);
            assert!(CharCounter.measure(&pair[1].text[..shared]) <= 4);
        }
    }

    #[test]
    fn test_round_trip_bound_and_overlap_properties() {
        for size in [5, 10, 17, 40, 120] {
            for overlap in [0, 1, 3, size / 2] {
                if overlap >= size {
                    continue;
                }
                let config = SplitterConfig::with_size(size).with_overlap(overlap);
                let chunks = split_text(SAMPLE, &config, &CharCounter).unwrap();

                assert_eq!(reconstruct(&chunks), SAMPLE, "size={size} overlap={overlap}");

                for (i, chunk) in chunks.iter().enumerate() {
                    assert_eq!(chunk.index, i);
                    assert_eq!(&SAMPLE[chunk.start_offset..chunk.end_offset()], chunk.text);
                    assert!(
                        chunk.length <= size || chunk.text.graphemes(true).count() == 1,
                        "chunk {i} too long: {:?}",
                        chunk.text
                    );
                }

                for pair in chunks.windows(2) {
                    let shared = pair[1].overlap_with(&pair[0]);
                    assert!(CharCounter.measure(&pair[1].text[..shared]) <= overlap);
                }
            }
        }
    }

    #[test]
    fn test_oversized_unit_emitted_whole() {
        let bytes = |s: &str| s.len();
        let config = SplitterConfig::with_size(1);
        let chunks = split_text("héllo", &config, &bytes).unwrap();

        assert_eq!(texts(&chunks), vec!["h", "é", "l", "l", "o"]);
        assert_eq!(chunks[1].length, 2);
        assert_eq!(chunks[2].start_offset, 3);
    }

    #[test]
    fn test_exhausted_hierarchy_keeps_fragment() {
        let config = SplitterConfig::with_size(4).with_separators([" "]);
        let chunks = split_text("ab abcdefgh cd", &config, &CharCounter).unwrap();
        assert_eq!(texts(&chunks), vec!["ab ", "abcdefgh ", "cd"]);
    }

    #[test]
    fn test_long_unbroken_text_does_not_recurse() {
        let text = "x".repeat(10_000);
        let chunks = split_text(&text, &SplitterConfig::with_size(100), &CharCounter).unwrap();

        assert_eq!(chunks.len(), 100);
        assert!(chunks.iter().all(|c| c.length == 100));
        assert_eq!(chunks[99].start_offset, 9_900);
    }

    #[test]
    fn test_token_sized_chunks() {
        let counter = TiktokenCounter::new().unwrap();
        let splitter =
            RecursiveTextSplitter::new(SplitterConfig::with_size(20).with_overlap(5), counter)
                .unwrap();

        let content = "This is a test sentence. ".repeat(30);
        let chunks = splitter.split_text(&content);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.length <= 20);
        }
        assert_eq!(reconstruct(&chunks), content);
    }

    #[test]
    fn test_split_documents_tags_chunks() {
        let splitter = RecursiveTextSplitter::new(words_config(10, 0), CharCounter).unwrap();
        let docs = vec![
            SourceDocument::new("a", "one two three")
                .with_metadata(serde_json::json!({"title": "A"})),
            SourceDocument::new("b", "four"),
        ];

        let chunks = splitter.split_documents(&docs);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].document_id, "a");
        assert_eq!(chunks[0].metadata["title"], "A");
        assert_eq!(chunks[1].chunk.index, 1);
        assert_eq!(chunks[2].document_id, "b");
        assert_eq!(chunks[2].chunk.index, 0);
        assert!(chunks[2].metadata.is_null());
    }
}
