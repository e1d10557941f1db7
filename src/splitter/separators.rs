//! Separator hierarchies.
//!
//! Each list runs from most to least preferred and ends with the empty
//! separator, which splits between grapheme clusters.

/// Separators for prose.
///
/// 1. Paragraphs
/// 2. Lines
/// 3. Sentence endings (. ! ?)
/// 4. Semicolons and commas
/// 5. Words
/// 6. Graphemes (last resort)
pub fn default_separators() -> Vec<String> {
    ["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " ", ""]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Separators for markdown.
///
/// Heading and rule separators start with the newline they follow, so
/// this hierarchy reads best with [`KeepSeparator::Start`].
///
/// [`KeepSeparator::Start`]: crate::types::KeepSeparator::Start
pub fn markdown_separators() -> Vec<String> {
    [
        "\n# ", "\n## ", "\n### ", "\n#### ", "\n##### ", "\n###### ", // Headings
        "\n```", // Code fences
        "\n---", "\n***", // Horizontal rules
        "\n\n", "\n", ". ", " ", "",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
