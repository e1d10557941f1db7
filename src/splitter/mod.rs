//! Text splitting for indexing.

mod base;
mod recursive;
pub mod separators;

pub use base::{CharCounter, GraphemeCounter, LengthMeasurer, TextSplitter, TiktokenCounter};
pub use recursive::{split_text, RecursiveTextSplitter};
