//! Core types shared by the splitter and the citation pipeline.

mod chunk;
mod citation;
mod config;
mod source;

pub use chunk::{Chunk, DocumentChunk, SourceDocument};
pub use citation::{CitationSpan, MappedCitation, NormalizedCitation, NormalizedText};
pub use config::{KeepSeparator, LengthFunction, ServiceConfig, SplitterConfig};
pub use source::{RetrievedSource, SourceMap, SourceMetadata};
