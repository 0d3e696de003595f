//! Document ingestion: text extraction and chunking

mod chunker;
mod parser;

pub use chunker::{normalize_whitespace, TextChunker};
pub use parser::{extraction_placeholder, hash_content, ExtractedText, Extractor, FileExtractor};
