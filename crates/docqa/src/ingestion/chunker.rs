//! Sentence-aggregating text chunker

use regex::Regex;
use std::sync::OnceLock;

use crate::config::{ChunkGranularity, ChunkingConfig};
use crate::types::Chunk;

/// One or more consecutive sentence terminators
fn sentence_end() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("Invalid regex"))
}

/// A line break, optional horizontal whitespace, and another line break
fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[ \t\r]*\n\s*").expect("Invalid regex"))
}

/// Collapse every whitespace run (newlines included) to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits extracted text into an ordered set of chunks.
///
/// In sentence mode, sentences are greedily packed into chunks of at most
/// `chunk_size` characters. A sentence is never split, so a single sentence
/// longer than `chunk_size` becomes a chunk of its own.
#[derive(Debug, Clone)]
pub struct TextChunker {
    granularity: ChunkGranularity,
    /// Target chunk size in characters
    chunk_size: usize,
    /// Shorter sentences are treated as noise
    min_sentence_len: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(&ChunkingConfig::default())
    }
}

impl TextChunker {
    /// Create a chunker from configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            granularity: config.granularity,
            chunk_size: config.chunk_size,
            min_sentence_len: config.min_sentence_len,
        }
    }

    /// Create a sentence chunker with the given target size
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }

    pub fn granularity(&self) -> ChunkGranularity {
        self.granularity
    }

    /// Chunk a document's text. Never fails; blank input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let contents = match self.granularity {
            ChunkGranularity::Sentence => self.aggregate_sentences(text),
            ChunkGranularity::Paragraph => self.split_paragraphs(text),
        };

        let chunks: Vec<Chunk> = contents
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chunk::new(index as u32, content))
            .collect();

        tracing::debug!(
            "Chunked {} chars into {} chunks ({:?})",
            text.len(),
            chunks.len(),
            self.granularity
        );

        chunks
    }

    /// Split normalized text into sentences, dropping noise fragments.
    ///
    /// Terminal punctuation stays attached to its sentence; trailing text
    /// without a terminator is kept as a final sentence.
    pub fn split_sentences<'a>(&self, normalized: &'a str) -> Vec<&'a str> {
        let mut candidates = Vec::new();
        let mut start = 0usize;

        for m in sentence_end().find_iter(normalized) {
            candidates.push(normalized[start..m.end()].trim());
            start = m.end();
        }
        if start < normalized.len() {
            candidates.push(normalized[start..].trim());
        }

        candidates
            .into_iter()
            .filter(|s| s.chars().count() >= self.min_sentence_len)
            .collect()
    }

    fn aggregate_sentences(&self, text: &str) -> Vec<String> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut contents = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for sentence in self.split_sentences(&normalized) {
            let sentence_len = sentence.chars().count();

            if current.is_empty() {
                current.push_str(sentence);
                current_len = sentence_len;
                continue;
            }

            // +1 for the joining space
            if current_len + 1 + sentence_len > self.chunk_size {
                contents.push(std::mem::take(&mut current));
                current.push_str(sentence);
                current_len = sentence_len;
            } else {
                current.push(' ');
                current.push_str(sentence);
                current_len += 1 + sentence_len;
            }
        }

        if !current.is_empty() {
            contents.push(current);
        }

        contents
    }

    fn split_paragraphs(&self, text: &str) -> Vec<String> {
        paragraph_break()
            .split(text)
            .map(normalize_whitespace)
            .filter(|p| !p.is_empty() && p.chars().count() >= self.min_sentence_len)
            .collect()
    }
}
