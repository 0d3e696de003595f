//! Chunk, rank and answer
//!
//! `QaPipeline` bundles the three stages. Every stage is a pure function of
//! its inputs; the only I/O is an optional remote answer provider.

use crate::config::DocQaConfig;
use crate::error::Result;
use crate::generation::AnswerSynthesizer;
use crate::ingestion::{
    extraction_placeholder, hash_content, Extractor, FileExtractor, TextChunker,
};
use crate::providers::{AnswerProvider, AnswerRequest};
use crate::retrieval::RelevanceScorer;
use crate::types::{Chunk, Document, ScoredChunk};

/// Response text plus the ranking it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub response: String,
    pub chunks: Vec<ScoredChunk>,
    /// "local" or the remote model name
    pub answered_by: String,
}

/// A document ready to become the active one
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub document: Document,
    pub chunks: Vec<Chunk>,
    /// Extraction error shown to the user when placeholder text was chunked
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QaPipeline {
    chunker: TextChunker,
    scorer: RelevanceScorer,
    synthesizer: AnswerSynthesizer,
}

impl QaPipeline {
    pub fn new(config: &DocQaConfig) -> Self {
        Self {
            chunker: TextChunker::new(&config.chunking),
            scorer: RelevanceScorer::new(&config.scoring, config.chunking.granularity),
            synthesizer: AnswerSynthesizer::new(&config.synthesis),
        }
    }

    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    /// Split document text into chunks
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        self.chunker.chunk(text)
    }

    /// Top chunks for a query
    pub fn rank(&self, query: &str, chunks: &[Chunk]) -> Vec<ScoredChunk> {
        self.scorer.rank(query, chunks)
    }

    /// Rank and synthesize locally
    pub fn answer(&self, query: &str, chunks: &[Chunk], filename: Option<&str>) -> Answer {
        let ranked = self.rank(query, chunks);
        let response = self.synthesizer.synthesize(query, &ranked, chunks, filename);
        Answer {
            response,
            chunks: ranked,
            answered_by: "local".to_string(),
        }
    }

    /// Rank locally and let `provider` write the response.
    ///
    /// Falls back to local synthesis when nothing ranked or the provider fails.
    pub async fn answer_with(
        &self,
        provider: &dyn AnswerProvider,
        query: &str,
        chunks: &[Chunk],
        filename: Option<&str>,
    ) -> Answer {
        let ranked = self.rank(query, chunks);

        if !ranked.is_empty() {
            let request = AnswerRequest {
                query,
                ranked: &ranked,
                chunks,
                filename,
            };
            match provider.answer(&request).await {
                Ok(response) => {
                    return Answer {
                        response,
                        chunks: ranked,
                        answered_by: provider.name().to_string(),
                    }
                }
                Err(e) => {
                    tracing::warn!("{} failed, answering locally: {}", provider.name(), e);
                }
            }
        }

        let response = self.synthesizer.synthesize(query, &ranked, chunks, filename);
        Answer {
            response,
            chunks: ranked,
            answered_by: "local".to_string(),
        }
    }

    /// Extract and chunk an uploaded file.
    ///
    /// Extraction failures do not abort the upload: a placeholder describing
    /// the failure is chunked instead and the document is flagged. Only
    /// oversized files are rejected.
    pub fn ingest(
        &self,
        extractor: &dyn Extractor,
        filename: &str,
        data: &[u8],
        mime_type: Option<&str>,
    ) -> Result<IngestedDocument> {
        let (file_type, resolved_mime) = FileExtractor::resolve_type(filename, mime_type);
        let mut document =
            Document::new(filename.to_string(), file_type, resolved_mime, data.len() as u64);

        let (text, warning) = match extractor.extract(filename, data, mime_type) {
            Ok(extracted) => {
                document.file_type = extracted.file_type;
                document.mime_type = extracted.mime_type;
                document.total_pages = extracted.total_pages;
                (extracted.text, None)
            }
            Err(e) if e.is_extraction_failure() => {
                tracing::warn!("Extraction failed for {}: {}", filename, e);
                document.extraction_failed = true;
                (extraction_placeholder(filename, &e), Some(e.to_string()))
            }
            Err(e) => return Err(e),
        };

        let chunks = self.chunk(&text);
        document.content_hash = hash_content(&text);
        document.text_length = text.chars().count();
        document.total_chunks = chunks.len() as u32;

        Ok(IngestedDocument {
            document,
            chunks,
            warning,
        })
    }
}
