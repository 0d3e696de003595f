//! Answer provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, ScoredChunk};

/// Everything a provider may use to answer one query
#[derive(Debug, Clone, Copy)]
pub struct AnswerRequest<'a> {
    pub query: &'a str,
    /// Local ranking, best first
    pub ranked: &'a [ScoredChunk],
    /// All chunks of the document
    pub chunks: &'a [Chunk],
    pub filename: Option<&'a str>,
}

/// Trait for answer generation
///
/// Implementations:
/// - `LocalAnswerer`: lexical synthesis, no network
/// - `OpenAiAnswerer`: OpenAI-compatible chat completions
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Produce the response text for a ranked query
    async fn answer(&self, request: &AnswerRequest<'_>) -> Result<String>;

    /// Check if the provider is available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging and responses
    fn name(&self) -> &str;
}
