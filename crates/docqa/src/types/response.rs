//! Response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::{Document, FileType};

/// A chunk ranked against one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Chunk text
    pub content: String,
    /// Relevance score (0.0-1.0)
    pub score: f32,
    /// Human-readable label, e.g. "Chunk 2 (41 words)"
    pub source: String,
    /// Position of the chunk in the document
    pub chunk_index: u32,
}

/// Answer plus the ranking it was built from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Answer text
    pub response: String,
    /// Ranked chunks (top-N)
    pub chunks: Vec<ScoredChunk>,
    /// Provider that wrote the answer ("local" or the remote model)
    pub answered_by: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Author of a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Ranking shown alongside an assistant message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chunks: Vec<ScoredChunk>,
}

impl ChatMessage {
    /// A question from the user
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: chrono::Utc::now(),
            chunks: Vec::new(),
        }
    }

    /// An answer with its supporting chunks
    pub fn assistant(content: impl Into<String>, chunks: Vec<ScoredChunk>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: chrono::Utc::now(),
            chunks,
        }
    }
}

/// Summary of the active document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub filename: String,
    pub file_type: FileType,
    pub file_size: u64,
    pub text_length: usize,
    pub total_chunks: u32,
    pub total_pages: Option<u32>,
    pub extraction_failed: bool,
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            file_type: doc.file_type,
            file_size: doc.file_size,
            text_length: doc.text_length,
            total_chunks: doc.total_chunks,
            total_pages: doc.total_pages,
            extraction_failed: doc.extraction_failed,
            ingested_at: doc.ingested_at,
        }
    }
}

/// Response from a document upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// False when the placeholder text was chunked instead of the document
    pub success: bool,
    pub document: DocumentSummary,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Extraction error shown to the user, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Conversation history of the active document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub document: Option<DocumentSummary>,
    pub messages: Vec<ChatMessage>,
}

/// Last ranking computed for the active document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunksResponse {
    pub query: Option<String>,
    pub chunks: Vec<ScoredChunk>,
    pub total_chunks: usize,
}
