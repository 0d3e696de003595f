//! Core types for the document QA service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, FileType};
pub use query::{ChatRequest, ExtractRequest};
pub use response::{
    ChatMessage, ChatResponse, ChunksResponse, DocumentSummary, HistoryResponse, Role,
    ScoredChunk, UploadResponse,
};
