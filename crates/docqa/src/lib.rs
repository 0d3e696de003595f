//! docqa: question answering over a single uploaded document
//!
//! An uploaded PDF, Word or text file is extracted and split into
//! sentence-aggregated chunks. Each question is answered by ranking the chunks
//! with a lexical relevance score and synthesizing a response from the best
//! matches, optionally handing the ranked context to a hosted chat model.
//!
//! ```
//! use docqa::QaPipeline;
//!
//! let pipeline = QaPipeline::default();
//! let chunks = pipeline.chunk("Paris is the capital of France. It has the Eiffel Tower.");
//! let answer = pipeline.answer("capital of France", &chunks, None);
//! assert_eq!(answer.chunks.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::DocQaConfig;
pub use error::{Error, Result};
pub use pipeline::{Answer, QaPipeline};
pub use session::DocumentSession;
pub use types::{
    document::{Chunk, Document, FileType},
    query::ChatRequest,
    response::{ChatResponse, ScoredChunk},
};
