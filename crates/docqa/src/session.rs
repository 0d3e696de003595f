//! The active document and everything derived from it
//!
//! A session owns at most one document. Replacing it swaps the chunk set in
//! one step and clears the conversation and the last ranking. Each
//! replacement bumps a generation counter; results computed against an older
//! generation are discarded when they come back.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::pipeline::Answer;
use crate::types::{ChatMessage, Chunk, Document, ScoredChunk};

/// Immutable view of the active document, safe to use without holding a lock
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub generation: u64,
    pub document: Document,
    pub chunks: Arc<[Chunk]>,
}

#[derive(Debug, Clone)]
struct ActiveDocument {
    document: Document,
    chunks: Arc<[Chunk]>,
}

#[derive(Debug, Default)]
pub struct DocumentSession {
    generation: u64,
    active: Option<ActiveDocument>,
    history: Vec<ChatMessage>,
    last_query: Option<String>,
    last_ranking: Vec<ScoredChunk>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented on every replacement or clear
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> Option<&Document> {
        self.active.as_ref().map(|a| &a.document)
    }

    /// Chunks of the active document, empty when there is none
    pub fn chunks(&self) -> &[Chunk] {
        self.active.as_ref().map(|a| &a.chunks[..]).unwrap_or(&[])
    }

    /// Snapshot for running a query outside the lock
    pub fn snapshot(&self) -> Result<DocumentSnapshot> {
        let active = self.active.as_ref().ok_or(Error::NoDocument)?;
        Ok(DocumentSnapshot {
            generation: self.generation,
            document: active.document.clone(),
            chunks: Arc::clone(&active.chunks),
        })
    }

    /// Make `document` the active one; returns the new generation
    pub fn replace_document(&mut self, document: Document, chunks: Vec<Chunk>) -> u64 {
        tracing::info!(
            "Active document is now {} ({} chunks)",
            document.filename,
            chunks.len()
        );
        self.active = Some(ActiveDocument {
            document,
            chunks: chunks.into(),
        });
        self.reset()
    }

    /// Drop the active document; returns the new generation
    pub fn clear(&mut self) -> u64 {
        self.active = None;
        self.reset()
    }

    fn reset(&mut self) -> u64 {
        self.history.clear();
        self.last_query = None;
        self.last_ranking.clear();
        self.generation += 1;
        self.generation
    }

    /// Store a finished exchange.
    ///
    /// Fails with `DocumentReplaced` when the answer was computed against an
    /// older generation; nothing is recorded in that case.
    pub fn record_exchange(&mut self, generation: u64, query: &str, answer: &Answer) -> Result<()> {
        if generation != self.generation {
            tracing::debug!(
                "Discarding answer for generation {} (current {})",
                generation,
                self.generation
            );
            return Err(Error::DocumentReplaced);
        }

        self.history.push(ChatMessage::user(query));
        self.history
            .push(ChatMessage::assistant(answer.response.clone(), answer.chunks.clone()));
        self.last_query = Some(query.to_string());
        self.last_ranking = answer.chunks.clone();
        Ok(())
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Query and ranking of the most recent exchange
    pub fn last_ranking(&self) -> (Option<&str>, &[ScoredChunk]) {
        (self.last_query.as_deref(), &self.last_ranking)
    }
}
