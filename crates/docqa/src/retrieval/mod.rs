//! Lexical retrieval over the active document's chunks

pub mod scorer;

pub use scorer::{tokenize_query, RelevanceScorer, ScoreBreakdown};
