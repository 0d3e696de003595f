//! Answer provider abstractions
//!
//! The ranking is always computed locally; a provider only turns the ranked
//! chunks into response text. `LocalAnswerer` synthesizes it in-process,
//! `OpenAiAnswerer` delegates to a hosted chat completion API.

pub mod answer;
pub mod local;
pub mod openai;

pub use answer::{AnswerProvider, AnswerRequest};
pub use local::LocalAnswerer;
pub use openai::OpenAiAnswerer;
