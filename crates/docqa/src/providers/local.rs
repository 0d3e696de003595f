//! In-process answer provider

use async_trait::async_trait;

use crate::config::SynthesisConfig;
use crate::error::Result;
use crate::generation::AnswerSynthesizer;

use super::answer::{AnswerProvider, AnswerRequest};

/// Answers with the lexical synthesizer
#[derive(Debug, Clone, Default)]
pub struct LocalAnswerer {
    synthesizer: AnswerSynthesizer,
}

impl LocalAnswerer {
    pub fn new(config: &SynthesisConfig) -> Self {
        Self {
            synthesizer: AnswerSynthesizer::new(config),
        }
    }
}

#[async_trait]
impl AnswerProvider for LocalAnswerer {
    async fn answer(&self, request: &AnswerRequest<'_>) -> Result<String> {
        Ok(self.synthesizer.synthesize(
            request.query,
            request.ranked,
            request.chunks,
            request.filename,
        ))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_answer_without_ranking() {
        let answerer = LocalAnswerer::default();
        let request = AnswerRequest {
            query: "anything",
            ranked: &[],
            chunks: &[],
            filename: Some("notes.txt"),
        };

        let response = answerer.answer(&request).await.unwrap();
        assert!(response.contains("notes.txt"));
        assert!(answerer.health_check().await.unwrap());
        assert_eq!(answerer.name(), "local");
    }
}
