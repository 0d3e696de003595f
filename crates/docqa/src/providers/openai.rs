//! OpenAI-compatible chat completion provider with retry logic

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AnswerConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::answer::{AnswerProvider, AnswerRequest};

/// Chat completion client with automatic retry
pub struct OpenAiAnswerer {
    client: Client,
    config: AnswerConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl CompletionResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::llm("Completion response contained no answer"))
    }
}

/// 1s, 2s, 4s, ... doubling per attempt
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

impl OpenAiAnswerer {
    /// Create a client; the API key is read from `config.api_key_env`
    pub fn new(config: &AnswerConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Error::Config(format!("API key variable {} is not set", config.api_key_env))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
    }

    fn completion_request(&self, request: &AnswerRequest<'_>) -> CompletionRequest {
        let context = PromptBuilder::build_context(request.ranked, self.config.context_chunks);

        CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: PromptBuilder::system_prompt().to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: PromptBuilder::user_prompt(request.query, &context),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl AnswerProvider for OpenAiAnswerer {
    async fn answer(&self, request: &AnswerRequest<'_>) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = self.completion_request(request);
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        tracing::info!("Generating answer with model: {}", body.model);

        self.retry_request(|| {
            let url = url.clone();
            let client = client.clone();
            let api_key = api_key.clone();
            let body = &body;

            async move {
                let response = client
                    .post(&url)
                    .bearer_auth(api_key)
                    .json(body)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("Completion request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(Error::llm(format!(
                        "Completion failed: HTTP {} - {}",
                        status, text
                    )));
                }

                let completion: CompletionResponse = response.json().await.map_err(|e| {
                    Error::llm(format!("Failed to parse completion response: {}", e))
                })?;

                completion.into_text()
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));

        match self.client.get(&url).bearer_auth(&self.api_key).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
