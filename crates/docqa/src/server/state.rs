//! Application state for the document QA server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::{AnswerBackend, DocQaConfig};
use crate::error::Result;
use crate::ingestion::{Extractor, FileExtractor};
use crate::pipeline::QaPipeline;
use crate::providers::{AnswerProvider, LocalAnswerer, OpenAiAnswerer};
use crate::session::DocumentSession;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocQaConfig,
    /// Chunker, scorer and synthesizer
    pipeline: QaPipeline,
    /// Text extraction for uploads
    extractor: Arc<dyn Extractor>,
    /// Answer provider (local synthesizer or remote model)
    answer_provider: Arc<dyn AnswerProvider>,
    /// The active document, its conversation and last ranking
    session: RwLock<DocumentSession>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: DocQaConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!(
            "Initializing document QA state (answers: {:?})...",
            config.answer.backend
        );

        let answer_provider: Arc<dyn AnswerProvider> = match config.answer.backend {
            AnswerBackend::Local => {
                tracing::info!("Using local answer synthesis");
                Arc::new(LocalAnswerer::new(&config.synthesis))
            }
            AnswerBackend::OpenAi => match OpenAiAnswerer::new(&config.answer) {
                Ok(answerer) => {
                    tracing::info!(
                        "Using remote answers ({} at {})",
                        config.answer.model,
                        config.answer.base_url
                    );
                    Arc::new(answerer)
                }
                Err(e) => {
                    tracing::warn!("Remote answers unavailable, using local synthesis: {}", e);
                    Arc::new(LocalAnswerer::new(&config.synthesis))
                }
            },
        };

        let extractor = Arc::new(FileExtractor::new(config.server.max_upload_size));

        Ok(Self::with_parts(config, extractor, answer_provider))
    }

    /// Create state from explicit components
    pub fn with_parts(
        config: DocQaConfig,
        extractor: Arc<dyn Extractor>,
        answer_provider: Arc<dyn AnswerProvider>,
    ) -> Self {
        let pipeline = QaPipeline::new(&config);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                extractor,
                answer_provider,
                session: RwLock::new(DocumentSession::new()),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &DocQaConfig {
        &self.inner.config
    }

    /// Get the QA pipeline
    pub fn pipeline(&self) -> &QaPipeline {
        &self.inner.pipeline
    }

    /// Get the extractor
    pub fn extractor(&self) -> &Arc<dyn Extractor> {
        &self.inner.extractor
    }

    /// Get the answer provider
    pub fn answer_provider(&self) -> &Arc<dyn AnswerProvider> {
        &self.inner.answer_provider
    }

    /// Get the document session
    pub fn session(&self) -> &RwLock<DocumentSession> {
        &self.inner.session
    }
}
