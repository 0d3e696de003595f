//! HTTP server for the document QA service

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::DocQaConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Document QA HTTP server
pub struct DocQaServer {
    config: DocQaConfig,
    state: AppState,
}

impl DocQaServer {
    /// Create a new server
    pub fn new(config: DocQaConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create from existing state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting document QA server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Router for the given state
pub fn build_router(state: AppState) -> Router {
    let enable_cors = state.config().server.enable_cors;
    let max_upload_size = state.config().server.max_upload_size;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes(max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint: ready while the answer provider is healthy
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    let provider = state.answer_provider();
    match provider.health_check().await {
        Ok(true) => axum::http::StatusCode::OK,
        Ok(false) => {
            tracing::warn!("Answer provider {} reports unhealthy", provider.name());
            axum::http::StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            tracing::warn!("Answer provider {} health check failed: {}", provider.name(), e);
            axum::http::StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
