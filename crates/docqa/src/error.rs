//! Error types for the document QA service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docqa operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
///
/// The chunk/score/synthesize core never produces these; they only occur at
/// the edges (extraction, configuration, transport, remote answering).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text extraction failed for a document
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Declared MIME type has no extractor
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Upload exceeds the configured size limit
    #[error("File too large: {size} bytes (maximum {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    /// A query arrived before any document was uploaded
    #[error("No document has been uploaded yet")]
    NoDocument,

    /// The document was replaced while a query was running against it
    #[error("Document was replaced while the query was running")]
    DocumentReplaced,

    /// Malformed request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Remote answer provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config parse error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the error came from reading the document itself
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, Self::Extraction { .. } | Self::UnsupportedFileType(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Extraction { .. } => (StatusCode::BAD_REQUEST, "extraction_error", self.to_string()),
            Error::UnsupportedFileType(kind) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {}. Supported: PDF, DOC, DOCX, TXT", kind),
            ),
            Error::FileTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "file_too_large", self.to_string())
            }
            Error::NoDocument => (
                StatusCode::CONFLICT,
                "no_document",
                "Upload a document before asking questions".to_string(),
            ),
            Error::DocumentReplaced => (StatusCode::CONFLICT, "document_replaced", self.to_string()),
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Toml(err) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
