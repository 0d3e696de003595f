//! API routes for the document QA server

pub mod chat;
pub mod documents;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use crate::server::state::AppState;

/// Room for multipart framing and JSON fields around the file bytes
const REQUEST_OVERHEAD: usize = 64 * 1024;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    // base64 inflates the payload by a third
    let base64_limit = max_upload_size / 3 * 4 + REQUEST_OVERHEAD;

    Router::new()
        // Document upload - with larger body limit for files
        .route(
            "/documents",
            post(documents::upload_document)
                .layer(DefaultBodyLimit::max(max_upload_size + REQUEST_OVERHEAD)),
        )
        .route(
            "/documents/extract",
            post(documents::extract_document).layer(DefaultBodyLimit::max(base64_limit)),
        )
        // Active document
        .route(
            "/document",
            get(documents::get_document).delete(documents::clear_document),
        )
        // Questions
        .route(
            "/chat",
            post(chat::chat).layer(DefaultBodyLimit::max(max_upload_size + REQUEST_OVERHEAD)),
        )
        .route("/chunks", get(chat::get_chunks))
        .route("/history", get(chat::get_history))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "docqa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Single-document question answering with lexical retrieval",
        "endpoints": {
            "POST /api/documents": "Upload a document (multipart field 'file')",
            "POST /api/documents/extract": "Upload a base64-encoded document",
            "GET /api/document": "Active document summary",
            "DELETE /api/document": "Clear the active document",
            "POST /api/chat": "Ask a question",
            "GET /api/chunks": "Ranking of the last question",
            "GET /api/history": "Conversation history"
        },
        "supported_types": ["PDF", "DOC", "DOCX", "TXT"]
    }))
}
