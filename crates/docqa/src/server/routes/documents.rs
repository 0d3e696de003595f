//! Document upload and management endpoints

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::Engine;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{DocumentSummary, ExtractRequest, UploadResponse};

/// POST /api/documents - Upload a file and make it the active document
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "document".to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_request(format!("Failed to read file: {}", e)))?;

        return activate_upload(state, filename, data.to_vec(), content_type)
            .await
            .map(Json);
    }

    Err(Error::invalid_request("Missing multipart field 'file'"))
}

/// POST /api/documents/extract - Upload a base64-encoded file
pub async fn extract_document(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<UploadResponse>> {
    if request.file_data.is_empty() || request.file_name.is_empty() {
        return Err(Error::invalid_request("File data and name are required"));
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(request.file_data.as_bytes())
        .map_err(|_| Error::invalid_request("Invalid base64 file data"))?;

    activate_upload(state, request.file_name, data, request.file_type)
        .await
        .map(Json)
}

/// Extract, chunk and swap in a new document
async fn activate_upload(
    state: AppState,
    filename: String,
    data: Vec<u8>,
    content_type: Option<String>,
) -> Result<UploadResponse> {
    let start = Instant::now();
    tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

    // Extraction is CPU-bound
    let worker_state = state.clone();
    let ingested = tokio::task::spawn_blocking(move || {
        worker_state.pipeline().ingest(
            worker_state.extractor().as_ref(),
            &filename,
            &data,
            content_type.as_deref(),
        )
    })
    .await
    .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

    let summary = DocumentSummary::from(&ingested.document);
    let success = !ingested.document.extraction_failed;

    state
        .session()
        .write()
        .replace_document(ingested.document, ingested.chunks);

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Ingested {} in {}ms: {} chunks, {} chars",
        summary.filename,
        processing_time_ms,
        summary.total_chunks,
        summary.text_length
    );

    Ok(UploadResponse {
        success,
        document: summary,
        processing_time_ms,
        warning: ingested.warning,
    })
}

/// GET /api/document - Active document summary
pub async fn get_document(State(state): State<AppState>) -> Result<Json<DocumentSummary>> {
    let session = state.session().read();
    session
        .document()
        .map(|doc| Json(DocumentSummary::from(doc)))
        .ok_or(Error::NoDocument)
}

/// DELETE /api/document - Clear the active document and its conversation
pub async fn clear_document(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut session = state.session().write();
    let had_document = session.document().is_some();
    session.clear();

    Json(serde_json::json!({
        "success": true,
        "cleared": had_document,
    }))
}
