//! Question answering endpoints

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    ChatRequest, ChatResponse, ChunksResponse, DocumentSummary, HistoryResponse,
};

/// POST /api/chat - Answer a question about the active (or inline) document
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();

    let query = request.query.trim();
    if query.is_empty() {
        return Err(Error::invalid_request("Query is required"));
    }

    tracing::info!("Query: \"{}\"", query);

    let provider = state.answer_provider().as_ref();

    let answer = match request.document.as_deref() {
        // Inline text is chunked for this request only
        Some(text) => {
            let chunks = state.pipeline().chunk(text);
            state
                .pipeline()
                .answer_with(provider, query, &chunks, None)
                .await
        }
        None => {
            let snapshot = state.session().read().snapshot()?;
            let answer = state
                .pipeline()
                .answer_with(
                    provider,
                    query,
                    &snapshot.chunks,
                    Some(snapshot.document.filename.as_str()),
                )
                .await;

            state
                .session()
                .write()
                .record_exchange(snapshot.generation, query, &answer)?;
            answer
        }
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Query completed in {}ms, {} chunks ranked",
        processing_time_ms,
        answer.chunks.len()
    );

    Ok(Json(ChatResponse {
        response: answer.response,
        chunks: answer.chunks,
        answered_by: answer.answered_by,
        processing_time_ms,
    }))
}

/// GET /api/chunks - Ranking of the last question
pub async fn get_chunks(State(state): State<AppState>) -> Json<ChunksResponse> {
    let session = state.session().read();
    let (query, chunks) = session.last_ranking();

    Json(ChunksResponse {
        query: query.map(str::to_string),
        chunks: chunks.to_vec(),
        total_chunks: session.chunks().len(),
    })
}

/// GET /api/history - Conversation for the active document
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session().read();

    Json(HistoryResponse {
        document: session.document().map(DocumentSummary::from),
        messages: session.history().to_vec(),
    })
}
