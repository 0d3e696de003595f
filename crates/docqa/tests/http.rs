//! HTTP API tests against the in-process router

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::Engine;
use serde_json::{json, Value};
use tower::ServiceExt;

use async_trait::async_trait;
use docqa::config::DocQaConfig;
use docqa::ingestion::FileExtractor;
use docqa::providers::{AnswerProvider, AnswerRequest, LocalAnswerer};
use docqa::server::{build_router, state::AppState};
use docqa::{Error, Result};

const PARIS: &str =
    "Paris is the capital of France. It has the Eiffel Tower. The Louvre is a famous museum.";
const BOUNDARY: &str = "docqa-test-boundary";

/// Remote backend that cannot be reached
struct UnreachableProvider;

#[async_trait]
impl AnswerProvider for UnreachableProvider {
    async fn answer(&self, _request: &AnswerRequest<'_>) -> Result<String> {
        Err(Error::llm("connection refused"))
    }

    async fn health_check(&self) -> Result<bool> {
        Err(Error::llm("connection refused"))
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}

fn app_with(answerer: Arc<dyn AnswerProvider>) -> Router {
    let config = DocQaConfig::default();
    let extractor = Arc::new(FileExtractor::new(config.server.max_upload_size));
    build_router(AppState::with_parts(config, extractor, answerer))
}

fn app() -> Router {
    app_with(Arc::new(LocalAnswerer::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn upload(filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_and_ready() {
    let app = app();
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, info) = send(&app, get("/api/info")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["name"], "docqa");
}

#[tokio::test]
async fn ready_follows_answer_provider_health() {
    let app = app_with(Arc::new(UnreachableProvider));

    let response = app.clone().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Answers still come from the local synthesizer
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/chat",
            json!({"query": "capital of France", "document": PARIS}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answered_by"], "local");
}

#[tokio::test]
async fn chat_requires_a_document() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/chat", json!({"query": "capital of France"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "no_document");

    let (status, _) = send(&app, get("/api/document")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/chat", json!({"query": "   ", "document": PARIS})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn upload_then_ask() {
    let app = app();

    let (status, body) = send(&app, upload("paris.txt", "text/plain", PARIS.as_bytes())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["document"]["filename"], "paris.txt");
    assert_eq!(body["document"]["total_chunks"], 1);
    assert_eq!(body["document"]["file_type"], "txt");

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/chat", json!({"message": "capital of France"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answered_by"], "local");
    assert_eq!(body["chunks"].as_array().unwrap().len(), 1);
    assert!(body["chunks"][0]["score"].as_f64().unwrap() > 0.5);
    assert!(body["response"].as_str().unwrap().contains("Eiffel Tower"));

    let (_, chunks) = send(&app, get("/api/chunks")).await;
    assert_eq!(chunks["query"], "capital of France");
    assert_eq!(chunks["total_chunks"], 1);

    let (_, history) = send(&app, get("/api/history")).await;
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "assistant");
}

#[tokio::test]
async fn new_upload_replaces_document_and_history() {
    let app = app();
    send(&app, upload("paris.txt", "text/plain", PARIS.as_bytes())).await;
    send(
        &app,
        json_request(Method::POST, "/api/chat", json!({"query": "Louvre museum"})),
    )
    .await;

    let text = "Berlin is the capital of Germany. It has the Brandenburg Gate.";
    let (status, _) = send(&app, upload("berlin.txt", "text/plain", text.as_bytes())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, history) = send(&app, get("/api/history")).await;
    assert_eq!(history["document"]["filename"], "berlin.txt");
    assert!(history["messages"].as_array().unwrap().is_empty());

    let (_, body) = send(
        &app,
        json_request(Method::POST, "/api/chat", json!({"query": "Louvre museum"})),
    )
    .await;
    let chunks = body["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0]["content"].as_str().unwrap().starts_with("Berlin"));
    assert!(!body["response"].as_str().unwrap().contains("Louvre"));
}

#[tokio::test]
async fn failed_extraction_still_activates_placeholder() {
    let app = app();
    let (status, body) = send(&app, upload("scan.pdf", "application/pdf", b"not a pdf")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["document"]["extraction_failed"], true);
    assert!(body["warning"].is_string());
    assert!(body["document"]["total_chunks"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn base64_upload() {
    let app = app();
    let encoded = base64::engine::general_purpose::STANDARD.encode(PARIS);

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/documents/extract",
            json!({"file_data": encoded, "file_name": "paris.txt"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document"]["text_length"], PARIS.len());

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/documents/extract",
            json!({"file_data": "%%%not base64%%%", "file_name": "paris.txt"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid base64 file data");
}

#[tokio::test]
async fn inline_document_leaves_session_untouched() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/chat",
            json!({"query": "capital of France", "document": PARIS}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chunks"].as_array().unwrap().len(), 1);

    let (_, history) = send(&app, get("/api/history")).await;
    assert!(history["document"].is_null());
    assert!(history["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn clear_document() {
    let app = app();
    send(&app, upload("paris.txt", "text/plain", PARIS.as_bytes())).await;

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/document")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cleared"], true);

    let (status, _) = send(&app, get("/api/document")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}
