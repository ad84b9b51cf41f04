//! Integration tests for the OpenAI batch client
//!
//! A local axum server stands in for the remote batch API.

use axum::{
    body::Bytes,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use torx_domain::traits::BatchService;
use torx_domain::{BatchId, BatchStatus, FileId};
use torx_llm::{LlmError, OpenAiBatchClient};

const API_KEY: &str = "test-key";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", API_KEY))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"message": "Incorrect API key provided"}})),
    )
        .into_response()
}

async fn upload(headers: HeaderMap, body: Bytes) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"purpose\"") || !text.contains("batch") {
        return (StatusCode::BAD_REQUEST, "missing purpose").into_response();
    }
    if !text.contains("ข้อมูลเอกสาร") {
        return (StatusCode::BAD_REQUEST, "missing file content").into_response();
    }
    Json(json!({"id": "file-in", "object": "file", "purpose": "batch"})).into_response()
}

async fn create(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if body["endpoint"] != "/v1/chat/completions" || body["completion_window"] != "24h" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad batch request"})))
            .into_response();
    }
    Json(json!({
        "id": "batch_123",
        "object": "batch",
        "input_file_id": body["input_file_id"],
        "status": "validating"
    }))
    .into_response()
}

async fn retrieve(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match id.as_str() {
        "batch_123" => Json(json!({
            "id": "batch_123",
            "status": "completed",
            "output_file_id": "file-out",
            "error_file_id": null,
            "request_counts": {"total": 2, "completed": 2, "failed": 0}
        }))
        .into_response(),
        "batch_busy" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"message": "slow down"}})),
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"message": "No batch found"}})),
        )
            .into_response(),
    }
}

async fn content(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == "file-out" {
        "{\"custom_id\":\"a.pdf\"}\n{\"custom_id\":\"b.pdf\"}\n".into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn spawn_fake_api() -> String {
    let app = Router::new()
        .route("/v1/files", post(upload))
        .route("/v1/batches", post(create))
        .route("/v1/batches/:id", get(retrieve))
        .route("/v1/files/:id/content", get(content));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/v1", addr)
}

fn client(base_url: &str, key: &str) -> OpenAiBatchClient {
    OpenAiBatchClient::with_base_url(base_url, key, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_upload_and_create_batch() {
    let base = spawn_fake_api().await;
    let client = client(&base, API_KEY);

    let job_file = "{\"custom_id\":\"a.pdf\",\"body\":\"ข้อมูลเอกสาร\"}\n";
    let file_id = client
        .upload_job_file("batch_input.jsonl", job_file.as_bytes().to_vec())
        .await
        .unwrap();
    assert_eq!(file_id, FileId::new("file-in"));

    let job = client.create_batch(&file_id).await.unwrap();
    assert_eq!(job.id, BatchId::new("batch_123"));
    assert_eq!(job.status, BatchStatus::Validating);
}

#[tokio::test]
async fn test_retrieve_completed_batch_and_download() {
    let base = spawn_fake_api().await;
    let client = client(&base, API_KEY);

    let job = client.retrieve_batch(&BatchId::new("batch_123")).await.unwrap();
    assert_eq!(job.status, BatchStatus::Completed);
    assert_eq!(job.request_counts.unwrap().completed, 2);

    let output = job.output_file_id.expect("completed job has output");
    let text = client.file_content(&output).await.unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[tokio::test]
async fn test_error_statuses_are_mapped() {
    let base = spawn_fake_api().await;

    let bad_key = client(&base, "wrong");
    let result = bad_key.retrieve_batch(&BatchId::new("batch_123")).await;
    assert!(matches!(result, Err(LlmError::Unauthorized(_))));

    let client = client(&base, API_KEY);
    let result = client.retrieve_batch(&BatchId::new("batch_busy")).await;
    assert!(matches!(result, Err(LlmError::RateLimitExceeded(_))));

    match client.retrieve_batch(&BatchId::new("nope")).await {
        Err(LlmError::Http { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("No batch found"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}
