//! HTTP request handlers for the dashboard.
//!
//! Serves the HTML viewer, a small JSON API over the same records, the
//! refresh action, and a health check.

use crate::render::Page;
use crate::store::StoreHandle;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use torx_domain::traits::RecordStore;
use torx_domain::ProjectId;
use torx_store::StoreError;
use tracing::{debug, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Lazily opened record storage
    pub store: Arc<StoreHandle>,
}

impl AppState {
    /// Wrap a store handle
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Query string of the viewer page
#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    /// Project to show; defaults to the most recent one
    pub project: Option<String>,
}

/// Listing entry of `GET /api/projects`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Project id
    pub project_id: String,
    /// Last upsert time (milliseconds since Unix epoch)
    pub updated_at: u64,
}

/// Body of `GET /api/projects/{id}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectDetail {
    /// Project id
    pub project_id: String,
    /// Last upsert time (milliseconds since Unix epoch)
    pub updated_at: u64,
    /// Stored payload; a JSON string when the stored text does not parse
    pub payload: Value,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// `healthy` when storage answers a listing query
    pub status: String,
    /// Storage location
    pub storage: String,
    /// Number of stored projects, when known
    pub project_count: Option<usize>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Storage could not be opened or queried
    Store(StoreError),
    /// No record for the requested project
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Store(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
            AppError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Project not found: {}", id)),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

/// GET / - Project viewer
async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Response, AppError> {
    let requested = query
        .project
        .filter(|p| !p.trim().is_empty())
        .map(ProjectId::new);

    let (projects, selected) = state.store.with(|store| {
        let projects = store.list_projects()?;
        let target = requested
            .clone()
            .or_else(|| projects.first().map(|p| p.project_id.clone()));
        let selected = match target {
            Some(id) => store.get_record(&id)?,
            None => None,
        };
        Ok((projects, selected))
    })?;

    let missing = requested.as_ref().filter(|_| selected.is_none());
    let html = Page {
        projects: &projects,
        selected: selected.as_ref(),
        missing,
    }
    .render();

    let status = if missing.is_some() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    Ok((status, Html(html)).into_response())
}

/// GET /api/projects - Project ids, most recent first
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectEntry>>, AppError> {
    let projects = state.store.with(|store| store.list_projects())?;

    Ok(Json(
        projects
            .into_iter()
            .map(|p| ProjectEntry {
                project_id: p.project_id.to_string(),
                updated_at: p.updated_at,
            })
            .collect(),
    ))
}

/// GET /api/projects/:id - One stored record
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectDetail>, AppError> {
    let project_id = ProjectId::new(id.as_str());
    let record = state
        .store
        .with(|store| store.get_record(&project_id))?
        .ok_or(AppError::NotFound(id))?;

    let payload = serde_json::from_str(&record.payload)
        .unwrap_or_else(|_| Value::String(record.payload.clone()));

    Ok(Json(ProjectDetail {
        project_id: record.project_id.to_string(),
        updated_at: record.updated_at,
        payload,
    }))
}

/// POST /refresh - Drop the cached storage handle and reload
async fn refresh(State(state): State<AppState>) -> Redirect {
    info!("Refresh requested");
    state.store.invalidate();
    Redirect::to("/")
}

/// GET /health - Storage reachability
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let storage = state.store.describe();

    let response = match state.store.with(|store| store.list_projects()) {
        Ok(projects) => HealthCheckResponse {
            status: "healthy".to_string(),
            storage,
            project_count: Some(projects.len()),
        },
        Err(e) => {
            debug!("Health check failed: {}", e);
            HealthCheckResponse {
                status: "unhealthy".to_string(),
                storage,
                project_count: None,
            }
        }
    };

    Json(response)
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/projects", get(list_projects))
        .route("/api/projects/:id", get(get_project))
        .route("/refresh", post(refresh))
        .route("/health", get(health_check))
        .with_state(state)
}
