//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use usergy_wizard::{GatewayError, NewProject, ProjectGateway, ProjectId, ProjectUpdate};

use crate::store::SqliteGateway;

#[derive(Clone)]
pub struct ApiState {
    pub store: SqliteGateway,
}

/// All routes, with CORS and request tracing.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/projects", post(create_project))
        .route("/projects/:id", get(get_project).patch(update_project))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(err: GatewayError) -> Response {
    let status = match err {
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GatewayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        GatewayError::Backend(_) | GatewayError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /projects`
///
/// Creates a draft project; the store assigns its id.
pub async fn create_project(
    State(state): State<Arc<ApiState>>,
    Json(new): Json<NewProject>,
) -> Response {
    match state.store.create_project(new).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /projects/:id`
pub async fn get_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.fetch_project(&ProjectId::new(id)).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => error_response(e),
    }
}

/// `PATCH /projects/:id`
///
/// Overwrites only the fields present in the body.
pub async fn update_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Response {
    match state.store.update_project(&ProjectId::new(id), &update).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
