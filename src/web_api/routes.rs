//! API Routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::config_store::CreateStreamRequest;
use crate::error::Result;
use crate::models::ApiResponse;
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(super::health_check))
        // Streams CRUD
        .route("/api/streams", get(list_streams))
        .route("/api/streams", post(create_stream))
        .route("/api/streams/status", get(list_runtime))
        .route("/api/streams/:id", get(get_stream))
        .route("/api/streams/:id", put(update_stream))
        .route("/api/streams/:id", delete(delete_stream))
        // Stream lifecycle
        .route("/api/streams/:id/start", post(start_stream))
        .route("/api/streams/:id/stop", post(stop_stream))
        .route("/api/streams/:id/status", get(stream_status))
        // Devices
        .route("/api/devices", get(list_devices))
        // Monitoring
        .route("/api/monitor/ping", get(monitor_ping))
        .route("/api/monitor/http", get(monitor_http))
        .with_state(state)
}

// ========================================
// Stream Handlers
// ========================================

async fn list_streams(State(state): State<AppState>) -> impl IntoResponse {
    let streams = state.store.get_cached_streams().await;
    Json(ApiResponse::success(streams))
}

async fn create_stream(
    State(state): State<AppState>,
    Json(req): Json<CreateStreamRequest>,
) -> Result<impl IntoResponse> {
    let stream = state.store.service().create_stream(req).await?;
    if let Err(e) = state.store.refresh_cache().await {
        tracing::warn!(error = %e, "Stream cache refresh failed, list may serve stale data");
    }
    Ok((StatusCode::CREATED, Json(ApiResponse::success(stream))))
}

async fn get_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    match state.store.get_stream(&id).await? {
        Some(stream) => Ok(Json(ApiResponse::success(stream))),
        None => Err(crate::Error::NotFound(format!("Stream {id} not found"))),
    }
}

async fn update_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateStreamRequest>,
) -> Result<impl IntoResponse> {
    let stream = state.store.service().update_stream(&id, req).await?;
    if let Err(e) = state.store.refresh_cache().await {
        tracing::warn!(error = %e, "Stream cache refresh failed, list may serve stale data");
    }
    Ok(Json(ApiResponse::success(stream)))
}

async fn delete_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    // Best-effort: do not leak a running relay for a deleted definition
    if let Err(e) = state.registry.stop(&id).await {
        tracing::debug!(stream_id = %id, error = %e, "Pre-delete stop skipped");
    }

    state.store.service().delete_stream(&id).await?;
    state.registry.forget(&id).await;
    if let Err(e) = state.store.refresh_cache().await {
        tracing::warn!(error = %e, "Stream cache refresh failed, list may serve stale data");
    }

    Ok(StatusCode::NO_CONTENT)
}

// ========================================
// Lifecycle Handlers
// ========================================

async fn start_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let snapshot = state.registry.start(&id).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

async fn stop_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let snapshot = state.registry.stop(&id).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

async fn stream_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let snapshot = state.registry.status(&id).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

async fn list_runtime(State(state): State<AppState>) -> impl IntoResponse {
    let snapshots = state.registry.list().await;
    Json(ApiResponse::success(snapshots))
}

// ========================================
// Device Handlers
// ========================================

async fn list_devices(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let devices = state.store.service().list_devices().await?;
    Ok(Json(ApiResponse::success(devices)))
}

// ========================================
// Monitoring Handlers
// ========================================

#[derive(Debug, Deserialize)]
struct PingQuery {
    host: String,
}

async fn monitor_ping(
    State(state): State<AppState>,
    Query(query): Query<PingQuery>,
) -> Result<impl IntoResponse> {
    let report = state.monitor.ping(&query.host).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
struct HttpQuery {
    url: String,
}

async fn monitor_http(
    State(state): State<AppState>,
    Query(query): Query<HttpQuery>,
) -> impl IntoResponse {
    let report = state.monitor.http_check(&query.url).await;
    Json(report)
}
