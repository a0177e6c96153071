//! Catalog Routes - Feed ingestion and collection management

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use agenda::EventStore;

use crate::models::{IngestResponse, StatsResponse};
use crate::routes::error_response;
use crate::AppState;

/// Pull the feed and reconcile the collection against it
#[utoipa::path(
    post,
    path = "/agenda/ingest",
    responses(
        (status = 200, description = "Ingestion cycle report", body = IngestResponse),
        (status = 502, description = "Feed unreachable or malformed"),
        (status = 503, description = "Vector store unavailable")
    ),
    tag = "Catalog"
)]
pub async fn ingest(
    State(state): State<AppState>,
) -> Result<Json<IngestResponse>, (StatusCode, String)> {
    let report = state.ingestor.ingest().await.map_err(error_response)?;

    Ok(Json(report.into()))
}

/// Collection statistics
#[utoipa::path(
    get,
    path = "/agenda/stats",
    responses(
        (status = 200, description = "Collection statistics", body = StatsResponse),
        (status = 503, description = "Vector store unavailable")
    ),
    tag = "Catalog"
)]
pub async fn stats(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    let total_events = state.store.count().await.map_err(error_response)?;

    Ok(Json(StatsResponse {
        total_events,
        collection_name: state.config.collection_name.clone(),
        embedding_model: state.config.embedding_model.clone(),
    }))
}

/// Drop and recreate the collection
#[utoipa::path(
    post,
    path = "/agenda/reset",
    responses(
        (status = 204, description = "Collection reset"),
        (status = 503, description = "Vector store unavailable")
    ),
    tag = "Catalog"
)]
pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    state.store.reset().await.map_err(error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/agenda/ingest", post(ingest))
        .route("/agenda/stats", get(stats))
        .route("/agenda/reset", post(reset))
}
