//! Search Routes - Semantic search over the event catalog

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::models::{SearchRequest, SearchResponse, SearchResultResponse};
use crate::routes::error_response;
use crate::AppState;

/// Run a semantic search with structured filters
#[utoipa::path(
    post,
    path = "/agenda/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Ranked matching events", body = SearchResponse),
        (status = 400, description = "Empty query, zero limit or inverted date range"),
        (status = 502, description = "Embedding service failure"),
        (status = 503, description = "Vector store unavailable")
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let criteria = payload.criteria();
    let results = state
        .search
        .search(&payload.query, &criteria, payload.limit())
        .await
        .map_err(error_response)?;

    tracing::info!("🔍 Search '{}' -> {} results", payload.query, results.len());

    Ok(Json(SearchResponse {
        query: payload.query,
        results: results
            .into_iter()
            .map(SearchResultResponse::from)
            .collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/agenda/search", post(search))
}
