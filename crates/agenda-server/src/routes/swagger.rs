//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Event models
    EventResponse,
    // Search models
    SearchRequest, SearchResponse, SearchResultResponse,
    // Catalog models
    IngestResponse, StatsResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Agenda API",
        version = "0.1.0",
        description = "Semantic search over the Madrid municipal event agenda.\n\nEvents are embedded into a vector collection and retrieved by meaning, with exact structured filters applied on top.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Search", description = "Semantic search with structured filters"),
        (name = "Catalog", description = "Feed ingestion and collection management"),
    ),
    paths(
        crate::routes::search::search,
        crate::routes::catalog::ingest,
        crate::routes::catalog::stats,
        crate::routes::catalog::reset,
    ),
    components(
        schemas(
            // Event
            EventResponse,
            // Search
            SearchRequest,
            SearchResponse,
            SearchResultResponse,
            // Catalog
            IngestResponse,
            StatsResponse,
        )
    ),
)]
pub struct ApiDoc;
