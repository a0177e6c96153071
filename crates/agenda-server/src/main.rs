use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{MadridAgendaFeed, OpenAiEmbedder, QdrantEventStore};
use agenda::{CatalogIngestor, SearchEngine};
use config::ServerConfig;

/// Type aliases for engine services with concrete adapter implementations
pub type AppSearchEngine = SearchEngine<QdrantEventStore, OpenAiEmbedder>;
pub type AppIngestor = CatalogIngestor<QdrantEventStore, OpenAiEmbedder, MadridAgendaFeed>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<AppSearchEngine>,
    pub ingestor: Arc<AppIngestor>,
    pub store: Arc<QdrantEventStore>,
    pub config: Arc<ServerConfig>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Agenda API is running - the city calendar at your fingertips".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("📅 Agenda API initializing...");

    let config = Arc::new(ServerConfig::from_env()?);

    if config.api_key.is_some() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No AGENDA_API_KEY set - authentication disabled");
    }

    // Initialize adapters
    let store = Arc::new(
        QdrantEventStore::new(
            &config.qdrant_url,
            config.qdrant_api_key.clone(),
            &config.collection_name,
            config.embedding_dimension,
        )
        .await?,
    );

    let embedder = Arc::new(OpenAiEmbedder::new(
        config.openai_api_key.clone(),
        config.embedding_model.clone(),
        config.embedding_dimension,
    ));
    tracing::info!(model = %config.embedding_model, "🧬 Embedder initialized");

    let feed = Arc::new(MadridAgendaFeed::new(config.feed_url.clone()));

    // Initialize engine services
    let search = Arc::new(SearchEngine::new(store.clone(), embedder.clone()));
    let ingestor = Arc::new(CatalogIngestor::new(store.clone(), embedder, feed));

    let state = AppState {
        search,
        ingestor,
        store,
        config: config.clone(),
    };

    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::search::router())
        .merge(routes::catalog::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("✅ Agenda API ready on {}", config.bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
