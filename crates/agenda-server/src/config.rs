//! Server configuration
//!
//! Every tunable is an explicit value threaded into the component
//! constructors; nothing reads process-wide mutable state after
//! startup.

use anyhow::{Context, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
const DEFAULT_COLLECTION: &str = "agenda_events";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;
/// Madrid open-data agenda catalog (JSON rendition).
const DEFAULT_FEED_URL: &str =
    "https://datos.madrid.es/egob/catalogo/300107-0-agenda-actividades-eventos.json";

/// Configuration for the API server and its adapters.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub collection_name: String,
    pub openai_api_key: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub feed_url: String,
    /// Bearer token protecting the API; `None` disables authentication.
    pub api_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        let openai_api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set")?;

        let embedding_dimension = match std::env::var("EMBEDDING_DIMENSION") {
            Ok(raw) => raw
                .parse()
                .context("EMBEDDING_DIMENSION must be a positive integer")?,
            Err(_) => DEFAULT_EMBEDDING_DIMENSION,
        };

        Ok(Self {
            bind_addr: env_or("AGENDA_BIND_ADDR", DEFAULT_BIND_ADDR),
            qdrant_url: env_or("QDRANT_URL", DEFAULT_QDRANT_URL),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection_name: env_or("AGENDA_COLLECTION", DEFAULT_COLLECTION),
            openai_api_key,
            embedding_model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            embedding_dimension,
            feed_url: env_or("AGENDA_FEED_URL", DEFAULT_FEED_URL),
            api_key: std::env::var("AGENDA_API_KEY").ok().filter(|k| !k.is_empty()),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
