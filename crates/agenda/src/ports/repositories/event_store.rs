//! EventStore Port
//!
//! Abstract interface over the persistent embedding index.
//! The store exclusively owns the persisted (vector, metadata) pairs;
//! events returned from queries are snapshots, never live references.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{errors::EngineError, Event};
use crate::services::filter::CompiledFilter;

/// A candidate returned by a nearest-neighbor query.
#[derive(Debug, Clone)]
pub struct ScoredEvent {
    /// Snapshot of the stored event
    pub event: Event,
    /// The document text the vector was computed from
    pub document: String,
    /// Cosine distance to the query vector (0.0 exact, >= 1.0 no
    /// positive affinity)
    pub distance: f32,
}

/// Repository interface for the vector store.
///
/// All mutating operations are persisted atomically per entry; `query`
/// is read-only. Store-side filtering is a cardinality-reduction
/// optimization only; callers re-verify candidates themselves.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert or replace the entry for `event.id`. Idempotent;
    /// inserting a new id is not an error.
    async fn upsert(
        &self,
        event: &Event,
        document: &str,
        vector: Vec<f32>,
    ) -> Result<(), EngineError>;

    /// Remove the entry for `id`. No-op when the id is absent.
    async fn delete(&self, id: &str) -> Result<(), EngineError>;

    /// Up to `k` entries ordered by ascending distance to `vector`,
    /// restricted to entries satisfying `filter` as far as the store
    /// can evaluate it. `k == 0` fails with `InvalidArgument`.
    async fn query(
        &self,
        vector: Vec<f32>,
        filter: &CompiledFilter,
        k: usize,
    ) -> Result<Vec<ScoredEvent>, EngineError>;

    /// Map of every stored id to its `source_updated_at`, used by
    /// ingestion to decide what to re-embed and what to delete.
    async fn index(&self) -> Result<HashMap<String, DateTime<Utc>>, EngineError>;

    /// Number of persisted entries.
    async fn count(&self) -> Result<usize, EngineError>;

    /// Drop every entry and start over.
    async fn reset(&self) -> Result<(), EngineError>;
}
