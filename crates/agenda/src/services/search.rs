//! SearchEngine - Query orchestration
//!
//! Embeds the query, runs a restricted nearest-neighbor search with
//! over-fetch, re-verifies every candidate against the compiled filter,
//! deduplicates, ranks, and maps distances to bounded similarities.
//! Stateless across calls; all state lives in the store.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{EngineError, FilterCriteria, SearchResult};
use crate::ports::{Embedder, EventStore};
use crate::services::filter::FilterCompiler;
use crate::services::normalize::clean_text;

/// Over-fetch multiplier: the store may admit candidates its own filter
/// should have rejected, and post-filtering may thin the pool below k.
const OVERFETCH_FACTOR: usize = 3;
/// Upper bound on the candidate pool requested from the store.
const MAX_CANDIDATES: usize = 150;
/// Cosine distance at or beyond which a candidate has no positive
/// semantic affinity with the query and is never worth returning.
const NO_AFFINITY_DISTANCE: f32 = 1.0;

/// Search orchestrator over the store and embedder ports.
pub struct SearchEngine<S: EventStore, E: Embedder> {
    store: Arc<S>,
    embedder: Arc<E>,
}

impl<S: EventStore, E: Embedder> SearchEngine<S, E> {
    pub fn new(store: Arc<S>, embedder: Arc<E>) -> Self {
        Self { store, embedder }
    }

    /// Execute a semantic search narrowed by `criteria`.
    ///
    /// Returns up to `k` results ordered by descending similarity with
    /// ties broken by ascending id. An empty result set is a valid
    /// outcome; an empty query or `k == 0` is an `InvalidArgument`.
    pub async fn search(
        &self,
        query_text: &str,
        criteria: &FilterCriteria,
        k: usize,
    ) -> Result<Vec<SearchResult>, EngineError> {
        if k == 0 {
            return Err(EngineError::invalid_argument(
                "result count k must be positive",
            ));
        }
        let query = clean_text(query_text);
        if query.is_empty() {
            return Err(EngineError::invalid_argument(
                "query text is empty; no fallback ranking is defined",
            ));
        }

        let filter = FilterCompiler::compile(criteria)?;
        let vector = self.embedder.embed(&query).await?;

        let fetch = k
            .saturating_mul(OVERFETCH_FACTOR)
            .min(MAX_CANDIDATES)
            .max(k);
        let mut candidates = self.store.query(vector, &filter, fetch).await?;

        // Correctness never depends on the store's filter fidelity:
        // re-verify every candidate here.
        candidates.retain(|c| c.distance < NO_AFFINITY_DISTANCE && filter.matches(&c.event));

        candidates.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.event.id.cmp(&b.event.id))
        });

        let mut seen: HashSet<String> = HashSet::new();
        candidates.retain(|c| seen.insert(c.event.id.clone()));
        candidates.truncate(k);

        let results: Vec<SearchResult> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, c)| SearchResult {
                similarity: 1.0 / (1.0 + c.distance),
                rank: i + 1,
                event: c.event,
            })
            .collect();

        tracing::debug!(query = %query, hits = results.len(), "🔍 search complete");

        Ok(results)
    }
}
