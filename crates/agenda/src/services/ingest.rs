//! CatalogIngestor - Full-reconciliation feed ingestion
//!
//! Maintains the vector store as a faithful, de-duplicated mirror of
//! the external feed: unchanged records are never re-embedded, records
//! that disappeared from the feed are deleted, and a malformed record
//! never aborts the batch.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::{EngineError, IngestReport};
use crate::ports::{Embedder, EventFeed, EventStore};
use crate::services::normalize::{build_document, normalize_record};

/// Batch ingestion orchestrator over the feed, embedder, and store
/// ports.
///
/// Concurrent cycles against the same store are serialized: two
/// reconciliation passes must never race on stale-entry deletes.
pub struct CatalogIngestor<S: EventStore, E: Embedder, F: EventFeed> {
    store: Arc<S>,
    embedder: Arc<E>,
    feed: Arc<F>,
    cycle: Mutex<()>,
}

impl<S: EventStore, E: Embedder, F: EventFeed> CatalogIngestor<S, E, F> {
    pub fn new(store: Arc<S>, embedder: Arc<E>, feed: Arc<F>) -> Self {
        Self {
            store,
            embedder,
            feed,
            cycle: Mutex::new(()),
        }
    }

    /// Run one full ingestion cycle.
    pub async fn ingest(&self) -> Result<IngestReport, EngineError> {
        self.ingest_with_cancel(&CancellationToken::new()).await
    }

    /// Run one full ingestion cycle, aborting cleanly when `cancel`
    /// fires.
    ///
    /// Cancellation is observed between records, never mid-write of a
    /// single entry; a cancelled cycle keeps the upserts committed so
    /// far and skips the delete phase, leaving the store consistent.
    pub async fn ingest_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<IngestReport, EngineError> {
        let _cycle = self.cycle.lock().await;

        // Snapshot the stored ids up front; a store failure here aborts
        // before anything is written.
        let existing = self.store.index().await?;

        let mut report = IngestReport::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 0usize;
        let mut cancelled = false;

        'pull: loop {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let records = match self.feed.fetch_page(page).await {
                Ok(Some(records)) => records,
                Ok(None) => break,
                Err(err) => {
                    // Prior pages' upserts stay committed; the pull is
                    // incomplete so no deletes may be applied.
                    tracing::warn!(
                        page,
                        ingested = report.ingested,
                        skipped = report.skipped,
                        "feed page failed, aborting cycle without reconciling: {err}"
                    );
                    return Err(err);
                }
            };

            for raw in &records {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'pull;
                }
                report.total += 1;

                let event = match normalize_record(raw) {
                    Ok(event) => event,
                    Err(reason) => {
                        report.skipped += 1;
                        tracing::warn!(%reason, "skipping malformed feed record");
                        continue;
                    }
                };

                if !seen.insert(event.id.clone()) {
                    report.skipped += 1;
                    tracing::warn!(id = %event.id, "skipping duplicate feed record");
                    continue;
                }

                // Idempotent ingestion: unchanged records are never
                // re-embedded.
                if existing.get(&event.id) == Some(&event.source_updated_at) {
                    report.unchanged += 1;
                    continue;
                }

                let document = build_document(&event);
                let vector = match self.embedder.embed(&document).await {
                    Ok(vector) => vector,
                    Err(EngineError::Embedding { context, message }) => {
                        report.skipped += 1;
                        tracing::warn!(
                            id = %event.id,
                            %context,
                            "skipping record that failed to embed: {message}"
                        );
                        continue;
                    }
                    Err(err) => return Err(err),
                };

                self.store.upsert(&event, &document, vector).await?;
                report.ingested += 1;
            }

            page += 1;
        }

        if cancelled {
            tracing::info!(
                ingested = report.ingested,
                "ingestion cancelled, skipping reconciliation deletes"
            );
            return Ok(report);
        }

        // The pull completed: the store must now mirror the feed
        // exactly.
        for id in existing.keys() {
            if !seen.contains(id) {
                self.store.delete(id).await?;
                report.deleted += 1;
            }
        }

        tracing::info!(
            ingested = report.ingested,
            unchanged = report.unchanged,
            skipped = report.skipped,
            deleted = report.deleted,
            total = report.total,
            "💾 ingestion cycle complete"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Event;
    use crate::ports::{RawEventRecord, ScoredEvent};
    use crate::services::filter::CompiledFilter;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;

    struct HashEmbedder;

    #[async_trait]
    impl Embedder for HashEmbedder {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
            if text.trim().is_empty() {
                return Err(EngineError::embedding("test", "empty text"));
            }
            Ok(vec![text.len() as f32, 0.0, 0.0, 0.0])
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        entries: StdMutex<HashMap<String, Event>>,
        fail_upserts: bool,
    }

    #[async_trait]
    impl EventStore for MemoryStore {
        async fn upsert(
            &self,
            event: &Event,
            _document: &str,
            _vector: Vec<f32>,
        ) -> Result<(), EngineError> {
            if self.fail_upserts {
                return Err(EngineError::store("write refused"));
            }
            self.entries
                .lock()
                .unwrap()
                .insert(event.id.clone(), event.clone());
            Ok(())
        }

        async fn delete(&self, id: &str) -> Result<(), EngineError> {
            self.entries.lock().unwrap().remove(id);
            Ok(())
        }

        async fn query(
            &self,
            _vector: Vec<f32>,
            _filter: &CompiledFilter,
            _k: usize,
        ) -> Result<Vec<ScoredEvent>, EngineError> {
            Ok(vec![])
        }

        async fn index(&self) -> Result<HashMap<String, DateTime<Utc>>, EngineError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .map(|(id, event)| (id.clone(), event.source_updated_at))
                .collect())
        }

        async fn count(&self) -> Result<usize, EngineError> {
            Ok(self.entries.lock().unwrap().len())
        }

        async fn reset(&self) -> Result<(), EngineError> {
            self.entries.lock().unwrap().clear();
            Ok(())
        }
    }

    struct PagedFeed {
        pages: Vec<Vec<RawEventRecord>>,
        fail_page: Option<usize>,
    }

    #[async_trait]
    impl EventFeed for PagedFeed {
        async fn fetch_page(
            &self,
            page: usize,
        ) -> Result<Option<Vec<RawEventRecord>>, EngineError> {
            if self.fail_page == Some(page) {
                return Err(EngineError::feed("boom"));
            }
            Ok(self.pages.get(page).cloned())
        }
    }

    fn raw(id: &str, title: &str, updated: &str) -> RawEventRecord {
        match json!({
            "id": id,
            "title": title,
            "district": "Centro",
            "start_date": "2026-09-12 19:00:00.0",
            "updated": updated,
        }) {
            Value::Object(map) => RawEventRecord::new(map),
            _ => unreachable!(),
        }
    }

    fn ingestor(
        store: Arc<MemoryStore>,
        pages: Vec<Vec<RawEventRecord>>,
        fail_page: Option<usize>,
    ) -> CatalogIngestor<MemoryStore, HashEmbedder, PagedFeed> {
        CatalogIngestor::new(
            store,
            Arc::new(HashEmbedder),
            Arc::new(PagedFeed { pages, fail_page }),
        )
    }

    #[tokio::test]
    async fn test_ingests_valid_records() {
        let store = Arc::new(MemoryStore::default());
        let pages = vec![vec![raw("1", "Jazz night", "2026-09-01"), raw("2", "Teatro", "2026-09-01")]];
        let report = ingestor(store.clone(), pages, None).ingest().await.unwrap();

        assert_eq!(report.ingested, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.total, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_reingestion_is_idempotent() {
        let store = Arc::new(MemoryStore::default());
        let pages = vec![vec![raw("1", "Jazz night", "2026-09-01")]];

        let first = ingestor(store.clone(), pages.clone(), None).ingest().await.unwrap();
        assert_eq!(first.ingested, 1);

        let second = ingestor(store.clone(), pages, None).ingest().await.unwrap();
        assert_eq!(second.ingested, 0);
        assert_eq!(second.unchanged, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_changed_record_is_reembedded() {
        let store = Arc::new(MemoryStore::default());
        let v1 = vec![vec![raw("1", "Jazz night", "2026-09-01")]];
        let v2 = vec![vec![raw("1", "Jazz night (nueva fecha)", "2026-09-05")]];

        ingestor(store.clone(), v1, None).ingest().await.unwrap();
        let report = ingestor(store.clone(), v2, None).ingest().await.unwrap();

        assert_eq!(report.ingested, 1);
        assert_eq!(report.unchanged, 0);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stale_entries_are_deleted() {
        let store = Arc::new(MemoryStore::default());
        let v1 = vec![vec![raw("1", "Jazz night", "2026-09-01"), raw("2", "Teatro", "2026-09-01")]];
        let v2 = vec![vec![raw("1", "Jazz night", "2026-09-01")]];

        ingestor(store.clone(), v1, None).ingest().await.unwrap();
        let report = ingestor(store.clone(), v2, None).ingest().await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.index().await.unwrap().contains_key("1"));
    }

    #[tokio::test]
    async fn test_malformed_records_are_counted_not_fatal() {
        let store = Arc::new(MemoryStore::default());
        let mut bad = raw("3", "x", "2026-09-01");
        bad.fields.remove("start_date");
        let pages = vec![vec![raw("1", "Jazz night", "2026-09-01"), bad]];

        let report = ingestor(store.clone(), pages, None).ingest().await.unwrap();
        assert_eq!(report.ingested, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.total, 2);
    }

    #[tokio::test]
    async fn test_duplicate_feed_ids_are_skipped() {
        let store = Arc::new(MemoryStore::default());
        let pages = vec![vec![
            raw("1", "Jazz night", "2026-09-01"),
            raw("1", "Jazz night", "2026-09-01"),
        ]];

        let report = ingestor(store.clone(), pages, None).ingest().await.unwrap();
        assert_eq!(report.ingested, 1);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_feed_failure_preserves_prior_pages_and_skips_deletes() {
        let store = Arc::new(MemoryStore::default());
        // Seed an entry that the interrupted pull no longer carries.
        ingestor(
            store.clone(),
            vec![vec![raw("old", "Viejo", "2026-08-01")]],
            None,
        )
        .ingest()
        .await
        .unwrap();

        let pages = vec![vec![raw("1", "Jazz night", "2026-09-01")]];
        let result = ingestor(store.clone(), pages, Some(1)).ingest().await;

        assert!(matches!(result, Err(EngineError::Feed(_))));
        // Page 0 was committed, and "old" survived because no deletes
        // run on an incomplete pull.
        let index = store.index().await.unwrap();
        assert!(index.contains_key("1"));
        assert!(index.contains_key("old"));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_without_deletes() {
        let store = Arc::new(MemoryStore {
            fail_upserts: true,
            ..Default::default()
        });
        let pages = vec![vec![raw("1", "Jazz night", "2026-09-01")]];

        let result = ingestor(store.clone(), pages, None).ingest().await;
        assert!(matches!(result, Err(EngineError::StoreUnavailable(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_skips_deletes() {
        let store = Arc::new(MemoryStore::default());
        ingestor(
            store.clone(),
            vec![vec![raw("old", "Viejo", "2026-08-01")]],
            None,
        )
        .ingest()
        .await
        .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let pages = vec![vec![raw("1", "Jazz night", "2026-09-01")]];
        let report = ingestor(store.clone(), pages, None)
            .ingest_with_cancel(&cancel)
            .await
            .unwrap();

        assert_eq!(report.deleted, 0);
        assert!(store.index().await.unwrap().contains_key("old"));
    }
}
