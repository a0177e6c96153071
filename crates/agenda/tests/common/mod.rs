//! Shared test doubles: an exact in-memory vector store and a
//! deterministic bag-of-words embedder.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use agenda::ports::{Embedder, EventFeed, EventStore, RawEventRecord, ScoredEvent};
use agenda::services::CompiledFilter;
use agenda::{EngineError, Event};

pub const DIMENSION: usize = 64;

/// Deterministic embedder: one vector slot per distinct token, counts
/// L2-normalized. Disjoint token sets embed to orthogonal vectors, so
/// cosine distance reflects term overlap exactly.
#[derive(Default)]
pub struct BagOfWordsEmbedder {
    vocabulary: Mutex<HashMap<String, usize>>,
}

#[async_trait]
impl Embedder for BagOfWordsEmbedder {
    fn dimension(&self) -> usize {
        DIMENSION
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        let tokens: Vec<String> = text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect();
        if tokens.is_empty() {
            return Err(EngineError::embedding(text, "empty text"));
        }

        let mut vector = vec![0.0f32; DIMENSION];
        let mut vocabulary = self.vocabulary.lock().unwrap();
        for token in tokens {
            let next = vocabulary.len();
            let slot = *vocabulary.entry(token).or_insert(next);
            vector[slot % DIMENSION] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        for v in &mut vector {
            *v /= norm;
        }
        Ok(vector)
    }
}

/// Exact brute-force vector store over cosine distance.
#[derive(Default)]
pub struct InMemoryEventStore {
    entries: Mutex<HashMap<String, (Event, String, Vec<f32>)>>,
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn upsert(
        &self,
        event: &Event,
        document: &str,
        vector: Vec<f32>,
    ) -> Result<(), EngineError> {
        self.entries.lock().unwrap().insert(
            event.id.clone(),
            (event.clone(), document.to_string(), vector),
        );
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), EngineError> {
        self.entries.lock().unwrap().remove(id);
        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        filter: &CompiledFilter,
        k: usize,
    ) -> Result<Vec<ScoredEvent>, EngineError> {
        if k == 0 {
            return Err(EngineError::invalid_argument("k must be positive"));
        }
        let mut scored: Vec<ScoredEvent> = self
            .entries
            .lock()
            .unwrap()
            .values()
            .filter(|(event, _, _)| filter.matches(event))
            .map(|(event, document, stored)| ScoredEvent {
                event: event.clone(),
                document: document.clone(),
                distance: cosine_distance(&vector, stored),
            })
            .collect();
        scored.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.event.id.cmp(&b.event.id))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn index(&self) -> Result<HashMap<String, DateTime<Utc>>, EngineError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .map(|(id, (event, _, _))| (id.clone(), event.source_updated_at))
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

/// Feed double serving a fixed set of pages.
pub struct StaticFeed {
    pub pages: Vec<Vec<RawEventRecord>>,
}

#[async_trait]
impl EventFeed for StaticFeed {
    async fn fetch_page(&self, page: usize) -> Result<Option<Vec<RawEventRecord>>, EngineError> {
        Ok(self.pages.get(page).cloned())
    }
}

/// Build a raw feed record from a JSON object literal.
pub fn raw_record(fields: Value) -> RawEventRecord {
    match fields {
        Value::Object(map) => RawEventRecord::new(map),
        _ => panic!("expected a JSON object"),
    }
}
