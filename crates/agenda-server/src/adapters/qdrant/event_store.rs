//! Qdrant implementation of the EventStore port
//!
//! One collection, cosine distance, the full event plus its document
//! text as payload. Point ids are UUIDv5 digests of the stable feed id
//! (Qdrant accepts only integers or UUIDs as point ids); the feed id
//! itself lives in the payload and stays the join key.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use qdrant_client::qdrant::{
    Condition, CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance,
    Filter, PointId, PointStruct, PointsIdsList, Range, ScrollPointsBuilder,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agenda::ports::{EventStore, ScoredEvent};
use agenda::services::CompiledFilter;
use agenda::{EngineError, Event};

const SCROLL_PAGE: u32 = 256;

/// Everything persisted alongside the vector.
#[derive(Debug, Serialize, Deserialize)]
struct EventPayload {
    #[serde(flatten)]
    event: Event,
    document: String,
}

/// Qdrant client wrapper implementing the EventStore port.
pub struct QdrantEventStore {
    client: Qdrant,
    collection_name: String,
    dimension: usize,
}

impl QdrantEventStore {
    /// Connect to Qdrant and make sure the collection exists.
    pub async fn new(
        url: &str,
        api_key: Option<String>,
        collection_name: &str,
        dimension: usize,
    ) -> Result<Self, EngineError> {
        let client = if let Some(key) = api_key {
            Qdrant::from_url(url).api_key(key).build()
        } else {
            Qdrant::from_url(url).build()
        }
        .map_err(|e| EngineError::store(e.to_string()))?;

        let store = Self {
            client,
            collection_name: collection_name.to_string(),
            dimension,
        };
        store.ensure_collection().await?;

        tracing::info!(collection = collection_name, "🌊 Connected to Qdrant");

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<(), EngineError> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| EngineError::store(e.to_string()))?;
        if exists {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                    VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(|e| EngineError::store(e.to_string()))?;

        tracing::info!(collection = %self.collection_name, "✨ Created collection");

        Ok(())
    }

    /// Stable UUIDv5 point id for a feed id.
    fn point_id(id: &str) -> PointId {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
            .to_string()
            .into()
    }

    /// Push-down of the parts of the filter Qdrant can evaluate
    /// exactly. This only narrows the candidate set; the engine
    /// re-verifies the full predicate itself.
    fn push_down_filter(filter: &CompiledFilter) -> Option<Filter> {
        let mut must: Vec<Condition> = Vec::new();
        if let Some(districts) = filter.districts() {
            must.push(Condition::matches(
                "district",
                districts.iter().cloned().collect::<Vec<_>>(),
            ));
        }
        if let Some(event_types) = filter.event_types() {
            must.push(Condition::matches(
                "event_type",
                event_types.iter().cloned().collect::<Vec<_>>(),
            ));
        }
        if let Some(price_max) = filter.price_max() {
            // Points without a numeric price fail the range condition,
            // matching the "unknown price never matches" rule.
            must.push(Condition::range(
                "price",
                Range {
                    lte: Some(price_max),
                    ..Default::default()
                },
            ));
        }
        (!must.is_empty()).then(|| Filter::must(must))
    }

    fn payload_for(
        event: &Event,
        document: &str,
    ) -> Result<HashMap<String, serde_json::Value>, EngineError> {
        let value = serde_json::to_value(EventPayload {
            event: event.clone(),
            document: document.to_string(),
        })
        .map_err(|e| EngineError::store(format!("serialize payload for {}: {e}", event.id)))?;
        serde_json::from_value(value)
            .map_err(|e| EngineError::store(format!("payload for {}: {e}", event.id)))
    }

    fn parse_payload(
        payload: &HashMap<String, qdrant_client::qdrant::Value>,
    ) -> Option<EventPayload> {
        let json = serde_json::to_value(payload).ok()?;
        serde_json::from_value(json).ok()
    }
}

#[async_trait]
impl EventStore for QdrantEventStore {
    async fn upsert(
        &self,
        event: &Event,
        document: &str,
        vector: Vec<f32>,
    ) -> Result<(), EngineError> {
        let point = PointStruct::new(
            Self::point_id(&event.id),
            vector,
            Self::payload_for(event, document)?,
        );

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, vec![point]).wait(true))
            .await
            .map_err(|e| EngineError::store(format!("upsert {}: {e}", event.id)))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), EngineError> {
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name)
                    .points(PointsIdsList {
                        ids: vec![Self::point_id(id)],
                    })
                    .wait(true),
            )
            .await
            .map_err(|e| EngineError::store(format!("delete {id}: {e}")))?;

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

        let mut request =
            SearchPointsBuilder::new(&self.collection_name, vector, k as u64).with_payload(true);
        if let Some(push_down) = Self::push_down_filter(filter) {
            request = request.filter(push_down);
        }

        let response = self
            .client
            .search_points(request)
            .await
            .map_err(|e| EngineError::store(format!("query: {e}")))?;

        let results = response
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = Self::parse_payload(&point.payload)?;
                Some(ScoredEvent {
                    event: payload.event,
                    document: payload.document,
                    // Qdrant reports cosine similarity; the port speaks
                    // cosine distance.
                    distance: 1.0 - point.score,
                })
            })
            .collect();

        Ok(results)
    }

    async fn index(&self) -> Result<HashMap<String, DateTime<Utc>>, EngineError> {
        let mut index = HashMap::new();
        let mut offset: Option<PointId> = None;

        loop {
            let mut request = ScrollPointsBuilder::new(&self.collection_name)
                .limit(SCROLL_PAGE)
                .with_payload(true);
            if let Some(offset_id) = offset.take() {
                request = request.offset(offset_id);
            }

            let response = self
                .client
                .scroll(request)
                .await
                .map_err(|e| EngineError::store(format!("scroll: {e}")))?;

            for point in &response.result {
                if let Some(payload) = Self::parse_payload(&point.payload) {
                    index.insert(payload.event.id, payload.event.source_updated_at);
                }
            }

            match response.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(index)
    }

    async fn count(&self) -> Result<usize, EngineError> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection_name).exact(true))
            .await
            .map_err(|e| EngineError::store(format!("count: {e}")))?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }

    async fn reset(&self) -> Result<(), EngineError> {
        self.client
            .delete_collection(&self.collection_name)
            .await
            .map_err(|e| EngineError::store(format!("reset: {e}")))?;
        self.ensure_collection().await?;

        tracing::info!(collection = %self.collection_name, "🧹 Collection reset");

        Ok(())
    }
}
