//! EventFeed Port
//!
//! Abstract interface over the external open-data feed: a paginated
//! sequence of opaque key-value records plus end-of-pages detection.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::errors::EngineError;

/// One raw record as pulled from the feed, before normalization.
///
/// Feeds differ in transport shape; adapters flatten whatever they pull
/// into this loose map and the ingestor coerces it into the canonical
/// [`Event`](crate::domain::Event) schema.
#[derive(Debug, Clone, Default)]
pub struct RawEventRecord {
    pub fields: Map<String, Value>,
}

impl RawEventRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Trimmed, non-empty string value for `key`, if any.
    ///
    /// Numbers are stringified so numeric feed ids survive.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric value for `key`, accepting both JSON numbers and
    /// numeric strings.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse().ok(),
            _ => None,
        }
    }
}

/// Service interface over the paginated feed.
#[async_trait]
pub trait EventFeed: Send + Sync {
    /// Fetch page `page` (0-based). `Ok(None)` signals that there are
    /// no more pages; a transport or decode failure is
    /// [`EngineError::Feed`].
    async fn fetch_page(&self, page: usize) -> Result<Option<Vec<RawEventRecord>>, EngineError>;
}
