//! Madrid open-data implementation of the EventFeed port
//!
//! Pulls the city agenda catalog (JSON rendition) and flattens each
//! `@graph` entry into the canonical record keys the ingestor expects.
//! The catalog ships as a single document, so the feed exposes exactly
//! one page.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use agenda::ports::{EventFeed, RawEventRecord};
use agenda::EngineError;

/// Event feed backed by the Madrid open-data agenda catalog.
#[derive(Clone)]
pub struct MadridAgendaFeed {
    client: Client,
    feed_url: String,
}

impl MadridAgendaFeed {
    pub fn new(feed_url: String) -> Self {
        Self {
            client: Client::new(),
            feed_url,
        }
    }

    /// Flatten one catalog entry into canonical keys. Values keep
    /// whatever JSON type the feed used; coercion happens downstream.
    fn flatten(entry: &Map<String, Value>) -> RawEventRecord {
        let mut fields = Map::new();

        copy(entry, "id", &mut fields, "id");
        copy(entry, "title", &mut fields, "title");
        copy(entry, "description", &mut fields, "description");
        copy(entry, "free", &mut fields, "free");
        copy(entry, "price", &mut fields, "price");
        copy(entry, "dtstart", &mut fields, "start_date");
        copy(entry, "dtend", &mut fields, "end_date");
        copy(entry, "dtupdated", &mut fields, "updated");
        copy(entry, "event-location", &mut fields, "venue");
        // "@type" is a vocabulary URI; keep it verbatim, the last path
        // segment is the category.
        copy(entry, "@type", &mut fields, "type");

        // The district is a vocabulary URI; only its last path segment
        // is the district name.
        if let Some(district) = entry
            .get("address")
            .and_then(|a| a.get("district"))
            .and_then(|d| d.get("@id"))
            .and_then(Value::as_str)
            .and_then(|uri| uri.rsplit('/').next())
        {
            fields.insert("district".to_string(), Value::String(district.to_string()));
        }

        RawEventRecord::new(fields)
    }
}

fn copy(entry: &Map<String, Value>, from: &str, fields: &mut Map<String, Value>, to: &str) {
    if let Some(value) = entry.get(from) {
        fields.insert(to.to_string(), value.clone());
    }
}

#[async_trait]
impl EventFeed for MadridAgendaFeed {
    async fn fetch_page(&self, page: usize) -> Result<Option<Vec<RawEventRecord>>, EngineError> {
        if page > 0 {
            return Ok(None);
        }

        let response = self
            .client
            .get(&self.feed_url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| EngineError::feed(format!("fetch catalog: {e}")))?;

        if !response.status().is_success() {
            return Err(EngineError::feed(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EngineError::feed(format!("decode catalog: {e}")))?;

        let entries = body
            .get("@graph")
            .and_then(Value::as_array)
            .ok_or_else(|| EngineError::feed("catalog missing @graph array"))?;

        let records = entries
            .iter()
            .filter_map(Value::as_object)
            .map(Self::flatten)
            .collect();

        Ok(Some(records))
    }
}
