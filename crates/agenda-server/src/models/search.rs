//! Search - Semantic search request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use agenda::{DateRange, FilterCriteria, SearchResult};

use crate::models::EventResponse;

const DEFAULT_LIMIT: usize = 10;

/// Search request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchRequest {
    pub query: String,
    /// Number of results to return (default 10).
    pub limit: Option<usize>,
    #[serde(default)]
    pub districts: Vec<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
    pub price_max: Option<f64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub venue: Option<String>,
}

impl SearchRequest {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Structured criteria portion of the request. A half-open date
    /// bound is widened to the representable extreme on the other side.
    pub fn criteria(&self) -> FilterCriteria {
        let date_range = match (self.date_from, self.date_to) {
            (None, None) => None,
            (from, to) => Some(DateRange::new(
                from.unwrap_or(DateTime::<Utc>::MIN_UTC),
                to.unwrap_or(DateTime::<Utc>::MAX_UTC),
            )),
        };

        FilterCriteria {
            districts: self.districts.clone(),
            event_types: self.event_types.clone(),
            price_max: self.price_max,
            date_range,
            venue_contains: self.venue.clone(),
        }
    }
}

/// One ranked search hit
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResultResponse {
    pub rank: usize,
    /// Affinity in (0, 1]; higher is closer.
    pub similarity: f32,
    pub event: EventResponse,
}

impl From<SearchResult> for SearchResultResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            rank: result.rank,
            similarity: result.similarity,
            event: result.event.into(),
        }
    }
}

/// Search response
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultResponse>,
}
