//! Event - Catalog entry as served to API clients

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use agenda::Event;

/// Event response
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub district: String,
    pub venue: String,
    pub event_type: String,
    /// Euros; `null` when the feed did not state a price.
    pub price: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            district: event.district,
            venue: event.venue,
            event_type: event.event_type,
            price: event.price,
            start_date: event.start_date,
            end_date: event.end_date,
        }
    }
}
