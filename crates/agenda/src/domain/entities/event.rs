//! Event - Canonical record for a feed event
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel value for categorical fields the feed left empty.
///
/// Categoricals are never null, so filter logic never needs
/// null-handling for them.
pub const UNKNOWN: &str = "unknown";

/// Event - A single entry of the municipal agenda
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable unique identifier derived from the feed's own id.
    /// Used as the vector-store join key. Immutable once assigned.
    pub id: String,
    /// Event title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// District of the venue (open-set categorical, `"unknown"` if absent)
    pub district: String,
    /// Venue name (`"unknown"` if absent)
    pub venue: String,
    /// Event type/category (open-set categorical, `"unknown"` if absent)
    pub event_type: String,
    /// Price in euros; `None` when the feed does not state one.
    /// Free events carry `Some(0.0)`.
    pub price: Option<f64>,
    /// When the event starts
    pub start_date: DateTime<Utc>,
    /// When the event ends; `None` for open-ended or single-instant events.
    /// Invariant: when present, `start_date <= end_date`.
    pub end_date: Option<DateTime<Utc>>,
    /// Feed-side update timestamp, used to decide whether re-embedding
    /// is needed on the next ingestion cycle.
    pub source_updated_at: DateTime<Utc>,
}

impl Event {
    /// The interval during which the event is active.
    ///
    /// Open-ended events collapse to a single instant at `start_date`.
    pub fn active_interval(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start_date, self.end_date.unwrap_or(self.start_date))
    }
}
