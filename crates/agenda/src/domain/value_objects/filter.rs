//! FilterCriteria - Structured narrowing of a semantic query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive date range; an event matches when its active interval
/// intersects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}

/// User-specified filter criteria; every field is optional and an absent
/// field imposes no restriction. Distinct criteria combine as AND, the
/// values inside a multi-valued criterion as OR.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Allowed district values (exact match, OR within the set)
    #[serde(default)]
    pub districts: Vec<String>,
    /// Allowed event type values (exact match, OR within the set)
    #[serde(default)]
    pub event_types: Vec<String>,
    /// Inclusive upper price bound. Events without a known price
    /// never match a price-bounded query.
    pub price_max: Option<f64>,
    /// Active-interval intersection with this inclusive range
    pub date_range: Option<DateRange>,
    /// Case-insensitive substring of the venue name
    pub venue_contains: Option<String>,
}

impl FilterCriteria {
    /// True when no field restricts anything (matches every event).
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
            && self.event_types.is_empty()
            && self.price_max.is_none()
            && self.date_range.is_none()
            && self.venue_contains.is_none()
    }
}
