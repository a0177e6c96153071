//! FilterCompiler - Criteria compilation and verification
//!
//! Compiles user-facing [`FilterCriteria`] into a normalized predicate
//! used twice: once by store adapters for pre-query restriction, and
//! once by the engine for post-query verification. The store-side pass
//! is a cardinality optimization only; correctness always comes from
//! the engine-side re-check.

use std::collections::BTreeSet;

use crate::domain::{DateRange, EngineError, Event, FilterCriteria};

/// Normalized, compiled form of [`FilterCriteria`].
///
/// Adapters may push the exact-match sets and the price bound down to
/// the store; the date-range and venue-substring parts are evaluated
/// engine-side only, so the store filter can never wrongly exclude a
/// candidate.
#[derive(Debug, Default, Clone)]
pub struct CompiledFilter {
    districts: Option<BTreeSet<String>>,
    event_types: Option<BTreeSet<String>>,
    price_max: Option<f64>,
    date_range: Option<DateRange>,
    venue_contains: Option<String>,
}

impl CompiledFilter {
    /// The empty filter: admits every event.
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_none()
            && self.event_types.is_none()
            && self.price_max.is_none()
            && self.date_range.is_none()
            && self.venue_contains.is_none()
    }

    /// Allowed districts, for store push-down.
    pub fn districts(&self) -> Option<&BTreeSet<String>> {
        self.districts.as_ref()
    }

    /// Allowed event types, for store push-down.
    pub fn event_types(&self) -> Option<&BTreeSet<String>> {
        self.event_types.as_ref()
    }

    /// Inclusive price ceiling, for store push-down.
    pub fn price_max(&self) -> Option<f64> {
        self.price_max
    }

    /// The full predicate: AND across criteria, OR within a set.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(districts) = &self.districts {
            if !districts.contains(&event.district) {
                return false;
            }
        }
        if let Some(event_types) = &self.event_types {
            if !event_types.contains(&event.event_type) {
                return false;
            }
        }
        if let Some(price_max) = self.price_max {
            // Unknown price never matches a price-bounded query.
            match event.price {
                Some(price) if price <= price_max => {}
                _ => return false,
            }
        }
        if let Some(range) = &self.date_range {
            let (start, end) = event.active_interval();
            if end < range.from || start > range.to {
                return false;
            }
        }
        if let Some(needle) = &self.venue_contains {
            if !event.venue.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Translates [`FilterCriteria`] into a [`CompiledFilter`].
pub struct FilterCompiler;

impl FilterCompiler {
    pub fn compile(criteria: &FilterCriteria) -> Result<CompiledFilter, EngineError> {
        if let Some(range) = &criteria.date_range {
            if range.from > range.to {
                return Err(EngineError::invalid_argument(format!(
                    "date range starts after it ends: {} > {}",
                    range.from, range.to
                )));
            }
        }

        let venue_contains = criteria
            .venue_contains
            .as_deref()
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());

        Ok(CompiledFilter {
            districts: non_empty_set(&criteria.districts),
            event_types: non_empty_set(&criteria.event_types),
            price_max: criteria.price_max,
            date_range: criteria.date_range,
            venue_contains,
        })
    }
}

fn non_empty_set(values: &[String]) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}
