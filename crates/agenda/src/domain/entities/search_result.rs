//! SearchResult - One ranked hit returned by the engine

use serde::{Deserialize, Serialize};

use crate::domain::entities::Event;

/// A single ranked search hit.
///
/// The embedded `Event` is a snapshot copied out of the store, never a
/// live reference into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The matched event
    pub event: Event,
    /// Normalized similarity in (0, 1], 1.0 meaning exact match.
    /// Monotonic transform of the underlying vector distance.
    pub similarity: f32,
    /// 1-based position in the returned ordering
    pub rank: usize,
}
