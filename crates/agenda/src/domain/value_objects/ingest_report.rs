//! IngestReport - Outcome counters of one ingestion cycle

use serde::{Deserialize, Serialize};

/// Counters reported by a full-reconciliation ingestion cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records embedded and written to the store (new or changed)
    pub ingested: usize,
    /// Records skipped as malformed or unembeddable
    pub skipped: usize,
    /// Valid records left untouched because the feed did not change them
    pub unchanged: usize,
    /// Stale store entries removed because the feed no longer carries them
    pub deleted: usize,
    /// Total records seen in the feed pull
    pub total: usize,
}
