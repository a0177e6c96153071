//! Catalog - Ingestion and stats payloads

use serde::Serialize;
use utoipa::ToSchema;

use agenda::IngestReport;

/// Outcome of one ingestion cycle
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Records embedded and written (new or changed).
    pub ingested: usize,
    /// Malformed or individually failed records.
    pub skipped: usize,
    /// Records already stored at the same feed revision.
    pub unchanged: usize,
    /// Stored events no longer present in the feed.
    pub deleted: usize,
    /// Records seen in the feed.
    pub total: usize,
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            ingested: report.ingested,
            skipped: report.skipped,
            unchanged: report.unchanged,
            deleted: report.deleted,
            total: report.total,
        }
    }
}

/// Collection statistics
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_events: usize,
    pub collection_name: String,
    pub embedding_model: String,
}
