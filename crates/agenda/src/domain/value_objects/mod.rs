//! Value Objects

pub mod filter;
pub mod ingest_report;

pub use filter::{DateRange, FilterCriteria};
pub use ingest_report::IngestReport;
