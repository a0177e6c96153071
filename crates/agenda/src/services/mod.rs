//! Engine Services
//!
//! The retrieval and filtering engine: normalization, filter
//! compilation, search orchestration, and catalog ingestion.
//! Everything here is generic over the ports and holds no state of its
//! own beyond ingestion-cycle serialization.

pub mod filter;
pub mod ingest;
pub mod normalize;
pub mod search;

// Re-exports
pub use filter::{CompiledFilter, FilterCompiler};
pub use ingest::CatalogIngestor;
pub use search::SearchEngine;
