//! Agenda Engine Library
//!
//! Semantic retrieval and filtering engine for municipal event feeds:
//! turns raw feed records into searchable vector representations and
//! answers natural-language queries narrowed by structured criteria.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Event, SearchResult)
//!   - `value_objects/`: Immutable value types (FilterCriteria, DateRange, IngestReport)
//!   - `errors/`: Engine error taxonomy
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Vector store interface
//!   - `services/`: Embedding model and event feed interfaces
//!
//! - **Services** (`services/`): The engine itself
//!   - `filter`: FilterCriteria compilation and verification
//!   - `search`: Query embedding, candidate re-verification, ranking
//!   - `ingest`: Full-reconciliation catalog ingestion
//!   - `normalize`: Raw record coercion and document building
//!
//! # Usage
//!
//! ```rust,ignore
//! use agenda::domain::{Event, FilterCriteria};
//! use agenda::ports::{Embedder, EventStore};
//! use agenda::services::{CatalogIngestor, SearchEngine};
//! ```

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use domain::{
    DateRange, EngineError, Event, FilterCriteria, IngestReport, SearchResult,
};
pub use ports::{
    Embedder, EventFeed, EventStore, RawEventRecord, ScoredEvent,
};
pub use services::{
    CatalogIngestor, CompiledFilter, FilterCompiler, SearchEngine,
};
