//! Agenda API Data Models
//!
//! - Event: catalog entry as served to clients
//! - Search: semantic search request/response
//! - Catalog: ingestion and stats payloads

mod catalog;
mod event;
mod search;

pub use catalog::*;
pub use event::*;
pub use search::*;
