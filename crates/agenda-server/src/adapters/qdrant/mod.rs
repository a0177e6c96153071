//! Qdrant-backed implementation of the EventStore port

pub mod event_store;

pub use event_store::QdrantEventStore;
