//! Repository Ports

pub mod event_store;

pub use event_store::{EventStore, ScoredEvent};
