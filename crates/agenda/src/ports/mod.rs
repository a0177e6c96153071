//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the engine interacts with
//! external systems (vector store, embedding model, event feed).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
