//! Infrastructure Adapters
//!
//! Implementations of the engine ports for external systems.

pub mod madrid;
pub mod openai;
pub mod qdrant;

// Re-exports
pub use madrid::MadridAgendaFeed;
pub use openai::OpenAiEmbedder;
pub use qdrant::QdrantEventStore;
