//! Embedder Port
//!
//! Abstract interface for text embedding generation.

use async_trait::async_trait;

use crate::domain::errors::EngineError;

/// Service interface for turning text into fixed-length vectors.
///
/// Deterministic for a fixed model identity: the same text always
/// yields the same vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimensionality of every vector produced by this embedder.
    fn dimension(&self) -> usize;

    /// Generate the embedding vector for `text`.
    ///
    /// Fails with [`EngineError::Embedding`] when `text` is empty after
    /// normalization; there is nothing to embed or match.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError>;
}
