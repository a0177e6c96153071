//! Engine Errors
//!
//! Error taxonomy for engine operations.

use thiserror::Error;

/// Engine error taxonomy.
///
/// Record-level failures during ingestion are recovered locally
/// (skip + count); everything surfaced through this type propagates
/// to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed call (k = 0, empty query text, inverted date range).
    /// Never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Embedding a text failed (model unavailable, degenerate input)
    #[error("embedding failed for {context}: {message}")]
    Embedding { context: String, message: String },

    /// The vector store cannot be reached or written
    #[error("vector store unavailable: {0}")]
    StoreUnavailable(String),

    /// The event feed reported a failure
    #[error("feed error: {0}")]
    Feed(String),
}

impl EngineError {
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn embedding<C: Into<String>, M: Into<String>>(context: C, message: M) -> Self {
        Self::Embedding {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn store<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    pub fn feed<T: Into<String>>(message: T) -> Self {
        Self::Feed(message.into())
    }
}
