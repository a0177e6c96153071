//! Agenda API Routes
//!
//! - /agenda/search - semantic search over the catalog
//! - /agenda/ingest - pull and reconcile the feed
//! - /agenda/stats, /agenda/reset - collection management

use axum::http::StatusCode;

use agenda::EngineError;

pub mod catalog;
pub mod search;
pub mod swagger;

/// Map an engine error onto an HTTP status.
///
/// Invalid calls are the client's fault; embedding and feed failures
/// come from upstream services; a dead store is plain unavailability.
pub(crate) fn error_response(error: EngineError) -> (StatusCode, String) {
    let status = match &error {
        EngineError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        EngineError::Embedding { .. } => StatusCode::BAD_GATEWAY,
        EngineError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        EngineError::Feed(_) => StatusCode::BAD_GATEWAY,
    };
    (status, error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_distinguishes_caller_and_upstream() {
        let (status, _) = error_response(EngineError::invalid_argument("k must be positive"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(EngineError::embedding("model", "timeout"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);

        let (status, _) = error_response(EngineError::store("connection refused"));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, message) = error_response(EngineError::feed("status 500"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(message.contains("status 500"));
    }
}
