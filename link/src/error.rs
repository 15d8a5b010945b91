//! Error types for edulake-link operations.
//!
//! One closed taxonomy for the whole query pipeline: selection validation,
//! submission, polling, fetching, and shaping each have a distinct variant
//! so callers can tell a bad request from a remote failure from a drifted
//! schema.

use thiserror::Error;

/// Result type alias for edulake-link operations.
pub type Result<T> = std::result::Result<T, EduLinkError>;

/// Errors that can occur during query building, execution, or shaping.
#[derive(Error, Debug)]
pub enum EduLinkError {
    /// A selection failed validation before anything touched the network.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Submission or lifecycle management failed on the client side.
    #[error("Execution error: {0}")]
    ExecutionError(String),

    /// The polling budget ran out before the execution reached a terminal
    /// state. No partial results accompany this error.
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// The remote store reported the execution FAILED; carries the store's
    /// diagnostic verbatim.
    #[error("Query {execution_id} failed: {message}")]
    QueryFailedError {
        execution_id: String,
        message: String,
    },

    /// Raw result pages did not match the declared schema.
    #[error("Shape error: {0}")]
    ShapeError(String),

    /// Client construction or configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Transport-level failure talking to the remote store.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// A payload could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The remote store answered with a non-success HTTP status.
    #[error("Server error ({status_code}): {message}")]
    ServerError { status_code: u16, message: String },

    /// The result set exceeded the configured row cap.
    #[error("Result exceeds the {0} row cap")]
    ResultTooLarge(usize),

    /// The execution was cancelled before completion.
    #[error("Query {0} was cancelled")]
    Cancelled(String),
}

impl EduLinkError {
    /// True for failures worth re-probing within the polling budget.
    ///
    /// Only transport errors qualify; everything else reflects a decided
    /// outcome or a caller defect and must surface immediately.
    pub(crate) fn is_transient(&self) -> bool {
        matches!(self, EduLinkError::NetworkError(_))
    }
}

impl From<reqwest::Error> for EduLinkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EduLinkError::SerializationError(err.to_string())
        } else {
            EduLinkError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for EduLinkError {
    fn from(err: serde_json::Error) -> Self {
        EduLinkError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failed_message_carries_both_fields() {
        let err = EduLinkError::QueryFailedError {
            execution_id: "exec-42".to_string(),
            message: "SYNTAX_ERROR: line 1:8".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("exec-42"));
        assert!(rendered.contains("SYNTAX_ERROR: line 1:8"));
    }

    #[test]
    fn only_network_errors_are_transient() {
        assert!(EduLinkError::NetworkError("reset".into()).is_transient());
        assert!(!EduLinkError::TimeoutError("budget".into()).is_transient());
        assert!(!EduLinkError::ValidationError("bad".into()).is_transient());
        assert!(!EduLinkError::ServerError {
            status_code: 503,
            message: "unavailable".into()
        }
        .is_transient());
    }

    #[test]
    fn serde_errors_map_to_serialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = EduLinkError::from(parse_err);
        assert!(matches!(err, EduLinkError::SerializationError(_)));
    }

    #[test]
    fn result_too_large_names_the_cap() {
        let err = EduLinkError::ResultTooLarge(100_000);
        assert_eq!(err.to_string(), "Result exceeds the 100000 row cap");
    }
}
