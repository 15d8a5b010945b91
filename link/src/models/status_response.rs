use serde::{Deserialize, Serialize};

use super::error_detail::ErrorDetail;
use super::query_state::QueryState;

/// Response to a status probe for one execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Handle of the probed execution.
    pub execution_id: String,

    /// Current remote state.
    pub state: QueryState,

    /// Diagnostic for FAILED executions, verbatim from the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,

    /// Where the store staged the result set, once available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_location: Option<String>,
}

impl StatusResponse {
    /// The remote diagnostic message, if the store attached one.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
