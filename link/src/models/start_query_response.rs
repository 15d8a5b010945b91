use serde::{Deserialize, Serialize};

/// Response to a query submission: the opaque execution handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQueryResponse {
    /// Opaque handle identifying this asynchronous run.
    pub execution_id: String,
}
