use serde::{Deserialize, Serialize};

/// Request payload for submitting a query to the remote store.
///
/// # Examples
///
/// ```rust
/// use edulake_link::models::StartQueryRequest;
///
/// let request = StartQueryRequest {
///     sql: "SELECT 1".to_string(),
///     database: "us_education_curated".to_string(),
///     output_location: Some("s3://bucket/results/".to_string()),
///     workgroup: None,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQueryRequest {
    /// SQL query text. Built by the query builder from closed enums only.
    pub sql: String,

    /// Database/schema the query runs against.
    pub database: String,

    /// URI prefix where the store stages results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_location: Option<String>,

    /// Workgroup / resource pool for the execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workgroup: Option<String>,
}
