//! Wire models for the remote columnar store protocol.
//!
//! Request and response payloads for the asynchronous
//! submit / status / results / cancel protocol.

pub mod column_info;
pub mod error_detail;
pub mod query_state;
pub mod results_page;
pub mod start_query_request;
pub mod start_query_response;
pub mod status_response;

pub use column_info::ColumnInfo;
pub use error_detail::ErrorDetail;
pub use query_state::QueryState;
pub use results_page::ResultsPage;
pub use start_query_request::StartQueryRequest;
pub use start_query_response::StartQueryResponse;
pub use status_response::StatusResponse;
