use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::column_info::ColumnInfo;

/// One page of raw results from the remote store.
///
/// Cells arrive as JSON strings, numbers, or nulls; rows are ordered by the
/// wire schema in `columns`. A populated `next_page_token` means more pages
/// follow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsPage {
    /// Wire schema for this page.
    pub columns: Vec<ColumnInfo>,

    /// Raw rows, each ordered to match `columns`.
    pub rows: Vec<Vec<JsonValue>>,

    /// Opaque continuation token; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl ResultsPage {
    /// True when another page follows this one.
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}
