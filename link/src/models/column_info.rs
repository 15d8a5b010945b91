use serde::{Deserialize, Serialize};

/// A column in the raw result schema returned by the remote store.
///
/// `data_type` is the store's own type name (e.g. `varchar`, `integer`,
/// `double`); the shaper works from the declared [`ColumnSpec`]s instead of
/// trusting it, so it is informational here.
///
/// [`ColumnSpec`]: crate::shape::ColumnSpec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name as the store reports it.
    pub name: String,

    /// Store-side type name.
    pub data_type: String,
}
