//! Result shaping: raw wire pages into typed in-memory tables.
//!
//! The shaper is a pure function of its input. It matches wire columns to
//! the declared schema by name (case-insensitive), coerces declared-numeric
//! cells from JSON numbers or numeric strings, and preserves nulls as
//! explicit nulls — never zero. Any value that cannot be coerced signals
//! upstream schema drift and fails the whole table.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{EduLinkError, Result};
use crate::models::ResultsPage;

/// Declared type of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// UTF-8 string (state codes stay strings)
    Text,
    /// 64-bit signed integer (years)
    Integer,
    /// 64-bit floating point (metric values)
    Double,
}

/// One column of a shaped table: name plus declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn double(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Double)
    }
}

/// A typed cell value. Nulls are explicit; they are never coerced to zero
/// or the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Text(String),
    Integer(i64),
    Double(f64),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Integer value, if this cell holds one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value widened to f64, if this cell holds one.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            CellValue::Double(v) => Some(*v),
            CellValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String value, if this cell holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Text(v) => f.write_str(v),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Double(v) => write!(f, "{}", v),
        }
    }
}

/// A shaped, typed result table.
///
/// Owned by the caller that requested it; each query run produces a fresh
/// table and nothing mutates it in place afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column declarations, in output order.
    pub columns: Vec<ColumnSpec>,

    /// Rows of cells, ordered as the query's ORDER BY produced them.
    /// Each row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultTable {
    /// An empty table with the given schema.
    pub fn empty(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column names in output order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// One row as a name-to-cell map, for convenience.
    pub fn row_as_map(&self, row_idx: usize) -> Option<HashMap<&str, &CellValue>> {
        let row = self.rows.get(row_idx)?;
        let mut map = HashMap::with_capacity(self.columns.len());
        for (spec, cell) in self.columns.iter().zip(row) {
            map.insert(spec.name.as_str(), cell);
        }
        Some(map)
    }
}

/// Shape raw result pages into a [`ResultTable`] with the declared schema.
///
/// Pure function: no side effects, input pages are consumed as-is. Fails
/// with `ShapeError` if a declared column is missing from the wire schema
/// or a declared-numeric column holds a non-numeric, non-null value.
pub fn shape_pages(columns: &[ColumnSpec], pages: &[ResultsPage]) -> Result<ResultTable> {
    let mut table = ResultTable::empty(columns.to_vec());

    let mut row_offset = 0usize;
    for page in pages {
        // Map each declared column to its wire position, case-insensitively.
        let mut indices = Vec::with_capacity(columns.len());
        for spec in columns {
            let idx = page
                .columns
                .iter()
                .position(|c| c.name.eq_ignore_ascii_case(&spec.name))
                .ok_or_else(|| {
                    EduLinkError::ShapeError(format!(
                        "column '{}' missing from result schema [{}]",
                        spec.name,
                        page.columns
                            .iter()
                            .map(|c| c.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ))
                })?;
            indices.push(idx);
        }

        for (i, raw_row) in page.rows.iter().enumerate() {
            let mut row = Vec::with_capacity(columns.len());
            for (spec, &idx) in columns.iter().zip(&indices) {
                // An absent cell is drift, not a null: nulls arrive as
                // explicit null markers.
                let raw = raw_row.get(idx).ok_or_else(|| {
                    EduLinkError::ShapeError(format!(
                        "column '{}' has no cell in row {} ({} cells for {} columns)",
                        spec.name,
                        row_offset + i,
                        raw_row.len(),
                        page.columns.len()
                    ))
                })?;
                row.push(coerce_cell(spec, raw, row_offset + i)?);
            }
            table.rows.push(row);
        }
        row_offset += page.rows.len();
    }

    Ok(table)
}

/// Coerce one wire cell to the declared type.
fn coerce_cell(spec: &ColumnSpec, raw: &JsonValue, row: usize) -> Result<CellValue> {
    if raw.is_null() {
        return Ok(CellValue::Null);
    }

    match spec.column_type {
        ColumnType::Text => match raw {
            JsonValue::String(s) => Ok(CellValue::Text(s.clone())),
            // The store may hand back bare numbers for text-typed columns
            other => Ok(CellValue::Text(other.to_string())),
        },
        ColumnType::Integer => match raw {
            JsonValue::Number(n) => n
                .as_i64()
                .map(CellValue::Integer)
                .ok_or_else(|| drift_error(spec, raw, row)),
            JsonValue::String(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .map(CellValue::Integer)
                    .map_err(|_| drift_error(spec, raw, row))
            }
            _ => Err(drift_error(spec, raw, row)),
        },
        ColumnType::Double => match raw {
            JsonValue::Number(n) => n
                .as_f64()
                .map(CellValue::Double)
                .ok_or_else(|| drift_error(spec, raw, row)),
            JsonValue::String(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<f64>()
                    .map(CellValue::Double)
                    .map_err(|_| drift_error(spec, raw, row))
            }
            _ => Err(drift_error(spec, raw, row)),
        },
    }
}

fn drift_error(spec: &ColumnSpec, raw: &JsonValue, row: usize) -> EduLinkError {
    EduLinkError::ShapeError(format!(
        "column '{}' declared {:?} but row {} holds {}",
        spec.name, spec.column_type, row, raw
    ))
}
