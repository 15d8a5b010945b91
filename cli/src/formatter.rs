//! Output formatters for shaped result tables.
//!
//! Renders a [`ResultTable`] as an aligned text table, JSON, or CSV.

use edulake_link::{CellValue, ResultTable};
use serde_json::{Map, Value as JsonValue};

use crate::args::OutputFormat;

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 32;

/// Formats result tables for display
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a table in the configured output format.
    pub fn format_table(&self, table: &ResultTable) -> String {
        match self.format {
            OutputFormat::Table => Self::render_text(table),
            OutputFormat::Json => Self::render_json(table),
            OutputFormat::Csv => Self::render_csv(table),
        }
    }

    /// Truncate a string to max width with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        if value.len() <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            let take = max_width - 3;
            format!("{}...", value.chars().take(take).collect::<String>())
        }
    }

    fn render_text(table: &ResultTable) -> String {
        if table.rows.is_empty() {
            return "0 rows".to_string();
        }

        let headers: Vec<String> = table
            .columns
            .iter()
            .map(|c| Self::truncate_value(&c.name, MAX_COLUMN_WIDTH))
            .collect();

        let rendered_rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| Self::truncate_value(&cell.to_string(), MAX_COLUMN_WIDTH))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
        for row in &rendered_rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let mut out = String::new();
        let separator: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+\n";

        out.push_str(&separator);
        out.push('|');
        for (header, width) in headers.iter().zip(&widths) {
            out.push_str(&format!(" {:<width$} |", header, width = width));
        }
        out.push('\n');
        out.push_str(&separator);

        for row in &rendered_rows {
            out.push('|');
            for (cell, width) in row.iter().zip(&widths) {
                out.push_str(&format!(" {:<width$} |", cell, width = width));
            }
            out.push('\n');
        }
        out.push_str(&separator);
        out.push_str(&format!(
            "{} row{}",
            table.row_count(),
            if table.row_count() == 1 { "" } else { "s" }
        ));
        out
    }

    fn render_json(table: &ResultTable) -> String {
        let objects: Vec<JsonValue> = table
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for (spec, cell) in table.columns.iter().zip(row) {
                    object.insert(spec.name.clone(), Self::cell_to_json(cell));
                }
                JsonValue::Object(object)
            })
            .collect();
        serde_json::to_string_pretty(&objects).unwrap_or_else(|_| "[]".to_string())
    }

    fn render_csv(table: &ResultTable) -> String {
        let mut out = String::new();
        out.push_str(
            &table
                .columns
                .iter()
                .map(|c| Self::csv_escape(&c.name))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
        for row in &table.rows {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    CellValue::Null => String::new(),
                    other => Self::csv_escape(&other.to_string()),
                })
                .collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    fn cell_to_json(cell: &CellValue) -> JsonValue {
        match cell {
            CellValue::Null => JsonValue::Null,
            CellValue::Text(s) => JsonValue::String(s.clone()),
            CellValue::Integer(v) => JsonValue::from(*v),
            CellValue::Double(v) => {
                serde_json::Number::from_f64(*v).map(JsonValue::Number).unwrap_or(JsonValue::Null)
            }
        }
    }

    fn csv_escape(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}
