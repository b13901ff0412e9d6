//! CSV serialization for extracted tables.
//!
//! Pure transformation, not part of the job pipeline: the caller supplies
//! the tables to export. With `merge` enabled, tables sharing an identical
//! ordered column-label list are concatenated into one logical table
//! before serialization; groups keep first-seen order. Every table (or
//! merged group) is followed by two blank lines in the output.

use indexmap::IndexMap;
use serde_json::Value;

use crate::table::Table;

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Convert a JSON cell value to a CSV-friendly string.
fn cell_to_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Serialize one table: a header row followed by its data rows.
fn write_table(out: &mut String, columns: &[String], data: &[Vec<Value>]) {
    let header: Vec<String> = columns.iter().map(|c| csv_escape(c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in data {
        let cells: Vec<String> = row.iter().map(|v| csv_escape(&cell_to_csv(v))).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
}

/// Serialize `tables` to a single CSV text stream.
///
/// When `merge` is true, tables are grouped by their exact ordered column
/// list and each group's row data is concatenated in input order. When
/// false, every table is serialized independently. Each table or group is
/// followed by two blank lines.
pub fn export_csv(tables: &[Table], merge: bool) -> String {
    let mut out = String::new();

    if merge {
        // Group row data by ordered column tuple, first-seen order.
        let mut groups: IndexMap<Vec<String>, Vec<Vec<Value>>> = IndexMap::new();
        for table in tables {
            groups
                .entry(table.columns.clone())
                .or_default()
                .extend(table.data.iter().cloned());
        }

        for (columns, data) in &groups {
            write_table(&mut out, columns, data);
            out.push_str("\n\n");
        }
    } else {
        for table in tables {
            write_table(&mut out, &table.columns, &table.data);
            out.push_str("\n\n");
        }
    }

    out
}
