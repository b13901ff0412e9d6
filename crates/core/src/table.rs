//! The extracted-table result schema.
//!
//! A [`Table`] is an ordered list of column labels plus an ordered list
//! of rows. Cells are JSON values so numeric data survives a round trip
//! unchanged; missing cells are normalized to the empty string at the
//! extraction boundary, never stored as null.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One extracted table: ordered columns and ordered row data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl Table {
    /// Normalize a table in place so that every row has exactly one cell
    /// per column and no cell is JSON null.
    ///
    /// - Null cells become `""`.
    /// - Rows shorter than the column list are padded with `""`.
    /// - Rows longer than the column list are truncated.
    pub fn normalize(&mut self) {
        let width = self.columns.len();
        for row in &mut self.data {
            for cell in row.iter_mut() {
                if cell.is_null() {
                    *cell = Value::String(String::new());
                }
            }
            match row.len().cmp(&width) {
                std::cmp::Ordering::Less => {
                    row.resize(width, Value::String(String::new()));
                }
                std::cmp::Ordering::Greater => {
                    row.truncate(width);
                }
                std::cmp::Ordering::Equal => {}
            }
        }
    }
}

/// Normalize a whole result set (see [`Table::normalize`]).
pub fn normalize_tables(tables: &mut [Table]) {
    for table in tables {
        table.normalize();
    }
}
