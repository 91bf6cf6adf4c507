//! Row-oriented in-memory table.
//!
//! Replaces the loosely-typed dataframe of the original tooling: an ordered
//! column list plus rows of optional string cells. A `None` cell is a missing
//! value; empty strings never enter a table (ingestion maps them to `None`).

use std::collections::HashSet;

/// Delimiter for multi-value cells produced by consolidation.
pub const MULTI_VALUE_DELIMITER: &str = "; ";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row. The row must have one cell per column.
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Cell by row index and column name; `None` for a missing value or an
    /// unknown column.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Replace a column's values, or append the column if it does not exist
    /// yet. `values` must have one entry per row. This is what keeps a
    /// re-scored table free of duplicate columns.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<String>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }
}

/// Collapse values into one cell: distinct, first-seen order, joined with
/// `"; "`. Duplicates appear once; an empty iterator yields an empty string.
pub fn merge_distinct<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut seen = HashSet::new();
    let mut parts: Vec<&str> = Vec::new();
    for v in values {
        if seen.insert(v) {
            parts.push(v);
        }
    }
    parts.join(MULTI_VALUE_DELIMITER)
}

/// First segment of a (possibly multi-value) cell.
pub fn first_value(cell: &str) -> &str {
    cell.split(MULTI_VALUE_DELIMITER).next().unwrap_or(cell)
}
