//! Header-indexed row tables.
//!
//! A [`Table`] wraps a raw cell grid whose first row is the header.
//! Column lookup is case-insensitive and whitespace-trimmed; a column
//! absent from the header yields an empty value for every row, never a
//! fault.

/// A tabular sheet slice: normalized header plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a raw grid. The first row becomes the header
    /// (each cell lowercased and trimmed); the rest are data rows.
    ///
    /// An empty grid produces a table with no header and no rows.
    #[must_use]
    pub fn from_rows(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let headers = grid
            .remove(0)
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        Self {
            headers,
            rows: grid,
        }
    }

    /// Number of data rows (header excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a cell by row index and column name.
    ///
    /// Returns `""` when the column is not in the header, the row does
    /// not reach that column, or the row index is out of range.
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> &str {
        let Some(idx) = self.headers.iter().position(|h| h == column) else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|r| r.get(idx))
            .map_or("", String::as_str)
    }

    /// Trimmed cell lookup, for key fields.
    #[must_use]
    pub fn trimmed(&self, row: usize, column: &str) -> &str {
        self.value(row, column).trim()
    }

    /// True when every cell of the row is empty or whitespace-only.
    ///
    /// Out-of-range rows count as blank.
    #[must_use]
    pub fn is_blank(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |r| r.iter().all(|c| c.trim().is_empty()))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_trimmed() {
        let t = Table::from_rows(grid(&[&[" Key ", "NAME"], &["n1", "Alpha"]]));
        assert_eq!(t.value(0, "key"), "n1");
        assert_eq!(t.value(0, "name"), "Alpha");
    }

    #[test]
    fn missing_column_yields_empty_value() {
        let t = Table::from_rows(grid(&[&["key"], &["n1"]]));
        assert_eq!(t.value(0, "description"), "");
    }

    #[test]
    fn short_rows_yield_empty_values() {
        let t = Table::from_rows(grid(&[&["key", "name", "color"], &["n1"]]));
        assert_eq!(t.value(0, "key"), "n1");
        assert_eq!(t.value(0, "color"), "");
    }

    #[test]
    fn blank_row_detection() {
        let t = Table::from_rows(grid(&[&["key"], &["  "], &[""], &["n1"]]));
        assert!(t.is_blank(0));
        assert!(t.is_blank(1));
        assert!(!t.is_blank(2));
        // out of range counts as blank
        assert!(t.is_blank(99));
    }

    #[test]
    fn empty_grid_is_empty_table() {
        let t = Table::from_rows(Vec::new());
        assert!(t.is_empty());
        assert_eq!(t.value(0, "key"), "");
    }
}
