//! Table types.
//!
//! Table extraction yields ragged grids: rows of different lengths and cells
//! that may be missing altogether. Rows are kept exactly as extracted and the
//! column count is derived on demand.

use serde::{Deserialize, Serialize};

/// A table as an ordered sequence of rows. The first row is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Build a table from rows of optional cell strings.
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Option<String>>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|r| TableRow::new(r.into_iter().collect()))
                .collect(),
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns: the longest row's length.
    pub fn column_count(&self) -> usize {
        column_count(&self.rows)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header row, if any.
    pub fn header(&self) -> Option<&TableRow> {
        self.rows.first()
    }

    /// Rows after the header.
    pub fn body(&self) -> &[TableRow] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Column count of a ragged grid: the maximum row length, 0 for no rows.
pub fn column_count(rows: &[TableRow]) -> usize {
    rows.iter().map(TableRow::len).max().unwrap_or(0)
}

/// A table row. `None` marks a cell the extractor could not fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<Option<String>>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Create a row where every cell is present.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Number of cells in this row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell text at `col`, treating absent and out-of-range cells as empty.
    pub fn cell(&self, col: usize) -> &str {
        self.cells
            .get(col)
            .and_then(|c| c.as_deref())
            .unwrap_or("")
    }
}
