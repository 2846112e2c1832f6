use crate::table::value::Value;

/// An unheadered, untyped two-dimensional block of cells as read from one sheet.
///
/// Rows may be ragged; a cell beyond the end of a row is treated as missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<Value>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        RawGrid { rows }
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at (row, col), or the missing marker outside the grid.
    pub fn get(&self, row: usize, col: usize) -> &Value {
        static MISSING: Value = Value::Missing;
        self.rows
            .get(row)
            .and_then(|record| record.get(col))
            .unwrap_or(&MISSING)
    }

    /// Counts the populated cells of a row.
    pub fn populated(&self, row: usize) -> usize {
        self.rows
            .get(row)
            .map(|record| record.iter().filter(|value| !value.is_missing()).count())
            .unwrap_or(0)
    }
}

impl From<Vec<Vec<&str>>> for RawGrid {
    /// Builds a grid of text cells; empty strings become missing markers.
    fn from(rows: Vec<Vec<&str>>) -> Self {
        RawGrid::new(
            rows.into_iter()
                .map(|record| {
                    record.into_iter()
                        .map(|text| if text.trim().is_empty() { Value::Missing } else { Value::from(text) })
                        .collect()
                })
                .collect(),
        )
    }
}
