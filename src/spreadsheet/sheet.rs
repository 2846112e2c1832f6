use crate::error::ReadError;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::SpreadsheetError;
use crate::table::RawGrid;
use crate::table::Value;
use tracing::debug;

/// Represents a sheet read from a workbook, as the sparse list of its non-empty cells.
pub(crate) struct Sheet {
    /// Source file name
    pub(crate) file_name: String,
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Row limit for data extraction
    limit: Option<usize>,
    /// Used range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_lower_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(file_name: &str, name: &str, limit: Option<usize>) -> Self {
        Self {
            file_name: file_name.to_owned(),
            name: name.to_owned(),
            cells: Vec::new(),
            limit,
            row_lower_bound: None,
            row_upper_bound: None,
            col_lower_bound: None,
            col_upper_bound: None,
        }
    }

    /// Returns true if the sheet contains no cells.
    pub(super) fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Checks if a row exceeds the row limit.
    pub(super) fn after_row_upper_bound(&self, row: usize) -> bool {
        self.row_lower_bound.zip(self.limit)
            .map(|(row_lower_bound, limit)| row_lower_bound + limit <= row)
            .unwrap_or(false)
    }

    /// Adds a cell to the sheet, updating the used range.
    pub(super) fn push(&mut self, cell: Cell) {
        if self.after_row_upper_bound(cell.row) {
            return;
        }
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_lower_bound.map(|col_lower_bound| col < col_lower_bound).unwrap_or(true) {
            self.col_lower_bound = Some(col);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Materializes the used range as a dense grid of typed values.
    ///
    /// Text matching one of the null literals becomes missing. Cells that fail to
    /// convert become missing when `error_as_null` is set, otherwise reading fails
    /// naming the cell.
    pub(crate) fn to_grid(&self, criteria: &Criteria, shared_strings: &[String]) -> Result<RawGrid, ReadError> {
        let bounds = self.row_lower_bound
            .zip(self.row_upper_bound)
            .zip(self.col_lower_bound.zip(self.col_upper_bound));
        let ((row_lower, row_upper), (col_lower, col_upper)) = match bounds {
            Some(bounds) => bounds,
            None => return Ok(RawGrid::default()),
        };

        let width = col_upper - col_lower + 1;
        let mut rows = vec![vec![Value::Missing; width]; row_upper - row_lower + 1];
        for cell in &self.cells {
            let value = match cell.to_value(shared_strings) {
                Ok(Value::Text(text)) if criteria.is_null(&text) => Value::Missing,
                Ok(value) => value,
                Err(message) if criteria.error_as_null => {
                    debug!("{}!{}: {}, read as missing", self.name, cell.reference(), message);
                    Value::Missing
                }
                Err(message) => Err(SpreadsheetError::CellValueError(
                    self.file_name.to_owned(),
                    self.name.to_owned(),
                    cell.reference(),
                    message,
                ))?,
            };
            rows[cell.row - row_lower][cell.col - col_lower] = value;
        }
        Ok(RawGrid::new(rows))
    }
}
