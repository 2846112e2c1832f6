//! # Source Readers
//!
//! Reads an upload into one [`RawGrid`] per sheet. Workbooks in Office Open XML
//! (`.xlsx`, `.xlsm`, `.xlam`) and OpenDocument (`.ods`) formats are parsed from
//! their zip archives with quick-xml; delimited text (`.csv`, `.tsv`, `.txt`) is
//! decoded with encoding fallback and split with a sniffed delimiter.
pub(crate) mod cell;
pub mod criteria;
pub(crate) mod csv;
pub(crate) mod excel;
pub(crate) mod ods;
pub(crate) mod reference;
pub(crate) mod sheet;
pub(crate) mod xlsx;

use crate::error::ReadError;
use crate::error::ResultMessage;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::csv::CsvSpreadsheet;
use crate::spreadsheet::ods::OdsSpreadsheet;
use crate::spreadsheet::sheet::Sheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use crate::table::RawGrid;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use tracing::warn;

#[derive(Error, Debug)]
pub(crate) enum SpreadsheetError {
    #[error("Missing part '{0}'")]
    FileError(String),

    #[error("Unsupported file format '{0}'")]
    UnsupportedFormatError(String),

    #[error("Spreadsheet '{0}' has no sheets")]
    SpreadsheetEmptyError(String),

    #[error("Spreadsheet '{0}' is password protected or saved in a legacy format")]
    SpreadsheetPasswordProtectedError(String),

    #[error("{0}: invalid value '{3}' at {1}!{2}")]
    CellValueError(String, String, String, String),
}

/// An uploaded file: its name (used for format detection) and raw content.
#[derive(Clone, Debug)]
pub struct Source {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Source {
    pub fn new(name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Source {
            name: name.to_owned(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased file extension, empty when absent.
    fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Common interface of the workbook readers.
pub(crate) trait Spreadsheet {
    /// Name of the upload
    fn name(&self) -> String;

    /// Loads the workbook-wide string table, empty for formats without one.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, ReadError>;

    /// Reads the sheets accepted by `criteria`, in workbook order.
    fn read_sheets(&mut self, criteria: &Criteria) -> Result<Vec<Sheet>, ReadError>;
}

/// Chooses the reader from the file extension.
pub(crate) fn open_spreadsheet(source: &Source) -> Result<Box<dyn Spreadsheet>, ReadError> {
    let spreadsheet: Box<dyn Spreadsheet> = match source.extension().as_str() {
        "csv" | "tsv" | "txt" => Box::new(CsvSpreadsheet::open(&source.name, &source.bytes)?),
        "xlsx" | "xlsm" | "xlam" => Box::new(
            XlsxSpreadsheet::open(&source.name, source.bytes.clone()).with_prefix("Invalid Excel workbook")?
        ),
        "ods" => Box::new(
            OdsSpreadsheet::open(&source.name, source.bytes.clone()).with_prefix("Invalid OpenDocument spreadsheet")?
        ),
        _ => Err(SpreadsheetError::UnsupportedFormatError(source.name.to_owned()))?,
    };
    Ok(spreadsheet)
}

/// Reads every accepted sheet of `source` as a (sheet name, grid) pair.
pub(crate) fn read_grids(source: &Source, criteria: &Criteria) -> Result<Vec<(String, RawGrid)>, ReadError> {
    let mut spreadsheet = open_spreadsheet(source)?;
    let shared_strings = spreadsheet.load_shared_strings()?;
    let sheets = spreadsheet.read_sheets(criteria)?;
    let mut grids = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        if sheet.is_empty() {
            warn!("{}: sheet '{}' is empty", spreadsheet.name(), sheet.name);
        }
        let grid = sheet.to_grid(criteria, &shared_strings)?;
        grids.push((sheet.name, grid));
    }
    info!("{}: read {} sheet(s)", spreadsheet.name(), grids.len());
    Ok(grids)
}
