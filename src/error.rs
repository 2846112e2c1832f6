use thiserror::Error;

/// Errors surfaced to callers of the pipeline.
///
/// Only reading can fail hard; every later stage degrades to a best-effort answer.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Cannot read '{name}': {reason}. Please try again using the template spreadsheet")]
    UnreadableSource { name: String, reason: String },

    #[error("No valid table found in '{name}'")]
    EmptyResult { name: String },
}

/// Internal error type for the source readers.
/// Aggregates errors from the standard library, dependencies, and reader modules.
#[derive(Error, Debug)]
pub(crate) enum ReadError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    #[error("{0}")]
    TextHelperError(#[from] crate::helpers::text::TextError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    OdsError(#[from] crate::spreadsheet::ods::OdsError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ReadError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ReadError::WithContextError(format!("{}: {}", message, e)))
    }
}

impl ReadError {
    /// Converts a reader failure into the public error for source `name`.
    pub(crate) fn into_insight(self, name: &str) -> InsightError {
        InsightError::UnreadableSource {
            name: name.to_owned(),
            reason: self.to_string(),
        }
    }
}
