//! # Sheet Insight
//!
//! Turns a messy business spreadsheet upload into a clean, typed table.
//!
//! ## Pipeline
//!
//! 1. **Read**: every tab of an `.xlsx`/`.xlsm`/`.xlam`/`.ods` workbook, or a
//!    `.csv`/`.tsv`/`.txt` file with sniffed delimiter and encoding fallback
//! 2. **Locate** the header row of each sheet among its first rows
//! 3. **Consolidate** all sheets into one table, tagging rows with their `Origin` sheet
//! 4. **Clean** blank rows, total rows and empty columns
//! 5. **Classify** each column as date, numeric (monetary/quantity), boolean,
//!    categorical or free text
//! 6. **Normalize** dates day-first and numbers under the Brazilian or
//!    international convention chosen per column
//!
//! ## Usage
//!
//! ```no_run
//! use sheet_insight::{analyze, Criteria, Settings, Source};
//!
//! let bytes = std::fs::read("vendas.xlsx").unwrap();
//! let analysis = analyze(&Source::new("vendas.xlsx", bytes), &Criteria::default(), &Settings::default()).unwrap();
//! if let Some(metric) = analysis.primary_metric() {
//!     println!("{metric}: {:?}", analysis.summary(metric));
//! }
//! ```
pub mod error;
mod helpers;
pub mod inference;
pub mod report;
pub mod settings;
pub mod spreadsheet;
pub mod table;

pub use crate::error::InsightError;
pub use crate::inference::Classification;
pub use crate::inference::ColumnDiagnostic;
pub use crate::inference::ColumnType;
pub use crate::inference::Interpretation;
pub use crate::report::HistoryRecord;
pub use crate::report::QualityReport;
pub use crate::report::Summary;
pub use crate::settings::Settings;
pub use crate::spreadsheet::criteria::Criteria;
pub use crate::spreadsheet::Source;
pub use crate::table::Column;
pub use crate::table::RawGrid;
pub use crate::table::Table;
pub use crate::table::Value;

use tracing::info;

/// Result of analyzing one upload.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    /// Name of the upload
    pub name: String,
    /// Header row index of each sheet read, in sheet order
    pub header_rows: Vec<(String, usize)>,
    /// Clean, normalized table
    pub table: Table,
    pub classification: Classification,
    pub diagnostics: Vec<ColumnDiagnostic>,
}

impl Analysis {
    /// The default metric: the first monetary column, else the first numeric one.
    pub fn primary_metric(&self) -> Option<&str> {
        let monetary = self.classification.monetary();
        let numerics = self.classification.numerics();
        monetary.first().or(numerics.first()).copied()
    }

    pub fn summary(&self, column: &str) -> Option<Summary> {
        self.table.column(column).and_then(Summary::of)
    }

    /// Aggregates of the primary metric for the analysis history.
    pub fn history_record(&self) -> Option<HistoryRecord> {
        HistoryRecord::new(&self.name, &self.table, self.primary_metric()?)
    }

    pub fn quality(&self) -> QualityReport {
        QualityReport::new(&self.table, &self.classification)
    }
}

/// Reads an upload and runs the whole inference pipeline on it.
///
/// Fails with [`InsightError::UnreadableSource`] when the upload cannot be parsed
/// and with [`InsightError::EmptyResult`] when no sheet yields a usable column.
pub fn analyze(source: &Source, criteria: &Criteria, settings: &Settings) -> Result<Analysis, InsightError> {
    let sheets = spreadsheet::read_grids(source, criteria)
        .map_err(|error| error.into_insight(&source.name))?;
    let header_rows = sheets
        .iter()
        .filter(|(_, grid)| !grid.is_empty())
        .map(|(name, grid)| (name.to_owned(), inference::locate(grid, settings)))
        .collect();

    let consolidated = inference::consolidate(&source.name, &sheets, settings)?;
    let cleaned = inference::clean(&consolidated);
    let classification = inference::classify(&cleaned, settings);
    let normalization = inference::normalize(&cleaned, &classification, settings);
    info!(
        "{}: {} rows, {} date, {} numeric, {} categorical column(s)",
        source.name,
        normalization.table.row_count(),
        classification.dates().len(),
        classification.numerics().len(),
        classification.categoricals().len(),
    );

    Ok(Analysis {
        name: source.name.to_owned(),
        header_rows,
        table: normalization.table,
        classification,
        diagnostics: normalization.diagnostics,
    })
}
