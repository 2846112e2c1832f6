//! # Report Outputs
//!
//! Aggregate scalars and completeness figures handed to the dashboard, history
//! and PDF collaborators.
pub mod quality;
pub mod summary;

pub use quality::ColumnQuality;
pub use quality::QualityReport;
pub use summary::HistoryRecord;
pub use summary::Summary;
