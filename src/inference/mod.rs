//! # Schema Inference
//!
//! Header location, multi-sheet consolidation, row cleaning, column type
//! classification and locale-aware value normalization.
pub mod classify;
pub mod consolidate;
pub mod dates;
pub mod header;
pub mod janitor;
pub mod locale;
pub mod normalize;

pub use classify::classify;
pub use classify::Classification;
pub use classify::ColumnType;
pub use consolidate::consolidate;
pub use header::locate;
pub use janitor::clean;
pub use locale::Interpretation;
pub use normalize::normalize;
pub use normalize::ColumnDiagnostic;
pub use normalize::Normalization;
