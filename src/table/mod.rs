//! # Table Model
//!
//! Cell values, raw headerless grids and named-column tables shared by the
//! readers and the inference pipeline.
pub mod column;
pub mod grid;
pub mod value;

pub use column::Column;
pub use column::Table;
pub use grid::RawGrid;
pub use value::Value;
