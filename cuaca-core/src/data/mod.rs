//! Reference dataset loading and per-column statistics.

pub mod source;
pub mod stats;

pub use source::{CsvSource, DataSource, DatasetInfo, ReferenceDataset};
pub use stats::{StatisticsProvider, coerce_numeric, median};
