//! Data module - CSV loading, derivation, redaction, filtering and export

pub mod columns;
pub mod deriver;
pub mod export;
pub mod filter;
mod loader;
pub mod redactor;

pub use columns::{ColumnMap, FieldRole};
pub use deriver::{DerivedTable, FieldDeriver};
pub use export::{ExportError, SAFE_EXPORT_FILE_NAME};
pub use filter::{FilterEngine, FilterField, FilterOptions, FilterOutcome, FilterSelection};
pub use loader::{DataLoader, LoaderError};
