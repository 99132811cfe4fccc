//! CSV Export Module
//! Writes the filtered view, minus sensitive columns, as a UTF-8 CSV file.

use crate::data::redactor;
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Default file name offered for downloads.
pub const SAFE_EXPORT_FILE_NAME: &str = "datos_filtrados_seguros.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize the redacted view as CSV bytes with a header row.
pub fn to_safe_csv(df: &DataFrame) -> Result<Vec<u8>, ExportError> {
    let mut safe = redactor::redact(df);
    let mut buf: Vec<u8> = Vec::new();

    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut safe)?;

    Ok(buf)
}

/// Write the redacted view to `path`. Returns the number of rows written.
pub fn export_safe_csv(df: &DataFrame, path: &Path) -> Result<usize, ExportError> {
    let bytes = to_safe_csv(df)?;

    let mut file = File::create(path)?;
    file.write_all(&bytes)?;

    log::info!("Exported {} rows to {}", df.height(), path.display());
    Ok(df.height())
}
