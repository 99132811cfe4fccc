//! CSV Data Loader Module
//! Handles CSV file loading and distinct-value extraction using Polars.

use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Malformed CSV: {0}")]
    Malformed(#[from] PolarsError),
    #[error("No data in {}", .0.display())]
    NoData(PathBuf),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        if df.width() == 0 {
            return Err(LoaderError::NoData(file_path.to_path_buf()));
        }

        log::info!(
            "Loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            file_path.display()
        );

        Ok(df)
    }

    /// Get list of column names from a DataFrame.
    pub fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Trimmed string value of every row of `column`; nulls and blanks become `None`.
    ///
    /// Returns `None` if the column does not exist or cannot be rendered as text.
    pub fn string_values(df: &DataFrame, column: &str) -> Option<Vec<Option<String>>> {
        let col = df.column(column).ok()?;
        let as_str = col.cast(&DataType::String).ok()?;
        let ca = as_str.str().ok()?;

        Some(
            ca.into_iter()
                .map(|v| {
                    v.map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
                .collect(),
        )
    }

    /// Get distinct non-null, non-blank values from a column in first-appearance order.
    pub fn unique_values(df: &DataFrame, column: &str) -> Vec<String> {
        let Some(values) = Self::string_values(df, column) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        values
            .into_iter()
            .flatten()
            .filter(|v| seen.insert(v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");

        let err = DataLoader::load_csv(&path).unwrap_err();

        assert!(matches!(err, LoaderError::NotFound(p) if p == path));
    }

    #[test]
    fn loads_rows_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activos.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "UNIDAD DE NEGOCIO,GENERO (F/M),DNI").unwrap();
        writeln!(file, "Ventas,F,111").unwrap();
        writeln!(file, "Finanzas,M,222").unwrap();
        drop(file);

        let df = DataLoader::load_csv(&path).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            DataLoader::column_names(&df),
            vec!["UNIDAD DE NEGOCIO", "GENERO (F/M)", "DNI"]
        );
    }

    #[test]
    fn empty_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vacio.csv");
        std::fs::File::create(&path).unwrap();

        let err = DataLoader::load_csv(&path).unwrap_err();

        assert!(matches!(err, LoaderError::Malformed(_)));
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roto.csv");
        std::fs::write(&path, "UNIDAD DE NEGOCIO,GENERO (F/M)\n\"Ventas,F\nTI,M\n").unwrap();

        let err = DataLoader::load_csv(&path).unwrap_err();

        assert!(matches!(err, LoaderError::Malformed(_)));
        assert!(err.to_string().starts_with("Malformed CSV"));
    }

    #[test]
    fn unique_values_trim_and_skip_blanks() {
        let df = df!(
            "UNIDAD" => &[Some(" Ventas"), Some("Finanzas"), None, Some("Ventas "), Some("  ")],
            "AÑO" => &[Some(2020i32), Some(2021), Some(2020), None, Some(2019)]
        )
        .unwrap();

        assert_eq!(
            DataLoader::unique_values(&df, "UNIDAD"),
            vec!["Ventas", "Finanzas"]
        );
        assert_eq!(
            DataLoader::unique_values(&df, "AÑO"),
            vec!["2020", "2021", "2019"]
        );
        assert!(DataLoader::unique_values(&df, "missing").is_empty());
    }
}
