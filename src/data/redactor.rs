//! Redactor Module
//! Removes identity-document columns before anything is displayed or exported.

use polars::prelude::*;

/// Name fragments identifying identity-document columns (matched case-insensitively).
pub const SENSITIVE_FRAGMENTS: [&str; 9] = [
    "documento",
    "cedula",
    "cédula",
    "rut",
    "dni",
    "identidad",
    "pasaporte",
    "passport",
    "curp",
];

/// Whether a column name contains any sensitive fragment.
pub fn is_sensitive(column: &str) -> bool {
    let lower = column.to_lowercase();
    SENSITIVE_FRAGMENTS.iter().any(|frag| lower.contains(frag))
}

/// Names of the columns [`redact`] would drop.
pub fn sensitive_columns(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| is_sensitive(name))
        .collect()
}

/// Copy of `df` without any sensitive column.
pub fn redact(df: &DataFrame) -> DataFrame {
    if sensitive_columns(df).is_empty() {
        return df.clone();
    }

    let kept: Vec<Column> = df
        .get_columns()
        .iter()
        .filter(|col| !is_sensitive(col.name()))
        .cloned()
        .collect();

    // Keeping a subset of equal-height columns cannot fail.
    DataFrame::new(kept).unwrap_or_default()
}
