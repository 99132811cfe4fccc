//! Filter Engine Module
//! Applies the sidebar multi-select choices to the derived table.

use crate::data::columns::{has_column, ColumnMap, FieldRole, HIRE_MONTH_COL, HIRE_YEAR_COL};
use crate::data::deriver::MONTHS_ES;
use crate::data::DataLoader;
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// A filterable field shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub label: String,
    pub column: String,
}

/// Full distinct value set of every filterable field present in the table.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub fields: Vec<FilterField>,
    values: BTreeMap<String, Vec<String>>,
}

/// Allowed values per column. An empty set means "no restriction".
pub type FilterSelection = BTreeMap<String, BTreeSet<String>>;

/// Result of applying a selection.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Rows to present. Equals the input table when `fell_back` is set.
    pub df: DataFrame,
    /// Rows matched by the selection before any fallback.
    pub matched_rows: usize,
    /// The selection matched nothing and the unfiltered table is returned.
    pub fell_back: bool,
}

impl FilterOptions {
    /// The sidebar fields available for `df`, in display order.
    pub fn default_fields(columns: &ColumnMap, df: &DataFrame) -> Vec<FilterField> {
        let roles = [FieldRole::BusinessUnit, FieldRole::Gender, FieldRole::Country];
        let mut fields: Vec<FilterField> = roles
            .iter()
            .filter_map(|&role| {
                columns.get(role).map(|column| FilterField {
                    label: role.label().to_string(),
                    column: column.to_string(),
                })
            })
            .collect();

        let derived = [
            ("Año de ingreso", HIRE_YEAR_COL),
            ("Mes de ingreso", HIRE_MONTH_COL),
        ];
        for (label, column) in derived {
            if has_column(df, column) {
                fields.push(FilterField {
                    label: label.to_string(),
                    column: column.to_string(),
                });
            }
        }

        fields
    }

    /// Collect the distinct values of each field.
    pub fn from_frame(df: &DataFrame, fields: Vec<FilterField>) -> Self {
        let values = fields
            .iter()
            .map(|field| {
                let mut vals = DataLoader::unique_values(df, &field.column);
                Self::sort_for_display(&field.column, &mut vals);
                (field.column.clone(), vals)
            })
            .collect();

        Self { fields, values }
    }

    /// Every distinct value of `column`, or an empty slice for unknown columns.
    pub fn values(&self, column: &str) -> &[String] {
        self.values.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    fn sort_for_display(column: &str, vals: &mut [String]) {
        if column == HIRE_MONTH_COL {
            vals.sort_by_key(|v| MONTHS_ES.iter().position(|m| m == v).unwrap_or(usize::MAX));
        } else if column == HIRE_YEAR_COL {
            vals.sort_by_key(|v| v.parse::<i64>().unwrap_or(i64::MAX));
        } else {
            vals.sort();
        }
    }
}

/// Handles row filtering.
pub struct FilterEngine;

impl FilterEngine {
    /// Whether the selection for `column` actually restricts anything.
    pub fn is_restrictive(
        column: &str,
        allowed: &BTreeSet<String>,
        options: &FilterOptions,
    ) -> bool {
        if allowed.is_empty() {
            return false;
        }
        let full = options.values(column);
        !(allowed.len() == full.len() && full.iter().all(|v| allowed.contains(v)))
    }

    /// Keep rows whose trimmed value is allowed for every restricted field.
    ///
    /// Falls back to the unfiltered table when nothing matches.
    pub fn apply(
        df: &DataFrame,
        selection: &FilterSelection,
        options: &FilterOptions,
    ) -> FilterOutcome {
        let mut keep = vec![true; df.height()];
        let mut restricted = false;

        for (column, allowed) in selection {
            if !Self::is_restrictive(column, allowed, options) {
                continue;
            }
            let Some(values) = DataLoader::string_values(df, column) else {
                log::warn!("Filter on missing column '{}' ignored", column);
                continue;
            };
            restricted = true;

            for (flag, value) in keep.iter_mut().zip(values.iter()) {
                *flag = *flag && value.as_ref().is_some_and(|v| allowed.contains(v));
            }
        }

        if !restricted {
            return FilterOutcome {
                df: df.clone(),
                matched_rows: df.height(),
                fell_back: false,
            };
        }

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let filtered = match df.filter(&mask) {
            Ok(filtered) => filtered,
            Err(e) => {
                log::warn!("Filtering failed, showing unfiltered data: {}", e);
                return FilterOutcome {
                    df: df.clone(),
                    matched_rows: df.height(),
                    fell_back: true,
                };
            }
        };

        if filtered.height() == 0 && df.height() > 0 {
            log::warn!("Selection matches no rows; falling back to unfiltered data");
            return FilterOutcome {
                df: df.clone(),
                matched_rows: 0,
                fell_back: true,
            };
        }

        FilterOutcome {
            matched_rows: filtered.height(),
            df: filtered,
            fell_back: false,
        }
    }
}
