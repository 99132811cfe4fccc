//! Summary Statistics Module
//! Per-column descriptive statistics for the summary view.

use crate::data::DataLoader;
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::{Data, Distribution};
use std::collections::HashMap;

/// Descriptive statistics for a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for NumericSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Descriptive statistics for a text column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryKind {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub dtype: String,
    pub nulls: usize,
    pub kind: SummaryKind,
}

/// Handles statistical calculations with multi-threading support.
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn describe_numeric(values: &[f64]) -> NumericSummary {
        let n = values.len();
        if n == 0 {
            return NumericSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let data = Data::new(values.to_vec());
        let mean = data.mean().unwrap_or(f64::NAN);
        let std = if n > 1 {
            data.std_dev().unwrap_or(f64::NAN)
        } else {
            f64::NAN
        };

        NumericSummary {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Count, distinct count and most frequent value of a text column.
    ///
    /// Ties for the most frequent value go to the first one seen.
    pub fn describe_categorical(values: &[Option<String>]) -> CategoricalSummary {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for v in values.iter().flatten() {
            let entry = counts.entry(v.as_str()).or_insert(0);
            if *entry == 0 {
                first_seen.push(v.as_str());
            }
            *entry += 1;
        }

        let mut top: Option<(&str, usize)> = None;
        for v in &first_seen {
            let c = counts[v];
            if top.map_or(true, |(_, best)| c > best) {
                top = Some((*v, c));
            }
        }

        CategoricalSummary {
            count: values.iter().flatten().count(),
            unique: first_seen.len(),
            top: top.map(|(v, _)| v.to_string()),
            freq: top.map_or(0, |(_, c)| c),
        }
    }

    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    fn summarize_column(df: &DataFrame, name: &str) -> Option<ColumnSummary> {
        let col = df.column(name).ok()?;
        let dtype = col.dtype().clone();

        let kind = if Self::is_numeric(&dtype) {
            let as_f64 = col.cast(&DataType::Float64).ok()?;
            let values: Vec<f64> = as_f64
                .f64()
                .ok()?
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect();
            SummaryKind::Numeric(Self::describe_numeric(&values))
        } else {
            let values = DataLoader::string_values(df, name)?;
            SummaryKind::Categorical(Self::describe_categorical(&values))
        };

        Some(ColumnSummary {
            column: name.to_string(),
            dtype: dtype.to_string(),
            nulls: col.null_count(),
            kind,
        })
    }

    /// Summarize every column in parallel, preserving column order.
    pub fn summarize(df: &DataFrame) -> Vec<ColumnSummary> {
        let names = DataLoader::column_names(df);

        names
            .par_iter()
            .filter_map(|name| Self::summarize_column(df, name))
            .collect()
    }
}
