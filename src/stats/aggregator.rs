//! Aggregator Module
//! Frequency counts and cross-tabulations feeding the dashboard charts.

use crate::data::DataLoader;
use polars::prelude::*;
use std::collections::HashMap;

/// How categories of a count series are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Most frequent first, ties by first appearance, optionally truncated.
    Frequency { top_n: Option<usize> },
    /// Every label in this fixed order, zero-filled.
    Fixed(&'static [&'static str]),
    /// Ascending numeric value; non-numeric labels last.
    Numeric,
}

/// Frequency counts for one categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCounts {
    pub column: String,
    pub categories: Vec<String>,
    pub counts: Vec<usize>,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.categories
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

/// Co-occurrence counts of two categorical columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub row_column: String,
    pub col_column: String,
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    /// `cells[r][c]` counts rows with `rows[r]` and `cols[c]`.
    pub cells: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }

    pub fn max_cell(&self) -> usize {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Handles group-by counting.
pub struct Aggregator;

impl Aggregator {
    /// Count non-null values of `column`. `None` if the column is absent.
    pub fn value_counts(
        df: &DataFrame,
        column: &str,
        order: CategoryOrder,
    ) -> Option<CategoryCounts> {
        let values = DataLoader::string_values(df, column)?;
        let (mut categories, mut counts) = Self::count_first_seen(values.iter().flatten());

        match order {
            CategoryOrder::Frequency { top_n } => {
                // Stable sort keeps first-appearance order among ties.
                let mut pairs: Vec<(String, usize)> = categories.into_iter().zip(counts).collect();
                pairs.sort_by(|a, b| b.1.cmp(&a.1));
                if let Some(n) = top_n {
                    pairs.truncate(n);
                }
                (categories, counts) = pairs.into_iter().unzip();
            }
            CategoryOrder::Fixed(labels) => {
                let lookup: HashMap<&str, usize> = categories
                    .iter()
                    .map(String::as_str)
                    .zip(counts.iter().copied())
                    .collect();
                counts = labels
                    .iter()
                    .map(|l| lookup.get(l).copied().unwrap_or(0))
                    .collect();
                categories = labels.iter().map(|l| l.to_string()).collect();
            }
            CategoryOrder::Numeric => {
                let mut pairs: Vec<(String, usize)> = categories.into_iter().zip(counts).collect();
                pairs.sort_by(|a, b| Self::numeric_key(&a.0).total_cmp(&Self::numeric_key(&b.0)));
                (categories, counts) = pairs.into_iter().unzip();
            }
        }

        Some(CategoryCounts {
            column: column.to_string(),
            categories,
            counts,
        })
    }

    /// Cross-tabulate two columns. Rows where either value is null are skipped.
    ///
    /// Without a fixed order, rows and columns follow first appearance.
    pub fn crosstab(
        df: &DataFrame,
        row_column: &str,
        col_column: &str,
        row_order: Option<&'static [&'static str]>,
        col_order: Option<&'static [&'static str]>,
    ) -> Option<CrossTab> {
        let row_values = DataLoader::string_values(df, row_column)?;
        let col_values = DataLoader::string_values(df, col_column)?;

        let pairs: Vec<(&str, &str)> = row_values
            .iter()
            .zip(col_values.iter())
            .filter_map(|(r, c)| Some((r.as_deref()?, c.as_deref()?)))
            .collect();

        let rows = Self::axis(pairs.iter().map(|p| p.0), row_order);
        let cols = Self::axis(pairs.iter().map(|p| p.1), col_order);

        let row_index: HashMap<&str, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.as_str(), i)).collect();
        let col_index: HashMap<&str, usize> =
            cols.iter().enumerate().map(|(i, c)| (c.as_str(), i)).collect();

        let mut cells = vec![vec![0usize; cols.len()]; rows.len()];
        for (r, c) in pairs {
            if let (Some(&ri), Some(&ci)) = (row_index.get(r), col_index.get(c)) {
                cells[ri][ci] += 1;
            }
        }

        Some(CrossTab {
            row_column: row_column.to_string(),
            col_column: col_column.to_string(),
            rows,
            cols,
            cells,
        })
    }

    fn count_first_seen<'a>(values: impl Iterator<Item = &'a String>) -> (Vec<String>, Vec<usize>) {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut categories = Vec::new();
        let mut counts = Vec::new();

        for v in values {
            match index.get(v.as_str()) {
                Some(&i) => counts[i] += 1,
                None => {
                    index.insert(v.as_str(), categories.len());
                    categories.push(v.clone());
                    counts.push(1);
                }
            }
        }

        (categories, counts)
    }

    fn axis<'a>(
        values: impl Iterator<Item = &'a str>,
        fixed: Option<&'static [&'static str]>,
    ) -> Vec<String> {
        match fixed {
            Some(labels) => {
                let present: Vec<&str> = values.collect();
                labels
                    .iter()
                    .filter(|l| present.contains(l))
                    .map(|l| l.to_string())
                    .collect()
            }
            None => {
                let mut seen: Vec<String> = Vec::new();
                for v in values {
                    if !seen.iter().any(|s| s == v) {
                        seen.push(v.to_string());
                    }
                }
                seen
            }
        }
    }

    fn numeric_key(label: &str) -> f64 {
        label.parse::<f64>().unwrap_or(f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::deriver::{AGE_BRACKETS, MONTHS_ES};

    #[test]
    fn frequency_order_breaks_ties_by_first_appearance() {
        let df = df!(
            "PUESTO" => &[
                Some("Analista"),
                Some("Gerente"),
                Some("Cajero"),
                Some("Gerente"),
                None,
                Some("Cajero"),
                Some("Vendedor")
            ]
        )
        .unwrap();

        let order = CategoryOrder::Frequency { top_n: None };
        let counts = Aggregator::value_counts(&df, "PUESTO", order).unwrap();

        assert_eq!(counts.categories, vec!["Gerente", "Cajero", "Analista", "Vendedor"]);
        assert_eq!(counts.counts, vec![2, 2, 1, 1]);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn top_n_truncates() {
        let df = df!("PAIS" => &["Chile", "Peru", "Chile", "Mexico", "Peru", "Chile"]).unwrap();

        let order = CategoryOrder::Frequency { top_n: Some(2) };
        let counts = Aggregator::value_counts(&df, "PAIS", order).unwrap();

        assert_eq!(counts.categories, vec!["Chile", "Peru"]);
        assert_eq!(counts.counts, vec![3, 2]);
    }

    #[test]
    fn fixed_order_is_zero_filled() {
        let df = df!("RANGO_EDAD" => &[Some("36-45"), Some("18-25"), None, Some("36-45")]).unwrap();

        let order = CategoryOrder::Fixed(AGE_BRACKETS);
        let counts = Aggregator::value_counts(&df, "RANGO_EDAD", order).unwrap();

        assert_eq!(counts.categories, AGE_BRACKETS.to_vec());
        assert_eq!(counts.counts, vec![1, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn numeric_order_sorts_years() {
        let df = df!("AÑO" => &[Some(2021i32), Some(2019), None, Some(2021), Some(2020)]).unwrap();

        let counts = Aggregator::value_counts(&df, "AÑO", CategoryOrder::Numeric).unwrap();

        assert_eq!(counts.categories, vec!["2019", "2020", "2021"]);
        assert_eq!(counts.counts, vec![1, 1, 2]);
    }

    #[test]
    fn absent_column_gives_none() {
        let df = df!("PAIS" => &["Chile"]).unwrap();

        assert!(Aggregator::value_counts(&df, "GENERO", CategoryOrder::Numeric).is_none());
        assert!(Aggregator::crosstab(&df, "PAIS", "GENERO", None, None).is_none());
    }

    #[test]
    fn crosstab_fills_missing_combinations_with_zero() {
        let df = df!(
            "UNIDAD" => &[Some("Ventas"), Some("TI"), Some("Ventas"), Some("TI"), None],
            "MES" => &[Some("Marzo"), Some("Enero"), Some("Marzo"), None, Some("Enero")]
        )
        .unwrap();

        let tab = Aggregator::crosstab(&df, "UNIDAD", "MES", None, Some(MONTHS_ES)).unwrap();

        assert_eq!(tab.rows, vec!["Ventas", "TI"]);
        assert_eq!(tab.cols, vec!["Enero", "Marzo"]);
        assert_eq!(tab.cells, vec![vec![0, 2], vec![1, 0]]);
        // Only rows where both values are present are counted.
        assert_eq!(tab.total(), 3);
        assert_eq!(tab.max_cell(), 2);
    }
}
