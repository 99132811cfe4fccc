//! Chart Catalog Module
//! The fixed set of dashboard charts and the data each one needs.

use crate::data::columns::{
    has_column, ColumnMap, FieldRole, AGE_BRACKET_COL, BIRTH_MONTH_COL, HIRE_MONTH_COL,
    HIRE_YEAR_COL,
};
use crate::data::deriver::{AGE_BRACKETS, MONTHS_ES};
use crate::stats::{Aggregator, CategoryCounts, CategoryOrder, CrossTab};
use polars::prelude::*;

/// How a chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Pie,
    Line,
    Heatmap,
    StackedBar,
}

/// Where a chart's column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    Role(FieldRole),
    Derived(&'static str),
}

impl ColumnSource {
    fn resolve<'a>(&self, columns: &'a ColumnMap) -> Option<&'a str> {
        match self {
            ColumnSource::Role(role) => columns.get(*role),
            ColumnSource::Derived(name) => Some(*name),
        }
    }

    fn describe(&self) -> String {
        match self {
            ColumnSource::Role(role) => role.label().to_string(),
            ColumnSource::Derived(name) => name.to_string(),
        }
    }
}

/// What a chart counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSource {
    Single {
        column: ColumnSource,
        order: CategoryOrder,
    },
    Pair {
        rows: ColumnSource,
        cols: ColumnSource,
        row_order: Option<&'static [&'static str]>,
        col_order: Option<&'static [&'static str]>,
    },
}

/// Static description of one dashboard chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: String,
    pub kind: ChartKind,
    pub source: ChartSource,
}

/// Data handed to the plotter.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPayload {
    Counts(CategoryCounts),
    CrossTab(CrossTab),
    /// The chart cannot be drawn; the reason is shown instead.
    Unavailable(String),
}

/// A chart ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub id: &'static str,
    pub title: String,
    pub kind: ChartKind,
    pub payload: ChartPayload,
}

impl ChartData {
    pub fn is_available(&self) -> bool {
        !matches!(self.payload, ChartPayload::Unavailable(_))
    }
}

/// The dashboard charts in display order. `top_n` caps the job title ranking.
pub fn dashboard_charts(top_n: usize) -> Vec<ChartSpec> {
    vec![
        ChartSpec {
            id: "gender",
            title: "Distribución por género".to_string(),
            kind: ChartKind::Pie,
            source: ChartSource::Single {
                column: ColumnSource::Role(FieldRole::Gender),
                order: CategoryOrder::Frequency { top_n: None },
            },
        },
        ChartSpec {
            id: "business_unit",
            title: "Distribución por Unidad de Negocio".to_string(),
            kind: ChartKind::Bar,
            source: ChartSource::Single {
                column: ColumnSource::Role(FieldRole::BusinessUnit),
                order: CategoryOrder::Frequency { top_n: None },
            },
        },
        ChartSpec {
            id: "birthdays",
            title: "Cumpleaños por mes".to_string(),
            kind: ChartKind::Bar,
            source: ChartSource::Single {
                column: ColumnSource::Derived(BIRTH_MONTH_COL),
                order: CategoryOrder::Fixed(MONTHS_ES),
            },
        },
        ChartSpec {
            id: "top_positions",
            title: format!("Top {} puestos con mayor headcount", top_n),
            kind: ChartKind::HorizontalBar,
            source: ChartSource::Single {
                column: ColumnSource::Role(FieldRole::JobTitle),
                order: CategoryOrder::Frequency { top_n: Some(top_n) },
            },
        },
        ChartSpec {
            id: "hire_seasonality",
            title: "Estacionalidad de ingresos por Unidad de Negocio".to_string(),
            kind: ChartKind::Heatmap,
            source: ChartSource::Pair {
                rows: ColumnSource::Role(FieldRole::BusinessUnit),
                cols: ColumnSource::Derived(HIRE_MONTH_COL),
                row_order: None,
                col_order: Some(MONTHS_ES),
            },
        },
        ChartSpec {
            id: "age_brackets",
            title: "Distribución por rango de edad".to_string(),
            kind: ChartKind::Bar,
            source: ChartSource::Single {
                column: ColumnSource::Derived(AGE_BRACKET_COL),
                order: CategoryOrder::Fixed(AGE_BRACKETS),
            },
        },
        ChartSpec {
            id: "country",
            title: "Headcount por país".to_string(),
            kind: ChartKind::HorizontalBar,
            source: ChartSource::Single {
                column: ColumnSource::Role(FieldRole::Country),
                order: CategoryOrder::Frequency { top_n: None },
            },
        },
        ChartSpec {
            id: "hire_trend",
            title: "Tendencia de ingresos por año".to_string(),
            kind: ChartKind::Line,
            source: ChartSource::Single {
                column: ColumnSource::Derived(HIRE_YEAR_COL),
                order: CategoryOrder::Numeric,
            },
        },
        ChartSpec {
            id: "gender_by_age",
            title: "Distribución por género y rango de edad".to_string(),
            kind: ChartKind::StackedBar,
            source: ChartSource::Pair {
                rows: ColumnSource::Derived(AGE_BRACKET_COL),
                cols: ColumnSource::Role(FieldRole::Gender),
                row_order: Some(AGE_BRACKETS),
                col_order: None,
            },
        },
    ]
}

/// Builds chart data from a (redacted) view.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Build one chart. Missing or empty columns give an `Unavailable` payload.
    pub fn build(spec: &ChartSpec, df: &DataFrame, columns: &ColumnMap) -> ChartData {
        let payload = match spec.source {
            ChartSource::Single { column, order } => match column.resolve(columns) {
                None => Self::missing(&column),
                Some(name) => match Aggregator::value_counts(df, name, order) {
                    Some(counts) if !counts.is_empty() => ChartPayload::Counts(counts),
                    Some(_) => Self::empty(name),
                    None => Self::missing(&column),
                },
            },
            ChartSource::Pair {
                rows,
                cols,
                row_order,
                col_order,
            } => match (rows.resolve(columns), cols.resolve(columns)) {
                (Some(r), Some(c)) => match Aggregator::crosstab(df, r, c, row_order, col_order) {
                    Some(tab) if !tab.is_empty() => ChartPayload::CrossTab(tab),
                    Some(_) => Self::empty(&format!("{} / {}", r, c)),
                    None if !has_column(df, r) => Self::missing(&rows),
                    None => Self::missing(&cols),
                },
                (None, _) => Self::missing(&rows),
                (_, None) => Self::missing(&cols),
            },
        };

        if let ChartPayload::Unavailable(reason) = &payload {
            log::info!("Chart '{}' skipped: {}", spec.id, reason);
        }

        ChartData {
            id: spec.id,
            title: spec.title.clone(),
            kind: spec.kind,
            payload,
        }
    }

    /// Build every chart of the dashboard.
    pub fn build_all(df: &DataFrame, columns: &ColumnMap, top_n: usize) -> Vec<ChartData> {
        dashboard_charts(top_n)
            .iter()
            .map(|spec| Self::build(spec, df, columns))
            .collect()
    }

    fn missing(source: &ColumnSource) -> ChartPayload {
        ChartPayload::Unavailable(format!("Column '{}' is not available", source.describe()))
    }

    fn empty(column: &str) -> ChartPayload {
        ChartPayload::Unavailable(format!("No values in '{}' for the current selection", column))
    }
}
