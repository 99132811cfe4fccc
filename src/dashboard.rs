//! Dashboard Session Module
//! Owns the loaded tables and recomputes the view when the selection changes.

use crate::charts::{ChartBuilder, ChartData};
use crate::config::DashboardConfig;
use crate::data::{
    export, redactor, ColumnMap, DataLoader, ExportError, FieldDeriver, FilterEngine,
    FilterOptions, FilterSelection, LoaderError,
};
use crate::stats::{ColumnSummary, SummaryCalculator};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Charts plus a preview of the first rows.
    #[default]
    General,
    /// Every non-sensitive column with its type and null count.
    AllColumns,
    /// Descriptive statistics per column.
    Summary,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::General, ViewMode::AllColumns, ViewMode::Summary];

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::General => "Vista general",
            ViewMode::AllColumns => "Todas las columnas",
            ViewMode::Summary => "Estadísticas",
        }
    }
}

/// User-readable, non-fatal condition shown above the charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The selection matched nothing; the unfiltered table is shown instead.
    AllFilteredOut,
    /// Identity-document columns were hidden.
    Redacted(usize),
    /// Something was wrong with a source column but processing continued.
    Derivation(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::AllFilteredOut => {
                "Ningún registro coincide con los filtros; se muestran todos los datos".to_string()
            }
            Notice::Redacted(n) => format!("{} columna(s) de documento de identidad ocultas", n),
            Notice::Derivation(msg) => msg.clone(),
        }
    }

    pub fn is_warning(&self) -> bool {
        !matches!(self, Notice::Redacted(_))
    }
}

/// Dtype and null count of one column, for the all-columns view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub nulls: usize,
}

/// Everything the presentation shell renders for one selection.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Filtered (or fallback) view with sensitive columns removed.
    pub table: DataFrame,
    /// Rows the selection matched before any fallback.
    pub matched_rows: usize,
    pub total_rows: usize,
    pub charts: Vec<ChartData>,
    pub notices: Vec<Notice>,
}

impl DashboardView {
    /// First `n` rows of the redacted view.
    pub fn preview(&self, n: usize) -> DataFrame {
        self.table.head(Some(n))
    }

    pub fn column_infos(&self) -> Vec<ColumnInfo> {
        self.table
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                nulls: col.null_count(),
            })
            .collect()
    }

    pub fn summary(&self) -> Vec<ColumnSummary> {
        SummaryCalculator::summarize(&self.table)
    }
}

/// One loaded personnel file.
pub struct Dashboard {
    config: DashboardConfig,
    derived: DataFrame,
    columns: ColumnMap,
    warnings: Vec<String>,
    options: FilterOptions,
    sensitive_count: usize,
}

impl Dashboard {
    /// Load, derive and prepare filter options.
    pub fn open(config: DashboardConfig, today: NaiveDate) -> Result<Self, LoaderError> {
        let raw = DataLoader::load_csv(&config.csv_path)?;
        Ok(Self::from_frame(config, &raw, today))
    }

    /// Build a session from an already loaded table.
    pub fn from_frame(config: DashboardConfig, raw: &DataFrame, today: NaiveDate) -> Self {
        let table = FieldDeriver::derive(raw, today);
        let fields = FilterOptions::default_fields(&table.columns, &table.df);
        let options = FilterOptions::from_frame(&table.df, fields);
        let sensitive_count = redactor::sensitive_columns(&table.df).len();

        Self {
            config,
            derived: table.df,
            columns: table.columns,
            warnings: table.warnings,
            options,
            sensitive_count,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn row_count(&self) -> usize {
        self.derived.height()
    }

    /// Apply `selection` and build everything the shell renders.
    pub fn view(&self, selection: &FilterSelection) -> DashboardView {
        let outcome = FilterEngine::apply(&self.derived, selection, &self.options);
        let table = redactor::redact(&outcome.df);
        let charts = ChartBuilder::build_all(&table, &self.columns, self.config.top_n);

        let mut notices = Vec::new();
        if outcome.fell_back {
            notices.push(Notice::AllFilteredOut);
        }
        notices.extend(self.warnings.iter().cloned().map(Notice::Derivation));
        if self.sensitive_count > 0 {
            notices.push(Notice::Redacted(self.sensitive_count));
        }

        DashboardView {
            table,
            matched_rows: outcome.matched_rows,
            total_rows: self.derived.height(),
            charts,
            notices,
        }
    }

    /// Write the filtered view, redacted, to `path`. Returns the rows written.
    pub fn export_csv(
        &self,
        selection: &FilterSelection,
        path: &Path,
    ) -> Result<usize, ExportError> {
        let outcome = FilterEngine::apply(&self.derived, selection, &self.options);
        export::export_safe_csv(&outcome.df, path)
    }
}
