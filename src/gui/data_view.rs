//! Data View Widget
//! Preview rows, column listing and summary statistics of the current view.

use egui::{Color32, RichText, ScrollArea};
use people_dashboard::dashboard::{ColumnInfo, DashboardView};
use people_dashboard::data::DataLoader;
use people_dashboard::stats::{ColumnSummary, SummaryKind};
use polars::prelude::DataFrame;

const CELL_MAX_CHARS: usize = 40;

/// Tables shown below or instead of the charts.
pub struct DataView;

impl DataView {
    /// First rows of the redacted view as a striped grid.
    pub fn show_preview(ui: &mut egui::Ui, view: &DashboardView, rows: usize) {
        let preview = view.preview(rows);
        ui.label(
            RichText::new(format!(
                "Vista previa ({} de {} filas)",
                preview.height(),
                view.table.height()
            ))
            .size(14.0)
            .strong(),
        );
        ui.add_space(5.0);

        if preview.width() == 0 {
            ui.label(RichText::new("No hay columnas para mostrar").color(Color32::GRAY));
            return;
        }

        let cells = Self::string_cells(&preview);
        ScrollArea::both()
            .id_salt("preview_table")
            .max_height(400.0)
            .show(ui, |ui| {
                egui::Grid::new("preview_grid")
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for name in preview.get_column_names() {
                            ui.label(RichText::new(name.as_str()).strong());
                        }
                        ui.end_row();

                        for row in 0..preview.height() {
                            for column in &cells {
                                let text = column
                                    .get(row)
                                    .and_then(|v| v.as_deref())
                                    .map(Self::truncate)
                                    .unwrap_or_default();
                                ui.label(text);
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Every visible column with its dtype and null count.
    pub fn show_columns(ui: &mut egui::Ui, infos: &[ColumnInfo]) {
        ui.label(
            RichText::new(format!("Columnas disponibles ({})", infos.len()))
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);

        egui::Grid::new("column_grid")
            .striped(true)
            .spacing([20.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Columna").strong());
                ui.label(RichText::new("Tipo").strong());
                ui.label(RichText::new("Nulos").strong());
                ui.end_row();

                for info in infos {
                    ui.label(info.name.as_str());
                    ui.label(RichText::new(&info.dtype).color(Color32::GRAY));
                    ui.label(info.nulls.to_string());
                    ui.end_row();
                }
            });
    }

    /// Descriptive statistics, numeric and text columns in separate tables.
    pub fn show_summary(ui: &mut egui::Ui, summaries: &[ColumnSummary]) {
        ui.label(RichText::new("Estadísticas descriptivas").size(14.0).strong());
        ui.add_space(5.0);

        ScrollArea::horizontal()
            .id_salt("summary_numeric")
            .show(ui, |ui| {
                egui::Grid::new("summary_numeric_grid")
                    .striped(true)
                    .spacing([15.0, 4.0])
                    .show(ui, |ui| {
                        for header in [
                            "Columna", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
                        ] {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for summary in summaries {
                            if let SummaryKind::Numeric(s) = &summary.kind {
                                ui.label(summary.column.as_str());
                                ui.label(s.count.to_string());
                                for value in [s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max]
                                {
                                    ui.label(Self::format_number(value));
                                }
                                ui.end_row();
                            }
                        }
                    });
            });

        ui.add_space(15.0);

        egui::Grid::new("summary_text_grid")
            .striped(true)
            .spacing([15.0, 4.0])
            .show(ui, |ui| {
                for header in ["Columna", "count", "unique", "top", "freq"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();

                for summary in summaries {
                    if let SummaryKind::Categorical(s) = &summary.kind {
                        ui.label(summary.column.as_str());
                        ui.label(s.count.to_string());
                        ui.label(s.unique.to_string());
                        ui.label(s.top.as_deref().map(Self::truncate).unwrap_or_default());
                        ui.label(s.freq.to_string());
                        ui.end_row();
                    }
                }
            });
    }

    fn string_cells(df: &DataFrame) -> Vec<Vec<Option<String>>> {
        df.get_column_names()
            .iter()
            .map(|name| DataLoader::string_values(df, name.as_str()).unwrap_or_default())
            .collect()
    }

    fn truncate(text: &str) -> String {
        if text.chars().count() > CELL_MAX_CHARS {
            let head: String = text.chars().take(CELL_MAX_CHARS).collect();
            format!("{}…", head)
        } else {
            text.to_string()
        }
    }

    fn format_number(value: f64) -> String {
        if value.is_nan() {
            "-".to_string()
        } else {
            format!("{:.2}", value)
        }
    }
}
