//! Chart Viewer Widget
//! Central scrollable panel with notices, chart cards and the data tables.
//! Chart cards wrap into as many columns as the available width allows.

use crate::gui::DataView;
use egui::{Color32, RichText, ScrollArea};
use people_dashboard::charts::{ChartData, ChartPlotter};
use people_dashboard::dashboard::{DashboardView, Notice, ViewMode};

/// Chart card configuration
const CHART_SPACING: f32 = 15.0;
const CARD_WIDTH: f32 = 560.0;
const PLOT_HEIGHT: f32 = 300.0;

/// Central panel for the current dashboard view.
pub struct ChartViewer;

impl ChartViewer {
    /// Draw the view for the selected mode.
    pub fn show(ui: &mut egui::Ui, view: &DashboardView, mode: ViewMode, preview_rows: usize) {
        Self::draw_header(ui, view);
        Self::draw_notices(ui, &view.notices);
        ui.add_space(8.0);

        ScrollArea::vertical()
            .id_salt("main_view")
            .auto_shrink([false, false])
            .show(ui, |ui| match mode {
                ViewMode::General => {
                    Self::draw_chart_grid(ui, &view.charts);
                    ui.add_space(CHART_SPACING);
                    ui.separator();
                    DataView::show_preview(ui, view, preview_rows);
                }
                ViewMode::AllColumns => {
                    DataView::show_columns(ui, &view.column_infos());
                    ui.add_space(CHART_SPACING);
                    ui.separator();
                    DataView::show_preview(ui, view, preview_rows);
                }
                ViewMode::Summary => {
                    DataView::show_summary(ui, &view.summary());
                }
            });
    }

    fn draw_header(ui: &mut egui::Ui, view: &DashboardView) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Dashboard de Personas").size(22.0).strong());
            ui.add_space(20.0);
            ui.label(
                RichText::new(format!(
                    "{} de {} colaboradores",
                    view.table.height(),
                    view.total_rows
                ))
                .size(14.0)
                .color(Color32::GRAY),
            );
        });
        ui.separator();
    }

    fn draw_notices(ui: &mut egui::Ui, notices: &[Notice]) {
        for notice in notices {
            let (icon, color) = if notice.is_warning() {
                ("⚠", Color32::from_rgb(243, 156, 18))
            } else {
                ("ℹ", Color32::from_rgb(52, 152, 219))
            };
            ui.label(RichText::new(format!("{} {}", icon, notice.message())).color(color));
        }
    }

    /// Chart cards in a responsive grid.
    fn draw_chart_grid(ui: &mut egui::Ui, charts: &[ChartData]) {
        let avail_width = ui.available_width();
        let card_total_width = CARD_WIDTH + CHART_SPACING;
        let num_columns = ((avail_width / card_total_width).floor() as usize).max(1);

        for row in charts.chunks(num_columns) {
            ui.horizontal_top(|ui| {
                for chart in row {
                    Self::draw_chart_card(ui, chart);
                    ui.add_space(CHART_SPACING);
                }
            });
            ui.add_space(CHART_SPACING);
        }
    }

    /// Draw a single chart card with fixed width
    fn draw_chart_card(ui: &mut egui::Ui, chart: &ChartData) {
        let border_color = if chart.is_available() {
            Color32::from_rgb(100, 149, 237)
        } else {
            Color32::GRAY
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH - 24.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(chart.title.as_str()).size(16.0).strong());
                    ui.add_space(8.0);
                    ChartPlotter::draw_chart(ui, chart, PLOT_HEIGHT);
                });
            });
    }
}
