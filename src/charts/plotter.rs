//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::{ChartData, ChartKind, ChartPayload};
use crate::stats::{CategoryCounts, CrossTab};
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};
use std::f64::consts::TAU;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Heatmap gradient end points (light to dark).
const HEAT_LOW: Color32 = Color32::from_rgb(232, 245, 233);
const HEAT_HIGH: Color32 = Color32::from_rgb(27, 94, 32);

/// Segments used to approximate a full pie circle.
const PIE_SEGMENTS: usize = 120;

/// Draws dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw any chart, or its "unavailable" notice.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartData, height: f32) {
        match (&chart.payload, chart.kind) {
            (ChartPayload::Unavailable(reason), _) => {
                ui.label(RichText::new(format!("ℹ {}", reason)).color(Color32::GRAY));
            }
            (ChartPayload::Counts(counts), ChartKind::Pie) => {
                Self::draw_pie_chart(ui, chart.id, counts, height)
            }
            (ChartPayload::Counts(counts), ChartKind::HorizontalBar) => {
                Self::draw_bar_chart(ui, chart.id, counts, true, height)
            }
            (ChartPayload::Counts(counts), ChartKind::Line) => {
                Self::draw_line_chart(ui, chart.id, counts, height)
            }
            (ChartPayload::Counts(counts), _) => {
                Self::draw_bar_chart(ui, chart.id, counts, false, height)
            }
            (ChartPayload::CrossTab(tab), ChartKind::StackedBar) => {
                Self::draw_stacked_bar_chart(ui, chart.id, tab, height)
            }
            (ChartPayload::CrossTab(tab), _) => Self::draw_heatmap(ui, tab, height),
        }
    }

    /// Category label for a plot axis position.
    fn axis_label(labels: &[String], value: f64) -> String {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Vertical or horizontal bar chart of category counts.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        counts: &CategoryCounts,
        horizontal: bool,
        height: f32,
    ) {
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(i, (category, count))| {
                Bar::new(i as f64, count as f64)
                    .name(category)
                    .width(0.7)
                    .fill(Self::color(0))
            })
            .collect();

        let mut chart = BarChart::new(bars).color(Self::color(0)).name("Headcount");
        if horizontal {
            chart = chart.horizontal();
        }

        let labels = counts.categories.clone();
        let mut plot = Plot::new(format!("bar_{}", id))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false);

        plot = if horizontal {
            plot.y_axis_formatter(move |mark, _range| Self::axis_label(&labels, mark.value))
                .include_x(0.0)
        } else {
            plot.x_axis_formatter(move |mark, _range| Self::axis_label(&labels, mark.value))
                .include_y(0.0)
        };

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    }

    /// Line chart with markers, used for trends over ordered categories.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, counts: &CategoryCounts, height: f32) {
        let labels = counts.categories.clone();
        let points: Vec<[f64; 2]> = counts
            .counts
            .iter()
            .enumerate()
            .map(|(i, &c)| [i as f64, c as f64])
            .collect();

        Plot::new(format!("line_{}", id))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| Self::axis_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(Self::color(0))
                        .width(2.0)
                        .name("Ingresos"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(Self::color(0)),
                );
            });
    }

    /// Points on the unit circle between two angles, starting at the centre.
    pub fn pie_slice(start: f64, end: f64) -> Vec<[f64; 2]> {
        let steps = (((end - start) / TAU) * PIE_SEGMENTS as f64).ceil().max(1.0) as usize;
        let mut points = vec![[0.0, 0.0]];
        for s in 0..=steps {
            let angle = start + (end - start) * s as f64 / steps as f64;
            points.push([angle.cos(), angle.sin()]);
        }
        points
    }

    /// Pie chart with percentage labels.
    pub fn draw_pie_chart(ui: &mut egui::Ui, id: &str, counts: &CategoryCounts, height: f32) {
        let total = counts.total() as f64;
        if total == 0.0 {
            return;
        }

        Plot::new(format!("pie_{}", id))
            .height(height)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                // Start at twelve o'clock and go clockwise.
                let mut angle = TAU / 4.0;
                for (i, (category, count)) in counts.iter().enumerate() {
                    let share = count as f64 / total;
                    let end = angle - share * TAU;
                    let color = Self::color(i);

                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from_iter(Self::pie_slice(end, angle)))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(category),
                    );

                    let mid = (angle + end) / 2.0;
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.1}%", share * 100.0))
                            .color(Color32::WHITE)
                            .strong(),
                    ));

                    angle = end;
                }
            });
    }

    /// Bars per row category, stacked by column category.
    pub fn draw_stacked_bar_chart(ui: &mut egui::Ui, id: &str, tab: &CrossTab, height: f32) {
        let labels = tab.rows.clone();

        let mut charts: Vec<BarChart> = Vec::with_capacity(tab.cols.len());
        for (c, series) in tab.cols.iter().enumerate() {
            let bars: Vec<Bar> = tab
                .cells
                .iter()
                .enumerate()
                .map(|(r, row)| Bar::new(r as f64, row[c] as f64).width(0.7))
                .collect();

            let chart = BarChart::new(bars).color(Self::color(c)).name(series);
            let below: Vec<&BarChart> = charts.iter().collect();
            let chart = chart.stack_on(&below);
            charts.push(chart);
        }

        Plot::new(format!("stacked_{}", id))
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .legend(Legend::default())
            .x_axis_formatter(move |mark, _range| Self::axis_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Linear blend between the heatmap end colors.
    pub fn heat_color(value: usize, max: usize) -> Color32 {
        let t = if max == 0 {
            0.0
        } else {
            value as f32 / max as f32
        };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(
            lerp(HEAT_LOW.r(), HEAT_HIGH.r()),
            lerp(HEAT_LOW.g(), HEAT_HIGH.g()),
            lerp(HEAT_LOW.b(), HEAT_HIGH.b()),
        )
    }

    /// Annotated heatmap drawn as a grid of colored cells.
    pub fn draw_heatmap(ui: &mut egui::Ui, tab: &CrossTab, height: f32) {
        let max = tab.max_cell();
        let cell = egui::vec2(52.0, 24.0);

        egui::ScrollArea::both()
            .max_height(height)
            .id_salt(format!("heat_{}_{}", tab.row_column, tab.col_column))
            .show(ui, |ui| {
                egui::Grid::new(format!("heat_grid_{}_{}", tab.row_column, tab.col_column))
                    .spacing([2.0, 2.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for col in &tab.cols {
                            let short: String = col.chars().take(3).collect();
                            ui.label(RichText::new(short).size(11.0).strong());
                        }
                        ui.end_row();

                        for (r, row) in tab.rows.iter().enumerate() {
                            ui.label(RichText::new(row).size(11.0));
                            for &value in &tab.cells[r] {
                                let (rect, _) = ui.allocate_exact_size(cell, Sense::hover());
                                let fill = Self::heat_color(value, max);
                                ui.painter().rect_filled(rect, 2.0, fill);

                                let text_color = if value * 2 > max {
                                    Color32::WHITE
                                } else {
                                    Color32::BLACK
                                };
                                ui.painter().text(
                                    rect.center(),
                                    Align2::CENTER_CENTER,
                                    value.to_string(),
                                    FontId::proportional(11.0),
                                    text_color,
                                );
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_label_only_on_integer_marks() {
        let labels = vec!["F".to_string(), "M".to_string()];

        assert_eq!(ChartPlotter::axis_label(&labels, 1.0), "M");
        assert_eq!(ChartPlotter::axis_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::axis_label(&labels, 2.0), "");
        assert_eq!(ChartPlotter::axis_label(&labels, -1.0), "");
    }

    #[test]
    fn pie_slice_starts_at_centre_and_stays_on_circle() {
        let slice = ChartPlotter::pie_slice(0.0, TAU / 4.0);

        assert_eq!(slice[0], [0.0, 0.0]);
        for p in &slice[1..] {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-9);
        }
        let last = slice.last().unwrap();
        assert!(last[0].abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn heat_color_spans_gradient() {
        assert_eq!(ChartPlotter::heat_color(0, 10), HEAT_LOW);
        assert_eq!(ChartPlotter::heat_color(10, 10), HEAT_HIGH);
        assert_eq!(ChartPlotter::heat_color(3, 0), HEAT_LOW);
    }
}
