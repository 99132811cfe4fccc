//! Control Panel Widget
//! Left side panel with the filters, view mode selector and download button.

use egui::{Color32, RichText, ScrollArea};
use people_dashboard::dashboard::ViewMode;
use people_dashboard::data::{FilterField, FilterOptions, FilterSelection};

/// Checkbox state of one sidebar filter.
struct FilterState {
    field: FilterField,
    values: Vec<String>,
    checked: Vec<bool>,
}

impl FilterState {
    fn selected(&self) -> impl Iterator<Item = &String> {
        self.values
            .iter()
            .zip(self.checked.iter())
            .filter(|(_, &on)| on)
            .map(|(v, _)| v)
    }

    fn selected_count(&self) -> usize {
        self.checked.iter().filter(|&&on| on).count()
    }
}

/// Left side control panel with filters and actions.
pub struct ControlPanel {
    filters: Vec<FilterState>,
    pub view_mode: ViewMode,
    pub status: String,
}

impl ControlPanel {
    /// One multi-select per filterable field, nothing selected.
    pub fn new(options: &FilterOptions) -> Self {
        let filters = options
            .fields
            .iter()
            .map(|field| {
                let values = options.values(&field.column).to_vec();
                let checked = vec![false; values.len()];
                FilterState {
                    field: field.clone(),
                    values,
                    checked,
                }
            })
            .collect();

        Self {
            filters,
            view_mode: ViewMode::default(),
            status: "Listo".to_string(),
        }
    }

    /// Current selection. Fields with nothing ticked are left out.
    pub fn selection(&self) -> FilterSelection {
        self.filters
            .iter()
            .filter(|f| f.selected_count() > 0)
            .map(|f| (f.field.column.clone(), f.selected().cloned().collect()))
            .collect()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, row_info: &str) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 People Analytics")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new(row_info).size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔎 Filtros").size(14.0).strong());
        ui.add_space(5.0);

        if self.filters.is_empty() {
            ui.label(RichText::new("No hay campos filtrables").color(Color32::GRAY));
        }

        for filter in &mut self.filters {
            let header = match filter.selected_count() {
                0 => filter.field.label.clone(),
                n => format!("{} ({})", filter.field.label, n),
            };

            egui::CollapsingHeader::new(header)
                .id_salt(&filter.field.column)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.small_button("Todos").clicked() {
                            filter.checked.iter_mut().for_each(|v| *v = true);
                            action = ControlPanelAction::SelectionChanged;
                        }
                        if ui.small_button("Limpiar").clicked() {
                            filter.checked.iter_mut().for_each(|v| *v = false);
                            action = ControlPanelAction::SelectionChanged;
                        }
                    });

                    ScrollArea::vertical()
                        .id_salt(format!("filter_{}", filter.field.column))
                        .max_height(160.0)
                        .show(ui, |ui| {
                            for (value, checked) in
                                filter.values.iter().zip(filter.checked.iter_mut())
                            {
                                if ui.checkbox(checked, value.as_str()).changed() {
                                    action = ControlPanelAction::SelectionChanged;
                                }
                            }
                        });
                });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== View Mode Section =====
        ui.label(RichText::new("⚙️ Vista").size(14.0).strong());
        ui.add_space(5.0);

        for mode in ViewMode::ALL {
            if ui
                .radio_value(&mut self.view_mode, mode, mode.label())
                .changed()
            {
                action = ControlPanelAction::ViewModeChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("⬇ Descargar CSV").size(14.0))
                .min_size(egui::vec2(180.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Download;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Exportado") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ViewModeChanged,
    Download,
}
