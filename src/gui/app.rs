//! People Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::{Color32, RichText, SidePanel};
use people_dashboard::dashboard::{Dashboard, DashboardView};
use people_dashboard::data::FilterSelection;

/// Loaded session plus the view for the current selection.
struct Session {
    dashboard: Dashboard,
    control_panel: ControlPanel,
    view: DashboardView,
}

impl Session {
    fn new(dashboard: Dashboard) -> Self {
        let control_panel = ControlPanel::new(dashboard.options());
        let view = dashboard.view(&FilterSelection::new());
        Self {
            dashboard,
            control_panel,
            view,
        }
    }

    fn refresh(&mut self) {
        let selection = self.control_panel.selection();
        self.view = self.dashboard.view(&selection);
    }

    /// Save the current view through a file dialog.
    fn handle_download(&mut self) {
        let output_path = match rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(&self.dashboard.config().export_file_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        let selection = self.control_panel.selection();
        match self.dashboard.export_csv(&selection, &output_path) {
            Ok(rows) => self
                .control_panel
                .set_status(&format!("Exportado: {} filas", rows)),
            Err(e) => {
                log::error!("Export to {} failed: {}", output_path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

/// Main application window.
pub struct DashboardApp {
    session: Result<Session, String>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dashboard: anyhow::Result<Dashboard>) -> Self {
        let session = match dashboard {
            Ok(dashboard) => Ok(Session::new(dashboard)),
            Err(e) => {
                log::error!("Startup failed: {:#}", e);
                Err(format!("{:#}", e))
            }
        };
        Self { session }
    }

    fn show_error(ctx: &egui::Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.label(
                    RichText::new("No se pudieron cargar los datos")
                        .size(22.0)
                        .strong()
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(10.0);
                ui.label(RichText::new(message).size(14.0));
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let session = match &mut self.session {
            Ok(session) => session,
            Err(message) => {
                Self::show_error(ctx, message);
                return;
            }
        };

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let row_info = format!("{} registros cargados", session.dashboard.row_count());
                    let action = session.control_panel.show(ui, &row_info);

                    match action {
                        ControlPanelAction::SelectionChanged => session.refresh(),
                        ControlPanelAction::Download => session.handle_download(),
                        ControlPanelAction::ViewModeChanged | ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            ChartViewer::show(
                ui,
                &session.view,
                session.control_panel.view_mode,
                session.dashboard.config().preview_rows,
            );
        });
    }
}
