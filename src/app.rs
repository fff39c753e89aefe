use eframe::egui;

use personality_dashboard::config::DashboardConfig;
use personality_dashboard::data::loader::DataSource;
use personality_dashboard::state::{AppState, View};

use crate::ui::{kpi, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let load_on_start = config.source.load_on_start;
        let url = config.source.url.clone();
        let mut state = AppState::new(config);
        if load_on_start && !url.is_empty() {
            state.load(DataSource::Url(url));
        }
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard or raw table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::banner(ui, &self.state);
            match self.state.view {
                View::Dashboard => {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.heading("Personality Data Dashboard");
                            ui.add_space(6.0);
                            kpi::kpi_row(ui, &self.state);
                            ui.separator();
                            plot::charts(ui, &self.state);
                        });
                }
                View::DatasetPreview => {
                    ui.heading("Full Dataset Preview");
                    ui.add_space(6.0);
                    table::dataset_table(ui, &self.state);
                }
            }
        });
    }
}
