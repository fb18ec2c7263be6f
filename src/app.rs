use eframe::egui;

use crate::config::Config;
use crate::data::loader::DatasetCache;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    cache: &'static DatasetCache,
}

impl DashboardApp {
    /// Open the configured dataset through the process-wide cache.
    pub fn new(config: &Config) -> Self {
        let cache = DatasetCache::global();
        let mut state = AppState::default();
        state.open(cache, &config.data);
        Self { state, cache }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, self.cache);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::tab_strip(ui, &mut self.state);
            ui.separator();
            charts::active_tab(ui, &mut self.state);
        });
    }
}
