use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StrokeStatsApp {
    pub state: AppState,
}

impl StrokeStatsApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for StrokeStatsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: region and team inputs ----
        egui::SidePanel::left("input_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: team locations ----
        egui::SidePanel::right("map_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                map::team_map(ui, &self.state);
            });

        // ---- Central panel: results and feature breakdown ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("📊 Descriptive statistics");
                    ui.separator();
                    table::results(ui, &self.state);
                    ui.add_space(12.0);
                    plot::feature_breakdown(ui, &mut self.state);
                });
        });
    }
}
