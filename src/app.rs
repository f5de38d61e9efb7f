use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: every section, top to bottom ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(frame) = self.state.frame.take() else {
                let hint = if self.state.table.is_some() {
                    "This file cannot be shown  (File → Open… another)"
                } else {
                    "Open a customer data file  (File → Open…)"
                };
                ui.centered_and_justified(|ui| {
                    ui.heading(hint);
                });
                return;
            };

            let changed = panels::dashboard(ui, &mut self.state, &frame);
            self.state.frame = Some(frame);

            // Any widget change re-runs the whole chain.
            if changed {
                self.state.rerun();
            }
        });
    }
}
