use eframe::egui::{self, RichText, Ui};

use crate::state::{AppState, Tab};
use crate::ui::{customers, discount, overview, panels, regional, trends};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StorefrontApp {
    pub state: AppState,
}

impl StorefrontApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for StorefrontApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
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
            tab_bar(ui, &mut self.state.active_tab);
            ui.separator();

            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label(RichText::new("Open a transactions file (File → Open transactions…)").weak());
                });
                return;
            }
            if self.state.visible_rows() == 0 {
                ui.label(RichText::new("No rows match the current filters.").italics());
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| match self.state.active_tab {
                    Tab::Overview => overview::show(ui, &self.state),
                    Tab::SalesTrends => trends::show(ui, &self.state),
                    Tab::CustomerInsights => customers::show(ui, &self.state),
                    Tab::RegionalAnalysis => regional::show(ui, &self.state),
                    Tab::DiscountImpact => discount::show(ui, &self.state),
                });
        });
    }
}

fn tab_bar(ui: &mut Ui, active: &mut Tab) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(active, tab, tab.label());
        }
    });
}
