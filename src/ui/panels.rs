use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use rusty_storefront::data::filter::FilterDimension;

use crate::state::AppState;
use crate::ui::format;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            if let (Some((lo, hi)), Some((mut start, mut end))) =
                (dataset.date_bounds, state.filters.date_range)
            {
                ui.strong("Date range");
                let mut changed = false;
                egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                    ui.label("From");
                    ui.push_id("start_date", |ui: &mut Ui| {
                        changed |= ui.add(DatePickerButton::new(&mut start)).changed();
                    });
                    ui.end_row();
                    ui.label("To");
                    ui.push_id("end_date", |ui: &mut Ui| {
                        changed |= ui.add(DatePickerButton::new(&mut end)).changed();
                    });
                    ui.end_row();
                });
                ui.label(
                    RichText::new(format!("Data covers {lo} to {hi}"))
                        .small()
                        .color(Color32::GRAY),
                );
                if changed {
                    state.set_date_range(start, end);
                }
                ui.separator();
            }

            // ---- Per-dimension filter widgets (collapsible) ----
            for dim in FilterDimension::ALL {
                let all_values = dim.domain(&dataset);
                let Some(selected) = state.filters.selected(dim) else {
                    continue;
                };

                // Show count of selected / total in the header
                let header_text = format!("{}  ({}/{})", dim.label(), selected.len(), all_values.len());
                let mut toggled: Option<String> = None;

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        // Re-read after potential mutation from All/None
                        let Some(selected) = state.filters.selected(dim) else {
                            return;
                        };
                        let colors = match dim {
                            FilterDimension::Region => state.region_colors.as_ref(),
                            FilterDimension::Category => state.category_colors.as_ref(),
                            FilterDimension::CustomerType => None,
                        };

                        for val in all_values {
                            let mut text = RichText::new(val);
                            if let Some(cm) = colors {
                                text = text.color(cm.color_for(val));
                            }
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, text).changed() {
                                toggled = Some(val.clone());
                            }
                        }
                    });

                if let Some(val) = toggled {
                    state.toggle_filter_value(dim, &val);
                }
            }

            ui.separator();
            let is_default = state.filters.is_default_for(&dataset);
            if ui
                .add_enabled(!is_default, egui::Button::new("Reset filters"))
                .clicked()
            {
                state.reset_filters();
            }
            ui.label(format!(
                "{} of {} rows match",
                format::count(state.visible_rows()),
                format::count(dataset.len())
            ));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open transactions…").clicked() {
                ui.close_menu();
                if let Some(path) = pick_transactions_file() {
                    open_dataset(state, path);
                }
            }
            if ui.button("Open KPI sheet…").clicked() {
                ui.close_menu();
                if let Some(path) = pick_kpi_file() {
                    open_kpis(state, path);
                }
            }
            ui.separator();
            let can_reload = state.data_path.is_some() || state.kpi_path.is_some();
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                ui.close_menu();
                if let Err(e) = state.reload() {
                    log::error!("Reload failed: {e:#}");
                }
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                format::count(ds.len()),
                format::count(state.visible_rows())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_transactions_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open transactions")
        .add_filter("Supported files", &["csv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

fn pick_kpi_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open KPI sheet")
        .add_filter("CSV", &["csv"])
        .pick_file()
}

pub fn open_dataset(state: &mut AppState, path: PathBuf) {
    match state.open_dataset(&path) {
        Ok(()) => {
            if let Some(ds) = &state.dataset {
                log::info!(
                    "Loaded {} transactions ({} regions, {} categories)",
                    ds.len(),
                    ds.regions.len(),
                    ds.categories.len()
                );
            }
        }
        Err(e) => log::error!("Failed to load transactions: {e:#}"),
    }
}

pub fn open_kpis(state: &mut AppState, path: PathBuf) {
    match state.open_kpis(&path) {
        Ok(()) => log::info!("Loaded KPI sheet from {}", path.display()),
        Err(e) => log::error!("Failed to load KPI sheet: {e:#}"),
    }
}
