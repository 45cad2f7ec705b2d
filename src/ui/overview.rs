use eframe::egui::{self, Ui};

use rusty_storefront::analytics::grouping::ShareSlice;
use rusty_storefront::KpiSheet;

use crate::color::ColorMap;
use crate::state::AppState;
use crate::ui::charts::{self, BarDatum};
use crate::ui::format::{count, money, money_cents, percent};

/// Overview tab: KPI cards, the precomputed sheet, revenue shares.
pub fn show(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    let k = &snapshot.kpis;

    charts::chart_title(ui, "Key performance indicators");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        charts::metric_card(ui, "Total Revenue", &money(k.total_revenue), "Current period");
        charts::metric_card(
            ui,
            "Total Profit",
            &money(k.total_profit),
            &format!("{} margin", percent(k.profit_margin, 2)),
        );
        charts::metric_card(
            ui,
            "Average Order Value",
            &money_cents(k.average_order_value),
            "Per transaction",
        );
        charts::metric_card(ui, "Total Orders", &count(k.order_count), "Unique transactions");
    });
    ui.horizontal_wrapped(|ui: &mut Ui| {
        charts::metric_card(ui, "Unique Customers", &count(k.unique_customers), "Total customers");
        charts::metric_card(
            ui,
            "Revenue Per Customer",
            &money_cents(k.revenue_per_customer),
            "Lifetime value",
        );
        charts::metric_card(
            ui,
            "Repeat Customer Rate",
            &percent(k.repeat_rate, 1),
            "Retention indicator",
        );
        charts::metric_card(
            ui,
            "Profit Per Order",
            &money_cents(k.profit_per_order),
            "Average profitability",
        );
    });

    if let Some(sheet) = &state.kpis {
        ui.add_space(8.0);
        kpi_sheet(ui, sheet);
    }

    ui.separator();
    ui.columns(2, |cols| {
        cols[0].push_id("category_share", |ui: &mut Ui| {
            charts::chart_title(ui, "Revenue by Category");
            share_chart(ui, "category_share_plot", &snapshot.category_share, state.category_colors.as_ref());
        });
        cols[1].push_id("region_share", |ui: &mut Ui| {
            charts::chart_title(ui, "Revenue by Region");
            share_chart(ui, "region_share_plot", &snapshot.region_share, state.region_colors.as_ref());
        });
    });
}

/// Precomputed KPIs, shown as loaded and unaffected by the filters.
fn kpi_sheet(ui: &mut Ui, sheet: &KpiSheet) {
    egui::CollapsingHeader::new("Precomputed KPIs (full dataset)")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("kpi_sheet")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (name, value) in sheet.iter() {
                        ui.label(name);
                        ui.label(value.to_string());
                        ui.end_row();
                    }
                });
        });
}

fn share_chart(ui: &mut Ui, id: &str, slices: &[ShareSlice], colors: Option<&ColorMap>) {
    let data: Vec<BarDatum> = slices
        .iter()
        .map(|s| BarDatum {
            label: format!("{} ({})", s.key, percent(s.share_pct, 1)),
            value: s.revenue,
            color: colors.map_or(egui::Color32::LIGHT_BLUE, |c| c.color_for(&s.key)),
        })
        .collect();
    charts::horizontal_bar_chart(ui, id, "Revenue ($)", &data);
}
