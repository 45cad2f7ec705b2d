use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use rusty_storefront::analytics::grouping::{sorted_by, GroupMetric, GroupSummary};

use crate::color::{self, ColorMap};
use crate::state::AppState;
use crate::ui::charts::{self, BarDatum};
use crate::ui::format::{count, money, money_cents, percent};

/// Regional analysis tab: one bar chart per metric plus the metrics table.
pub fn show(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    let regions = &snapshot.by_region;
    if regions.is_empty() {
        charts::empty_chart(ui, "No regions match the current filters.");
        return;
    }

    ui.columns(3, |cols| {
        cols[0].push_id("region_revenue", |ui: &mut Ui| {
            charts::chart_title(ui, "Revenue by Region");
            metric_chart(ui, regions, GroupMetric::Revenue, state.region_colors.as_ref());
        });
        cols[1].push_id("region_profit", |ui: &mut Ui| {
            charts::chart_title(ui, "Profit by Region");
            metric_chart(ui, regions, GroupMetric::Profit, None);
        });
        cols[2].push_id("region_margin", |ui: &mut Ui| {
            charts::chart_title(ui, "Profit Margin by Region");
            metric_chart(ui, regions, GroupMetric::Margin, None);
        });
    });

    ui.separator();
    charts::chart_title(ui, "Regional Metrics");
    ui.push_id("region_table", |ui: &mut Ui| {
        metrics_table(ui, &sorted_by(regions, GroupMetric::Revenue));
    });
}

/// Bars sorted descending by `metric`; signed metrics use the diverging scale.
fn metric_chart(ui: &mut Ui, groups: &[GroupSummary], metric: GroupMetric, colors: Option<&ColorMap>) {
    let sorted = sorted_by(groups, metric);
    let (min, max) = sorted
        .iter()
        .map(|g| metric.value(g))
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let data: Vec<BarDatum> = sorted
        .iter()
        .map(|g| {
            let value = metric.value(g);
            BarDatum {
                label: g.key.clone(),
                value,
                color: match colors {
                    Some(map) => map.color_for(&g.key),
                    None => color::diverging(value, min, max),
                },
            }
        })
        .collect();

    let axis = match metric {
        GroupMetric::Revenue => "Revenue ($)",
        GroupMetric::Profit => "Profit ($)",
        GroupMetric::Margin => "Margin (%)",
    };
    charts::bar_chart(ui, "region_metric_plot", axis, &data);
}

fn metrics_table(ui: &mut Ui, groups: &[GroupSummary]) {
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(100.0), 7)
        .header(20.0, |mut header| {
            for title in [
                "Region",
                "Revenue",
                "Profit",
                "Orders",
                "Customers",
                "Profit Margin",
                "Avg Order Value",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for g in groups {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&g.key);
                    });
                    row.col(|ui| {
                        ui.label(money(g.revenue));
                    });
                    row.col(|ui| {
                        ui.label(money(g.profit));
                    });
                    row.col(|ui| {
                        ui.label(count(g.orders));
                    });
                    row.col(|ui| {
                        ui.label(count(g.customers));
                    });
                    row.col(|ui| {
                        ui.label(percent(g.profit_margin_pct, 2));
                    });
                    row.col(|ui| {
                        ui.label(money_cents(g.avg_order_value));
                    });
                });
            }
        });
}
