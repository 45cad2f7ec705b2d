use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};

use rusty_storefront::analytics::discount::DiscountBand;

use crate::color;
use crate::state::AppState;
use crate::ui::charts::{self, BarDatum, Series};
use crate::ui::format::{count, money, money_cents, percent};

/// Discount impact tab. Needs the `Discount` column.
pub fn show(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };
    let Some(bands) = &snapshot.discount else {
        charts::empty_chart(ui, "Discount column not present.");
        return;
    };
    if bands.is_empty() {
        charts::empty_chart(ui, "No data for the current filters.");
        return;
    }

    let (min_margin, max_margin) = bands
        .iter()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), b| {
            (lo.min(b.profit_margin_pct), hi.max(b.profit_margin_pct))
        });
    let max_orders = bands.iter().map(|b| b.orders).max().unwrap_or(0) as f64;

    ui.columns(2, |cols| {
        cols[0].push_id("discount_margin", |ui: &mut Ui| {
            charts::chart_title(ui, "Profit Margin by Discount Level");
            let data: Vec<BarDatum> = bands
                .iter()
                .map(|b| BarDatum {
                    label: b.label.to_string(),
                    value: b.profit_margin_pct,
                    color: color::diverging(b.profit_margin_pct, min_margin, max_margin),
                })
                .collect();
            charts::bar_chart(ui, "discount_margin_plot", "Margin (%)", &data);
        });
        cols[1].push_id("discount_orders", |ui: &mut Ui| {
            charts::chart_title(ui, "Order Volume by Discount Level");
            let data: Vec<BarDatum> = bands
                .iter()
                .map(|b| BarDatum {
                    label: b.label.to_string(),
                    value: b.orders as f64,
                    color: color::sequential(b.orders as f64, max_orders),
                })
                .collect();
            charts::bar_chart(ui, "discount_orders_plot", "Line items", &data);
        });
    });

    ui.separator();
    charts::chart_title(ui, "Revenue vs Profit by Discount Level");
    let categories: Vec<String> = bands.iter().map(|b| b.label.to_string()).collect();
    let series = [
        Series {
            name: "Revenue",
            values: bands.iter().map(|b| b.revenue).collect(),
            color: Color32::from_rgb(31, 119, 180),
        },
        Series {
            name: "Profit",
            values: bands.iter().map(|b| b.profit).collect(),
            color: Color32::from_rgb(44, 160, 44),
        },
    ];
    ui.push_id("discount_revenue_profit", |ui: &mut Ui| {
        charts::grouped_bar_chart(ui, "discount_revenue_profit_plot", &categories, &series);
    });

    ui.separator();
    charts::chart_title(ui, "Detailed Discount Analysis");
    ui.push_id("discount_table", |ui: &mut Ui| detail_table(ui, bands));
}

fn detail_table(ui: &mut Ui, bands: &[DiscountBand]) {
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(110.0), 6)
        .header(20.0, |mut header| {
            for title in [
                "Discount Level",
                "Line items",
                "Revenue",
                "Profit",
                "Avg Order Value",
                "Profit Margin",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for b in bands {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(b.label);
                    });
                    row.col(|ui| {
                        ui.label(count(b.orders));
                    });
                    row.col(|ui| {
                        ui.label(money(b.revenue));
                    });
                    row.col(|ui| {
                        ui.label(money(b.profit));
                    });
                    row.col(|ui| {
                        ui.label(money_cents(b.avg_order_value));
                    });
                    row.col(|ui| {
                        ui.label(percent(b.profit_margin_pct, 2));
                    });
                });
            }
        });
}
