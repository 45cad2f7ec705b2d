use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use rusty_storefront::analytics::grouping::{MonthlyPoint, ProductSummary};

use crate::color;
use crate::state::AppState;
use crate::ui::charts::{self, BarDatum, CHART_HEIGHT};
use crate::ui::format::{count, money, percent};

const REVENUE: Color32 = Color32::from_rgb(31, 119, 180);
const PROFIT: Color32 = Color32::from_rgb(44, 160, 44);

/// Sales trends tab: monthly series and the best-selling products.
pub fn show(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };

    ui.columns(2, |cols| {
        cols[0].push_id("monthly_revenue", |ui: &mut Ui| {
            charts::chart_title(ui, "Monthly Revenue & Profit");
            monthly_lines(ui, &snapshot.monthly);
        });
        cols[1].push_id("monthly_orders", |ui: &mut Ui| {
            charts::chart_title(ui, "Monthly Order Volume");
            monthly_orders(ui, &snapshot.monthly);
        });
    });

    ui.separator();
    charts::chart_title(ui, "Top 10 Products by Revenue");
    match &snapshot.top_products {
        None => charts::empty_chart(ui, "Product Name column not present."),
        Some(products) => {
            let max_margin = products.iter().map(|p| p.profit_margin_pct.abs()).fold(0.0, f64::max);
            let data: Vec<BarDatum> = products
                .iter()
                .map(|p| BarDatum {
                    label: p.product_name.clone(),
                    value: p.revenue,
                    color: color::diverging(p.profit_margin_pct, -max_margin, max_margin),
                })
                .collect();
            charts::horizontal_bar_chart(ui, "top_products_plot", "Revenue ($)", &data);
            ui.add_space(6.0);
            ui.push_id("top_products_table", |ui: &mut Ui| product_table(ui, products));
        }
    }
}

/// Month label for a plot x coordinate (the point's index).
fn month_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn monthly_lines(ui: &mut Ui, points: &[MonthlyPoint]) {
    if points.is_empty() {
        charts::empty_chart(ui, "No data for the current filters.");
        return;
    }

    let revenue: PlotPoints = points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.revenue])
        .collect();
    let profit: PlotPoints = points
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.profit])
        .collect();

    let labels: Vec<String> = points.iter().map(MonthlyPoint::label).collect();
    Plot::new("monthly_lines_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("USD")
        .label_formatter(move |name, value| {
            let month = month_at(&labels, value.x);
            if name.is_empty() {
                month
            } else {
                format!("{name}\n{month}\n{}", money(value.y))
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(revenue).name("Revenue").color(REVENUE).width(2.0));
            plot_ui.line(Line::new(profit).name("Profit").color(PROFIT).width(2.0));
        });
}

fn monthly_orders(ui: &mut Ui, points: &[MonthlyPoint]) {
    if points.is_empty() {
        charts::empty_chart(ui, "No data for the current filters.");
        return;
    }

    let bars: Vec<Bar> = points
        .iter()
        .enumerate()
        .map(|(i, p)| Bar::new(i as f64, p.orders as f64).name(p.label()).width(0.8))
        .collect();

    Plot::new("monthly_orders_plot")
        .height(CHART_HEIGHT)
        .y_axis_label("Orders")
        .include_y(0.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Orders").color(REVENUE));
        });
}

fn product_table(ui: &mut Ui, products: &[ProductSummary]) {
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(200.0))
        .columns(Column::auto().at_least(90.0), 4)
        .header(20.0, |mut header| {
            for title in ["Product", "Revenue", "Profit", "Line items", "Margin"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for p in products {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&p.product_name);
                    });
                    row.col(|ui| {
                        ui.label(money(p.revenue));
                    });
                    row.col(|ui| {
                        ui.label(money(p.profit));
                    });
                    row.col(|ui| {
                        ui.label(count(p.orders));
                    });
                    row.col(|ui| {
                        ui.label(percent(p.profit_margin_pct, 2));
                    });
                });
            }
        });
}
