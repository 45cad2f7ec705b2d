use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoints, VLine};

use rusty_storefront::analytics::customers::{ChurnSummary, ParetoCurve};
use rusty_storefront::analytics::grouping::CustomerSegment;

use crate::ui::charts::{self, Series, CHART_HEIGHT};
use crate::ui::format::{count, money, percent};
use crate::state::AppState;

const CURVE: Color32 = Color32::from_rgb(148, 103, 189);
const REFERENCE: Color32 = Color32::from_rgb(214, 39, 40);

/// Customer insights tab: segments, Pareto concentration, churn risk.
pub fn show(ui: &mut Ui, state: &AppState) {
    let Some(snapshot) = &state.snapshot else {
        return;
    };

    ui.columns(2, |cols| {
        cols[0].push_id("segments", |ui: &mut Ui| {
            charts::chart_title(ui, "New vs Repeat Customers");
            match &snapshot.segments {
                Some(segments) => segment_chart(ui, segments),
                None => charts::empty_chart(ui, "customer_type column not present."),
            }
        });
        cols[1].push_id("pareto", |ui: &mut Ui| {
            charts::chart_title(ui, "Pareto Curve: Customer Contribution");
            pareto_chart(ui, &snapshot.pareto);
        });
    });

    ui.separator();
    charts::chart_title(ui, "Churn Risk");
    match &snapshot.churn {
        Some(churn) => churn_section(ui, churn),
        None => charts::empty_chart(ui, "No customers match the current filters."),
    }
}

fn segment_chart(ui: &mut Ui, segments: &[CustomerSegment]) {
    let categories: Vec<String> = segments.iter().map(|s| s.customer_type.clone()).collect();
    let series = [
        Series {
            name: "Revenue",
            values: segments.iter().map(|s| s.revenue).collect(),
            color: Color32::from_rgb(31, 119, 180),
        },
        Series {
            name: "Profit",
            values: segments.iter().map(|s| s.profit).collect(),
            color: Color32::from_rgb(44, 160, 44),
        },
    ];
    charts::grouped_bar_chart(ui, "segments_plot", &categories, &series);
    for s in segments {
        ui.label(format!("{}: {} customers", s.customer_type, count(s.customers)));
    }
}

fn pareto_chart(ui: &mut Ui, curve: &ParetoCurve) {
    if curve.points.is_empty() {
        charts::empty_chart(ui, "No data for the current filters.");
        return;
    }

    let points: PlotPoints = curve
        .points
        .iter()
        .map(|p| [p.rank as f64, p.cumulative_pct])
        .collect();

    Plot::new("pareto_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Top N Customers")
        .y_axis_label("Cumulative Revenue %")
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Cumulative %").color(CURVE).width(2.0));
            plot_ui.hline(HLine::new(80.0).name("80% of revenue").color(REFERENCE));
        });

    ui.label(format!(
        "Showing the top {} of {} customers ({} total revenue).",
        count(curve.points.len()),
        count(curve.total_customers),
        money(curve.total_revenue)
    ));
}

fn churn_section(ui: &mut Ui, churn: &ChurnSummary) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        charts::metric_card(
            ui,
            "Median Days Since Order",
            &format!("{:.0} days", churn.median_days),
            &format!("as of {}", churn.reference_date),
        );
        charts::metric_card(
            ui,
            "At-Risk Customers",
            &count(churn.at_risk_count),
            "Above the median",
        );
        charts::metric_card(
            ui,
            "% At Risk",
            &percent(churn.at_risk_pct, 1),
            &format!("of {} customers", count(churn.total_customers)),
        );
    });

    let bars: Vec<Bar> = churn
        .histogram
        .iter()
        .map(|bin| {
            Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                .width((bin.end - bin.start).max(0.5))
                .name(format!("{:.0}-{:.0} days", bin.start, bin.end))
        })
        .collect();

    ui.push_id("churn_histogram", |ui: &mut Ui| {
        Plot::new("churn_plot")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Days since last order")
            .y_axis_label("Customers")
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name("Customers")
                        .color(Color32::from_rgb(255, 127, 14)),
                );
                plot_ui.vline(VLine::new(churn.median_days).name("Median").color(REFERENCE));
            });
    });
}
