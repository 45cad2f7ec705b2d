use eframe::egui::{self, Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Text};

// ---------------------------------------------------------------------------
// Small chart building blocks shared by the tabs
// ---------------------------------------------------------------------------

/// One labelled bar.
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub color: Color32,
}

/// A named series of a grouped bar chart; one value per category.
pub struct Series<'a> {
    pub name: &'a str,
    pub values: Vec<f64>,
    pub color: Color32,
}

pub const CHART_HEIGHT: f32 = 260.0;

/// Section heading used above every chart.
pub fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong().size(15.0));
}

/// Placeholder for charts whose source column is missing or whose view is empty.
pub fn empty_chart(ui: &mut Ui, message: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(message).italics().color(Color32::GRAY));
    ui.add_space(8.0);
}

/// Vertical bars with the category label under each bar.
pub fn bar_chart(ui: &mut Ui, id: &str, y_label: &str, data: &[BarDatum]) {
    if data.is_empty() {
        empty_chart(ui, "No data for the current filters.");
        return;
    }

    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Bar::new(i as f64, d.value)
                .name(&d.label)
                .fill(d.color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .y_axis_label(y_label)
        .show_x(false)
        .allow_scroll(false)
        .allow_drag(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
            for (i, d) in data.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, 0.0), d.label.as_str())
                        .anchor(Align2::CENTER_TOP)
                        .color(Color32::GRAY),
                );
            }
        });
}

/// Horizontal bars, largest at the top, labels at the bar base.
pub fn horizontal_bar_chart(ui: &mut Ui, id: &str, x_label: &str, data: &[BarDatum]) {
    if data.is_empty() {
        empty_chart(ui, "No data for the current filters.");
        return;
    }

    let n = data.len();
    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Bar::new((n - 1 - i) as f64, d.value)
                .name(&d.label)
                .fill(d.color)
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT.max(28.0 * n as f32))
        .x_axis_label(x_label)
        .show_y(false)
        .allow_scroll(false)
        .allow_drag(false)
        .include_x(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(x_label));
            for (i, d) in data.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(0.0, (n - 1 - i) as f64), d.label.as_str())
                        .anchor(Align2::LEFT_CENTER)
                        .color(Color32::WHITE),
                );
            }
        });
}

/// Side-by-side bars of several series per category.
pub fn grouped_bar_chart(ui: &mut Ui, id: &str, categories: &[String], series: &[Series<'_>]) {
    if categories.is_empty() || series.is_empty() {
        empty_chart(ui, "No data for the current filters.");
        return;
    }

    let width = 0.8 / series.len() as f64;
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .show_x(false)
        .allow_scroll(false)
        .allow_drag(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for (s_idx, s) in series.iter().enumerate() {
                let offset = (s_idx as f64 - (series.len() - 1) as f64 / 2.0) * width;
                let bars: Vec<Bar> = s
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| {
                        Bar::new(i as f64 + offset, v)
                            .name(&categories[i])
                            .width(width * 0.95)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(s.name).color(s.color));
            }
            for (i, label) in categories.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(i as f64, 0.0), label.as_str())
                        .anchor(Align2::CENTER_TOP)
                        .color(Color32::GRAY),
                );
            }
        });
}

/// A framed metric: caption, big value and a small grey note.
pub fn metric_card(ui: &mut Ui, caption: &str, value: &str, note: &str) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(180.0);
            ui.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(caption).color(Color32::GRAY));
                ui.label(RichText::new(value).size(22.0).strong());
                ui.label(RichText::new(note).small().color(Color32::GRAY));
            });
        });
}
