use std::collections::BTreeSet;

use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::color::{self, BOX_COLOR, ColorMap, HISTOGRAM_COLOR};
use crate::data::charts::{BoxChart, HistogramChart, PieChart, ScatterChart};
use crate::data::model::CellValue;
use crate::data::stats::CorrelationMatrix;

const PLOT_HEIGHT: f32 = 320.0;
const HEATMAP_CELL: egui::Vec2 = egui::vec2(64.0, 28.0);

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, chart: &HistogramChart) {
    let bars: Vec<Bar> = chart
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.3} to {:.3}", b.start, b.end))
        })
        .collect();

    Plot::new("histogram_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.column.as_str())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(HISTOGRAM_COLOR)
                    .name(chart.column.as_str()),
            );
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

pub fn box_plot(ui: &mut Ui, chart: &BoxChart) {
    let s = &chart.summary;
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
    )
    .name(chart.column.as_str())
    .box_width(0.5)
    .whisker_width(0.25);

    Plot::new("box_plot")
        .height(PLOT_HEIGHT)
        .y_axis_label(chart.column.as_str())
        .allow_scroll(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).color(BOX_COLOR).vertical());
            if !s.outliers.is_empty() {
                let outliers: PlotPoints = s.outliers.iter().map(|v| [0.0, *v]).collect();
                plot_ui.points(
                    Points::new(outliers)
                        .color(BOX_COLOR)
                        .radius(3.0)
                        .name("outliers"),
                );
            }
        });

    ui.label(format!(
        "median {}   mean {}   IQR {}   outliers {}",
        format_stat(Some(s.median)),
        format_stat(Some(s.mean)),
        format_stat(Some(s.q3 - s.q1)),
        s.outliers.len()
    ));
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::ScrollArea::horizontal()
        .id_salt("heatmap_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("correlation_grid")
                .spacing([2.0, 2.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for name in &matrix.columns {
                        ui.strong(name);
                    }
                    ui.end_row();

                    for (i, row_name) in matrix.columns.iter().enumerate() {
                        ui.strong(row_name);
                        for j in 0..matrix.size() {
                            heatmap_cell(
                                ui,
                                matrix.get(i, j),
                                &matrix.columns[i],
                                &matrix.columns[j],
                            );
                        }
                        ui.end_row();
                    }
                });
        });

    // colour legend
    ui.horizontal(|ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("-1 ");
        for step in 0..=20 {
            let r = -1.0 + step as f64 * 0.1;
            let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 12.0), Sense::hover());
            ui.painter().rect_filled(rect, 0.0, color::correlation_color(r));
        }
        ui.label(" +1");
    });
}

fn heatmap_cell(ui: &mut Ui, value: Option<f64>, row: &str, col: &str) {
    let (rect, response) = ui.allocate_exact_size(HEATMAP_CELL, Sense::hover());
    let (fill, text) = match value {
        Some(r) => (color::correlation_color(r), format!("{r:.2}")),
        None => (Color32::from_gray(70), "n/a".to_string()),
    };
    let painter = ui.painter();
    painter.rect_filled(rect, 2.0, fill);
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::monospace(12.0),
        color::text_color_on(fill),
    );
    response.on_hover_text(format!("{row} / {col}: {}", format_stat(value)));
}

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

pub fn scatter(ui: &mut Ui, chart: &ScatterChart) {
    let color_map = chart.color.is_some().then(|| {
        let values: BTreeSet<CellValue> = chart
            .groups
            .iter()
            .filter_map(|g| g.value.clone())
            .collect();
        ColorMap::new(&values)
    });

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x.as_str())
        .y_axis_label(chart.y.as_str())
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for group in &chart.groups {
                let color = match (&color_map, &group.value) {
                    (Some(cm), Some(value)) => cm.color_for(value),
                    _ => HISTOGRAM_COLOR,
                };
                let points: PlotPoints = group.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(group.label())
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

pub fn pie(ui: &mut Ui, chart: &PieChart) {
    let colors = color::generate_palette(chart.slices.len());

    Plot::new("pie_chart")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (slice, fill) in chart.slices.iter().zip(colors) {
                let outline: PlotPoints = slice.outline(128).into_iter().collect();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .fill_color(fill)
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(format!("{} ({})", slice.label, slice.count)),
                );
                // skip labels on slivers
                if slice.fraction >= 0.04 {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::from(slice.label_anchor(0.65)),
                            format!("{:.1}%", slice.fraction * 100.0),
                        )
                        .color(color::text_color_on(fill)),
                    );
                }
            }
        });

    ui.label(format!(
        "{} distinct values over {} rows",
        chart.slices.len(),
        chart.total
    ));
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Four decimals with trailing zeros trimmed; undefined values read "NaN".
pub fn format_stat(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "NaN".to_string();
    };
    let text = format!("{v:.4}");
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text.as_str()
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
