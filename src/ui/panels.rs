use eframe::egui::{self, Color32, RichText, ScrollArea, TextStyle, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::config::AnalyzerConfig;
use crate::data::charts::{self as chart_data, Panel, resolve_column};
use crate::data::model::{CellValue, ColumnPartition, Dataset};
use crate::data::stats;
use crate::state::{AppState, ChartSelection};
use crate::ui::charts::{self, format_stat};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(name)) = (&state.dataset, &state.source_name) {
            ui.label(format!(
                "{name}: {} rows × {} columns",
                ds.n_rows(),
                ds.n_columns()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload your CSV file")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

// ---------------------------------------------------------------------------
// Left side panel – dataset overview
// ---------------------------------------------------------------------------

/// Render the overview metrics and column types.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Dataset Overview");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let overview = stats::overview(dataset);

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Rows", overview.rows);
        metric(ui, "Columns", overview.columns);
        metric(ui, "Missing Values", overview.missing);
    });
    ui.add_space(8.0);

    ui.strong("Column Data Types");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("dtype_grid")
                .striped(true)
                .num_columns(2)
                .show(ui, |ui: &mut Ui| {
                    for (name, dtype) in &overview.dtypes {
                        ui.label(name);
                        ui.monospace(dtype.label());
                        ui.end_row();
                    }
                });
        });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value.to_string()).size(22.0).strong());
    });
    ui.add_space(6.0);
}

// ---------------------------------------------------------------------------
// Central panel – preview, summary, visualizations
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        dataset,
        selection,
        config,
        ..
    } = state;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(
                RichText::new("Dataset Analyzer & Visualizer")
                    .color(Color32::from_rgb(0xFF, 0x4B, 0x4B))
                    .size(28.0),
            );
            ui.label("Upload a CSV file and explore it with rich visualizations.");
            ui.separator();

            let Some(dataset) = dataset.as_ref() else {
                ui.label("Please upload a CSV file to begin  (File → Open…, or drop it here).");
                return;
            };

            ui.heading("Data Preview");
            data_preview(ui, dataset, config.preview_height);
            ui.add_space(12.0);

            ui.heading("Statistical Summary");
            statistical_summary(ui, dataset);
            ui.add_space(12.0);

            ui.separator();
            ui.heading("Visualizations");
            visualizations(ui, dataset, selection, config);
        });
}

fn data_preview(ui: &mut Ui, dataset: &Dataset, height: f32) {
    let n_cols = dataset.n_columns();
    let row_height = ui.text_style_height(&TextStyle::Body) + 4.0;
    let names = dataset.column_names();

    ui.push_id("data_preview", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .column(TableColumn::auto().at_least(32.0))
                .columns(TableColumn::auto().at_least(60.0).clip(true), n_cols)
                .min_scrolled_height(0.0)
                .max_scroll_height(height)
                .header(row_height, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("");
                    });
                    for name in &names {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(row_height, dataset.n_rows(), |mut row| {
                        let r = row.index();
                        row.col(|ui: &mut Ui| {
                            ui.weak(r.to_string());
                        });
                        for c in 0..n_cols {
                            row.col(|ui: &mut Ui| match dataset.cell(r, c) {
                                Some(CellValue::Null) | None => {
                                    ui.weak("NaN");
                                }
                                Some(value) => {
                                    ui.label(value.to_string());
                                }
                            });
                        }
                    });
                });
        });
    });
}

fn statistical_summary(ui: &mut Ui, dataset: &Dataset) {
    if dataset.n_rows() == 0 {
        ui.label("No data: the file has a header but no rows.");
        return;
    }
    let Some(summary) = stats::describe(dataset) else {
        ui.label("No numeric columns to summarise.");
        return;
    };

    ScrollArea::horizontal()
        .id_salt("summary_scroll")
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("describe_grid")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for col in &summary {
                        ui.strong(&col.name);
                    }
                    ui.end_row();

                    let rows: Vec<_> = summary.iter().map(|s| s.rows()).collect();
                    for (idx, (label, _)) in summary[0].rows().iter().enumerate() {
                        ui.strong(*label);
                        for col_rows in &rows {
                            ui.monospace(format_stat(col_rows[idx].1));
                        }
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Chart panels
// ---------------------------------------------------------------------------

fn visualizations(
    ui: &mut Ui,
    dataset: &Dataset,
    selection: &mut ChartSelection,
    config: &AnalyzerConfig,
) {
    let partition = dataset.partition();

    egui::CollapsingHeader::new(RichText::new("Histogram (Numeric Columns)").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            column_picker(
                ui,
                "hist_column",
                "Select column",
                &partition.numeric,
                &mut selection.histogram,
            );
            let panel = chart_data::histogram_panel(
                dataset,
                selection.histogram.as_deref(),
                config.histogram_bins,
            );
            show_panel(ui, panel, charts::histogram);
        });

    egui::CollapsingHeader::new(RichText::new("Box Plot").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            column_picker(
                ui,
                "box_column",
                "Select column for box plot",
                &partition.numeric,
                &mut selection.box_plot,
            );
            let panel = chart_data::box_panel(dataset, selection.box_plot.as_deref());
            show_panel(ui, panel, charts::box_plot);
        });

    egui::CollapsingHeader::new(RichText::new("Correlation Heatmap").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            show_panel(
                ui,
                chart_data::correlation_panel(dataset),
                charts::correlation_heatmap,
            );
        });

    egui::CollapsingHeader::new(RichText::new("Scatter Plot").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            scatter_pickers(ui, &partition, selection);
            let panel = chart_data::scatter_panel(
                dataset,
                selection.scatter_x.as_deref(),
                selection.scatter_y.as_deref(),
                selection.scatter_color.as_deref(),
            );
            show_panel(ui, panel, charts::scatter);
        });

    egui::CollapsingHeader::new(RichText::new("Pie Chart (Categorical)").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if !partition.categorical.is_empty() {
                column_picker(
                    ui,
                    "pie_column",
                    "Select a categorical column",
                    &partition.categorical,
                    &mut selection.pie,
                );
            }
            let panel = chart_data::pie_panel(dataset, selection.pie.as_deref());
            show_panel(ui, panel, charts::pie);
        });
}

fn show_panel<T>(ui: &mut Ui, panel: Panel<T>, render: impl FnOnce(&mut Ui, &T)) {
    match panel {
        Panel::Ready(chart) => render(ui, &chart),
        Panel::Unavailable(reason) => {
            ui.label(RichText::new(reason).color(Color32::from_rgb(0xE0, 0xA0, 0x30)));
        }
    }
}

fn scatter_pickers(ui: &mut Ui, partition: &ColumnPartition, selection: &mut ChartSelection) {
    column_picker(ui, "scatter_x", "X Axis", &partition.numeric, &mut selection.scatter_x);
    column_picker(ui, "scatter_y", "Y Axis", &partition.numeric, &mut selection.scatter_y);

    // optional: stays None when the user picks "None"
    if selection
        .scatter_color
        .as_ref()
        .is_some_and(|c| !partition.categorical.contains(c))
    {
        selection.scatter_color = None;
    }
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Color (optional)");
        egui::ComboBox::from_id_salt("scatter_color")
            .selected_text(selection.scatter_color.as_deref().unwrap_or("None"))
            .show_ui(ui, |ui: &mut Ui| {
                for col in &partition.categorical {
                    ui.selectable_value(&mut selection.scatter_color, Some(col.clone()), col);
                }
                ui.selectable_value(&mut selection.scatter_color, None, "None");
            });
    });
}

/// Combo box over `options`; a stale or empty selection snaps to the first option.
fn column_picker(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selected: &mut Option<String>,
) {
    let current = resolve_column(selected.as_deref(), options).map(str::to_string);
    if *selected != current {
        *selected = current;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add_enabled_ui(!options.is_empty(), |ui: &mut Ui| {
            egui::ComboBox::from_id_salt(id)
                .selected_text(selected.as_deref().unwrap_or("(none available)"))
                .show_ui(ui, |ui: &mut Ui| {
                    for opt in options {
                        ui.selectable_value(selected, Some(opt.clone()), opt);
                    }
                });
        });
    });
}
