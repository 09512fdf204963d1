use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::config::{
    reference_columns, sensor_columns, BoxplotOverrides, HistogramOverrides,
    MissingBarsOverrides, ScatterOverrides,
};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: data directory picker, reload, status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Data", |ui: &mut Ui| {
            if ui.button("Open data directory…").clicked() {
                pick_data_dir(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        for tab in Tab::ALL {
            if ui
                .selectable_label(state.tab == tab, tab.label())
                .clicked()
            {
                state.tab = tab;
            }
        }

        ui.separator();

        if let Some(ds) = &state.clean {
            ui.label(format!("{} rows × {} columns", ds.len(), ds.columns.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

fn pick_data_dir(state: &mut AppState) {
    let dir = rfd::FileDialog::new()
        .set_title("Select the data directory")
        .pick_folder();
    if let Some(dir) = dir {
        log::info!("Switching data directory to {}", dir.display());
        state.set_data_dir(&dir);
    }
}

// ---------------------------------------------------------------------------
// Left side panel – per-tab controls
// ---------------------------------------------------------------------------

/// Render the control panel for the active tab.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.clean.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Distributions => distribution_controls(ui, state),
            Tab::Correlation => correlation_controls(ui, state),
            Tab::RawVsClean => raw_vs_clean_controls(ui, state),
            Tab::Calibration | Tab::Drift => {
                ui.label("Fixed sensor → reference pairs; nothing to configure.");
            }
            Tab::Report => report_controls(ui, state),
        });
}

fn distribution_controls(ui: &mut Ui, state: &mut AppState) {
    let columns: Vec<String> = state
        .clean
        .as_ref()
        .map(|ds| ds.column_names().iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    ui.strong("Histogram");
    column_combo(
        ui,
        "hist_column",
        "Variable",
        &columns,
        &mut state.selections.histogram_column,
        false,
    );

    let cfg = state.configs.histogram;
    let mut bins = cfg.bins;
    if ui
        .add(Slider::new(&mut bins, 5..=100).text("Bins"))
        .changed()
    {
        state.configs.histogram = cfg.apply(HistogramOverrides {
            bins: Some(bins),
            ..Default::default()
        });
    }

    let cfg = state.configs.histogram;
    let mut color = cfg.color;
    if ui.color_edit_button_srgba(&mut color).changed() {
        state.configs.histogram = cfg.apply(HistogramOverrides {
            color: Some(color),
            ..Default::default()
        });
    }

    let cfg = state.configs.histogram;
    let mut log_scale = cfg.log_scale;
    if ui.checkbox(&mut log_scale, "Log scale (y axis)").changed() {
        state.configs.histogram = cfg.apply(HistogramOverrides {
            log_scale: Some(log_scale),
            ..Default::default()
        });
    }

    ui.separator();
    ui.strong("Boxplots");
    ui.label("Variables to compare:");
    for col in &columns {
        let mut selected = state.selections.boxplot_columns.contains(col);
        if ui.checkbox(&mut selected, col).changed() {
            if selected {
                state.selections.boxplot_columns.push(col.clone());
            } else {
                state.selections.boxplot_columns.retain(|c| c != col);
            }
        }
    }

    let cfg = state.configs.boxplot;
    let mut log_scale = cfg.log_scale;
    if ui
        .checkbox(&mut log_scale, "Log scale in boxplots")
        .changed()
    {
        state.configs.boxplot = cfg.apply(BoxplotOverrides {
            log_scale: Some(log_scale),
        });
    }
}

fn correlation_controls(ui: &mut Ui, state: &mut AppState) {
    let columns: Vec<String> = state
        .clean
        .as_ref()
        .map(|ds| ds.column_names().iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();
    let names: Vec<&str> = columns.iter().map(|s| s.as_str()).collect();
    let references: Vec<String> = reference_columns(&names)
        .iter()
        .map(|s| s.to_string())
        .collect();
    let sensors: Vec<String> = sensor_columns(&names)
        .iter()
        .map(|s| s.to_string())
        .collect();

    ui.strong("Scatter");
    column_combo(
        ui,
        "scatter_x",
        "X axis (reference)",
        &references,
        &mut state.selections.scatter_x,
        false,
    );
    column_combo(
        ui,
        "scatter_y",
        "Y axis (sensor)",
        &sensors,
        &mut state.selections.scatter_y,
        false,
    );
    column_combo(
        ui,
        "scatter_color",
        "Color by",
        &columns,
        &mut state.selections.scatter_color,
        true,
    );

    let cfg = state.configs.scatter;
    let mut alpha = cfg.alpha;
    if ui
        .add(Slider::new(&mut alpha, 0.1..=1.0).text("Opacity"))
        .changed()
    {
        state.configs.scatter = cfg.apply(ScatterOverrides {
            alpha: Some(alpha),
            ..Default::default()
        });
    }

    let cfg = state.configs.scatter;
    let mut size = cfg.size;
    if ui
        .add(Slider::new(&mut size, 2.0..=20.0).text("Point size"))
        .changed()
    {
        state.configs.scatter = cfg.apply(ScatterOverrides {
            size: Some(size),
            ..Default::default()
        });
    }

    ui.separator();
    ui.strong("Heatmap");
    ui.label("Columns in the correlation matrix:");
    for col in &columns {
        let mut selected = state.selections.heatmap_columns.contains(col);
        if ui.checkbox(&mut selected, col).changed() {
            if selected {
                state.selections.heatmap_columns.push(col.clone());
            } else {
                state.selections.heatmap_columns.retain(|c| c != col);
            }
        }
    }
}

fn raw_vs_clean_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Missing-data chart");
    let cfg = state.configs.missing_bars;
    let mut threshold = cfg.critical_threshold;
    if ui
        .add(Slider::new(&mut threshold, 0.0..=100.0).text("Critical threshold (%)"))
        .changed()
    {
        state.configs.missing_bars = cfg.apply(MissingBarsOverrides {
            critical_threshold: Some(threshold),
        });
    }

    ui.separator();
    ui.strong("Interpolation impact");
    let columns: Vec<String> = state
        .clean
        .as_ref()
        .map(|ds| ds.column_names().iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();
    column_combo(
        ui,
        "imputation_column",
        "Variable",
        &columns,
        &mut state.selections.imputation_column,
        false,
    );
}

fn report_controls(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Quality report");
    let bands: Vec<String> = crate::chart::quality::QUALITY_BANDS
        .iter()
        .map(|&(label, _, _)| label.to_string())
        .collect();
    column_combo(
        ui,
        "report_band",
        "Category",
        &bands,
        &mut state.selections.report_band,
        true,
    );
}

/// A ComboBox over the given options. With `optional`, a leading "None"
/// entry clears the selection.
fn column_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selection: &mut Option<String>,
    optional: bool,
) {
    ui.label(label);
    let current = selection
        .clone()
        .unwrap_or_else(|| if optional { "None".to_string() } else { String::new() });
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.clone())
        .show_ui(ui, |ui: &mut Ui| {
            if optional && ui.selectable_label(selection.is_none(), "None").clicked() {
                *selection = None;
            }
            for opt in options {
                if ui
                    .selectable_label(selection.as_deref() == Some(opt), opt)
                    .clicked()
                {
                    *selection = Some(opt.clone());
                }
            }
        });
}
