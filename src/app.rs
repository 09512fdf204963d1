use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::analysis::stats::pearson;
use crate::chart::{
    boxplot, drift, heatmap, histogram, imputation, missing, quality, regression, scatter,
};
use crate::state::{
    AppState, Tab, CALIBRATION_PAIRS, DRIFT_PAIR, MULTI_PREDICTORS, MULTI_TARGET, REPORT_COLUMN,
};
use crate::ui::{panels, render};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AqExplorerApp {
    pub state: AppState,
}

impl Default for AqExplorerApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for AqExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.ensure_loaded();

        // ---- Top panel: menu bar, tabs, status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: per-tab controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the active tab's charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_panel(ui, &self.state);
        });
    }
}

fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(clean) = state.clean.clone() else {
        ui.label(RichText::new("No dataset loaded.").italics());
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Distributions => {
                if let Some(column) = &state.selections.histogram_column {
                    let fig = histogram::build(&clean, &state.configs.histogram, column);
                    render::figure(ui, "histogram", &fig);
                } else {
                    ui.label(RichText::new("Select a variable for the histogram.").italics());
                }
                ui.separator();
                let fig = boxplot::build(
                    &clean,
                    &state.configs.boxplot,
                    &state.selections.boxplot_columns,
                );
                render::figure(ui, "boxplot", &fig);
            }

            Tab::Correlation => {
                match (&state.selections.scatter_x, &state.selections.scatter_y) {
                    (Some(x), Some(y)) => {
                        let fig = scatter::build(
                            &clean,
                            &state.configs.scatter,
                            x,
                            y,
                            state.selections.scatter_color.as_deref(),
                        );
                        render::figure(ui, "scatter", &fig);
                        if let Some((xs, ys)) = clean.paired(x, y) {
                            let r = pearson(&xs, &ys);
                            if !r.is_nan() {
                                ui.label(format!(
                                    "Pearson r = {r:.3} over {} paired observations",
                                    xs.len()
                                ));
                            }
                        }
                    }
                    _ => {
                        ui.label(
                            RichText::new("Select an x and a y variable for the scatter.")
                                .italics(),
                        );
                    }
                }
                ui.separator();
                let fig = heatmap::build(
                    &clean,
                    &state.configs.heatmap,
                    &state.selections.heatmap_columns,
                );
                render::figure(ui, "heatmap", &fig);
            }

            Tab::RawVsClean => {
                match &state.missing {
                    Some(report) => {
                        let fig = missing::build(report, &state.configs.missing_bars);
                        render::figure(ui, "missing_bars", &fig);
                    }
                    None => {
                        ui.label(
                            RichText::new("Missing-value report not found in the data directory.")
                                .italics(),
                        );
                    }
                }
                ui.separator();
                match (&state.raw, &state.selections.imputation_column) {
                    (Some(raw), Some(column)) => {
                        let fig = imputation::build(
                            &clean,
                            raw,
                            &state.configs.imputation,
                            column,
                            None,
                        );
                        render::figure(ui, "imputation", &fig);
                        imputation_summary(ui, &clean, raw, column);
                    }
                    (None, _) => {
                        ui.label(
                            RichText::new("Raw dataset not found in the data directory.")
                                .italics(),
                        );
                    }
                    (_, None) => {
                        ui.label(RichText::new("Select a variable to inspect.").italics());
                    }
                }
            }

            Tab::Calibration => {
                for (sensor, reference) in CALIBRATION_PAIRS {
                    let fig = regression::univariate(&clean, sensor, reference);
                    render::figure(ui, &format!("calibration_{sensor}"), &fig);
                    ui.separator();
                }
                let fig = regression::multivariate(&clean, MULTI_TARGET, MULTI_PREDICTORS);
                render::figure(ui, "multivariate", &fig);
            }

            Tab::Drift => {
                let (sensor, reference) = DRIFT_PAIR;
                let fig = drift::build(&clean, sensor, reference);
                render::figure(ui, "drift", &fig);
            }

            Tab::Report => {
                let fig = quality::build(
                    &clean,
                    REPORT_COLUMN,
                    state.selections.report_band.as_deref(),
                );
                render::figure(ui, "quality_report", &fig);
            }
        });
}

/// Row counts contrasting the raw and interpolated series of one column.
fn imputation_summary(
    ui: &mut Ui,
    clean: &crate::data::model::Dataset,
    raw: &crate::data::model::Dataset,
    column: &str,
) {
    let (Some(raw_col), Some(clean_col)) = (raw.column(column), clean.column(column)) else {
        return;
    };
    let raw_total = raw_col.values.len();
    let raw_missing = raw_total - raw_col.non_missing_count();
    let raw_pct = if raw_total == 0 {
        0.0
    } else {
        100.0 * raw_missing as f64 / raw_total as f64
    };
    ui.label(format!(
        "Raw '{column}': {raw_missing} of {raw_total} values missing ({raw_pct:.1}%). \
         Interpolated series: {} observations.",
        clean_col.non_missing_count()
    ));
}
