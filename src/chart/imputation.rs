use chrono::NaiveDateTime;
use eframe::egui::Color32;

use crate::config::ImputationConfig;
use crate::data::model::Dataset;

use super::figure::{time_x, Figure, Trace};

/// Interpolation-impact chart: the cleaned series as a continuous line and
/// the raw non-missing observations as markers. Wherever a marker is
/// absent under the line, that value was imputed.
///
/// With no explicit range the first `window_hours` rows are shown so the
/// figure stays light.
pub fn build(
    clean: &Dataset,
    raw: &Dataset,
    cfg: &ImputationConfig,
    column: &str,
    range: Option<(NaiveDateTime, NaiveDateTime)>,
) -> Figure {
    let Some(clean_col) = clean.column(column) else {
        return Figure::empty(format!("Column '{column}' is not in the clean dataset."));
    };

    let line: Vec<[f64; 2]> = segment(clean, range, cfg.window_hours)
        .filter_map(|i| {
            let v = clean_col.values[i];
            (!v.is_nan()).then(|| [time_x(clean.timestamps[i]), v])
        })
        .collect();
    if line.is_empty() {
        return Figure::empty("The selected window has no observations.");
    }

    let mut fig = Figure::new(format!("Interpolation impact: {column}"));
    fig.x_label = "Date/Time".to_string();
    fig.y_label = "Value".to_string();
    fig.time_axis = true;

    fig.traces.push(Trace::Line {
        name: "Interpolated (filled)".to_string(),
        points: line,
        color: Color32::from_rgba_unmultiplied(220, 40, 40, 150),
        width: 2.0,
    });

    if let Some(raw_col) = raw.column(column) {
        let markers: Vec<[f64; 2]> = segment(raw, range, cfg.window_hours)
            .filter_map(|i| {
                let v = raw_col.values[i];
                (!v.is_nan()).then(|| [time_x(raw.timestamps[i]), v])
            })
            .collect();
        if !markers.is_empty() {
            fig.traces.push(Trace::Points {
                name: "Original (raw)".to_string(),
                points: markers,
                color: Color32::from_rgba_unmultiplied(40, 80, 220, 200),
                radius: 3.0,
            });
        }
    }

    fig
}

/// Row indices of the displayed window: an explicit timestamp range, or the
/// leading `window_hours` rows.
fn segment(
    ds: &Dataset,
    range: Option<(NaiveDateTime, NaiveDateTime)>,
    window_hours: usize,
) -> Box<dyn Iterator<Item = usize> + '_> {
    match range {
        Some((start, end)) => Box::new(
            (0..ds.len()).filter(move |&i| ds.timestamps[i] >= start && ds.timestamps[i] <= end),
        ),
        None => Box::new(0..ds.len().min(window_hours)),
    }
}
