use eframe::egui::Color32;

use crate::color::{continuous, with_alpha};
use crate::config::ScatterConfig;
use crate::data::model::Dataset;

use super::figure::{Figure, Trace};

const DEFAULT_POINT_COLOR: Color32 = Color32::from_rgb(0x4C, 0x72, 0xB0);

/// Number of legend buckets when colouring by a third column.
const COLOR_BUCKETS: usize = 6;

/// Scatter of `y_col` against `x_col`, optionally coloured by a third
/// column. Comparing a column against itself is meaningless and yields an
/// empty figure.
pub fn build(
    ds: &Dataset,
    cfg: &ScatterConfig,
    x_col: &str,
    y_col: &str,
    color_col: Option<&str>,
) -> Figure {
    if x_col == y_col {
        return Figure::empty("Select two different variables to compare.");
    }
    let (Some(cx), Some(cy)) = (ds.column(x_col), ds.column(y_col)) else {
        return Figure::empty("Both axis variables must be in the dataset.");
    };

    let mut fig = Figure::new(format!("Correlation: {x_col} vs {y_col}"));
    fig.x_label = x_col.to_string();
    fig.y_label = y_col.to_string();
    fig.height = cfg.height;

    let color_values = color_col.and_then(|c| ds.column(c));
    match color_values {
        Some(cc) => {
            let mut rows = Vec::new();
            for i in 0..ds.len() {
                let (x, y) = (cx.values[i], cy.values[i]);
                if !x.is_nan() && !y.is_nan() {
                    rows.push((x, y, cc.values[i]));
                }
            }
            if rows.is_empty() {
                return Figure::empty("No paired observations for the selected axes.");
            }
            fig.traces = bucketed_traces(&rows, cfg);
        }
        None => {
            let mut points = Vec::new();
            for i in 0..ds.len() {
                let (x, y) = (cx.values[i], cy.values[i]);
                if !x.is_nan() && !y.is_nan() {
                    points.push([x, y]);
                }
            }
            if points.is_empty() {
                return Figure::empty("No paired observations for the selected axes.");
            }
            fig.traces.push(Trace::Points {
                name: format!("{x_col} vs {y_col}"),
                points,
                color: with_alpha(DEFAULT_POINT_COLOR, cfg.alpha),
                radius: cfg.size,
            });
        }
    }

    fig
}

/// One trace per colour bucket so the legend shows the value range each
/// colour stands for. Rows with a missing colour value get a neutral grey
/// bucket.
fn bucketed_traces(rows: &[(f64, f64, f64)], cfg: &ScatterConfig) -> Vec<Trace> {
    let colored: Vec<f64> = rows
        .iter()
        .map(|r| r.2)
        .filter(|v| !v.is_nan())
        .collect();
    let min = colored.iter().copied().fold(f64::INFINITY, f64::min);
    let max = colored.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); COLOR_BUCKETS];
    let mut unknown: Vec<[f64; 2]> = Vec::new();

    for &(x, y, c) in rows {
        if c.is_nan() || !(span > 0.0) {
            unknown.push([x, y]);
            continue;
        }
        let t = (c - min) / span;
        let idx = ((t * COLOR_BUCKETS as f64) as usize).min(COLOR_BUCKETS - 1);
        buckets[idx].push([x, y]);
    }

    let mut traces = Vec::new();
    for (i, points) in buckets.into_iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let t_mid = (i as f64 + 0.5) / COLOR_BUCKETS as f64;
        let lo = min + span * i as f64 / COLOR_BUCKETS as f64;
        let hi = min + span * (i + 1) as f64 / COLOR_BUCKETS as f64;
        traces.push(Trace::Points {
            name: format!("{lo:.1}–{hi:.1}"),
            points,
            color: with_alpha(continuous(t_mid), cfg.alpha),
            radius: cfg.size,
        });
    }
    if !unknown.is_empty() {
        traces.push(Trace::Points {
            name: "other".to_string(),
            points: unknown,
            color: with_alpha(Color32::GRAY, cfg.alpha),
            radius: cfg.size,
        });
    }
    traces
}
