use crate::color::generate_palette;
use crate::data::model::Dataset;

use super::figure::{time_x, Figure, Trace};

/// Air-quality classification bands for CO(GT), in mg/m³. Half-open
/// `(lower, upper]` intervals, matching the reporting convention.
pub const QUALITY_BANDS: &[(&str, f64, f64)] = &[
    ("Good", -1.0, 1.0),
    ("Moderate", 1.0, 3.0),
    ("Poor", 3.0, 50.0),
];

/// Label for a single value, `None` outside every band.
pub fn classify(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        return None;
    }
    QUALITY_BANDS
        .iter()
        .find(|&&(_, lo, hi)| value > lo && value <= hi)
        .map(|&(label, _, _)| label)
}

/// Time-series scatter of a column split into quality bands, one marker
/// series per band. `band_filter` restricts the chart to a single band.
pub fn build(ds: &Dataset, column: &str, band_filter: Option<&str>) -> Figure {
    let Some(col) = ds.column(column) else {
        return Figure::empty(format!("Column '{column}' is not in the dataset."));
    };

    let palette = generate_palette(QUALITY_BANDS.len());
    let mut fig = Figure::new(format!("Air quality over time ({column})"));
    fig.x_label = "Time".to_string();
    fig.y_label = column.to_string();
    fig.time_axis = true;

    for (band_idx, &(label, _, _)) in QUALITY_BANDS.iter().enumerate() {
        if band_filter.is_some_and(|f| f != label) {
            continue;
        }
        let points: Vec<[f64; 2]> = ds
            .timestamps
            .iter()
            .zip(col.values.iter())
            .filter(|(_, &v)| classify(v) == Some(label))
            .map(|(&t, &v)| [time_x(t), v])
            .collect();
        if points.is_empty() {
            continue;
        }
        fig.traces.push(Trace::Points {
            name: label.to_string(),
            points,
            color: palette[band_idx],
            radius: 2.0,
        });
    }

    if fig.is_empty() {
        fig.hint = Some("No observations in the selected category.".to_string());
    }
    fig
}
