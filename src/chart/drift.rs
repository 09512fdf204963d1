use eframe::egui::Color32;

use crate::analysis::drift::{monthly_slopes, MIN_MONTHLY_SAMPLES};
use crate::data::model::Dataset;

use super::figure::{time_x, Figure, Trace};

/// Sensor-drift chart: the slope of the monthly sensor→reference fit as a
/// connected line with markers, one point per calendar month that has
/// enough paired observations.
pub fn build(ds: &Dataset, sensor: &str, reference: &str) -> Figure {
    let Some(rows) = ds.paired_with_times(sensor, reference) else {
        return Figure::empty("Both variables must be in the dataset.");
    };
    let series = monthly_slopes(&rows, MIN_MONTHLY_SAMPLES);
    if series.is_empty() {
        return Figure::empty(format!(
            "No month has the {MIN_MONTHLY_SAMPLES} paired observations needed for a fit."
        ));
    }

    let points: Vec<[f64; 2]> = series
        .iter()
        .map(|p| [time_x(p.month_end.and_time(chrono::NaiveTime::MIN)), p.slope])
        .collect();

    let mut fig = Figure::new(format!("Sensor drift: {sensor}"));
    fig.x_label = "Date".to_string();
    fig.y_label = "Slope".to_string();
    fig.time_axis = true;
    fig.traces.push(Trace::Line {
        name: "Monthly slope".to_string(),
        points: points.clone(),
        color: Color32::from_rgb(0x4C, 0x72, 0xB0),
        width: 1.5,
    });
    fig.traces.push(Trace::Points {
        name: "Monthly slope".to_string(),
        points,
        color: Color32::from_rgb(0x4C, 0x72, 0xB0),
        radius: 4.0,
    });
    fig
}
