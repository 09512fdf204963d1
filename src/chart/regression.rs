use eframe::egui::Color32;

use crate::analysis::regression::{fit_line, fit_multivariate};
use crate::color::with_alpha;
use crate::data::model::Dataset;

use super::figure::{Figure, Trace};

const OBSERVATION_COLOR: Color32 = Color32::from_rgb(0x4C, 0x72, 0xB0);
const FIT_COLOR: Color32 = Color32::RED;

/// Univariate calibration plot: scatter of reference against sensor with
/// the least-squares line drawn over the observed x-range.
pub fn univariate(ds: &Dataset, sensor: &str, reference: &str) -> Figure {
    let Some((x, y)) = ds.paired(sensor, reference) else {
        return Figure::empty("Both variables must be in the dataset.");
    };
    let Some(fit) = fit_line(&x, &y) else {
        return Figure::empty(format!(
            "Not enough paired observations to fit {sensor} → {reference}."
        ));
    };

    let mut fig = Figure::new(format!("{sensor} → {reference} (linear model)"));
    fig.x_label = sensor.to_string();
    fig.y_label = reference.to_string();

    fig.traces.push(Trace::Points {
        name: "Observations".to_string(),
        points: x.iter().zip(y.iter()).map(|(&a, &b)| [a, b]).collect(),
        color: with_alpha(OBSERVATION_COLOR, 0.6),
        radius: 2.5,
    });

    let min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let steps = 200;
    let line = (0..steps)
        .map(|i| {
            let xi = min + (max - min) * i as f64 / (steps - 1) as f64;
            [xi, fit.predict(xi)]
        })
        .collect();
    fig.traces.push(Trace::Line {
        name: "Linear fit".to_string(),
        points: line,
        color: FIT_COLOR,
        width: 2.0,
    });

    fig
}

/// Multivariate fit reported as observed-vs-predicted with a diagonal
/// reference line. Rows with any missing value among target and predictors
/// are dropped; a rank-deficient design degrades to the minimum-norm
/// solution inside the solver rather than failing.
pub fn multivariate<S: AsRef<str>>(ds: &Dataset, target: &str, predictors: &[S]) -> Figure {
    if predictors.is_empty() {
        return Figure::empty("Select at least one predictor.");
    }
    let mut names: Vec<&str> = predictors.iter().map(|p| p.as_ref()).collect();
    names.push(target);

    let Some(cols) = ds.complete_rows(&names) else {
        return Figure::empty("Target and predictors must all be in the dataset.");
    };
    let (pred_cols, target_col) = cols.split_at(predictors.len());
    let y = &target_col[0];
    if y.is_empty() {
        return Figure::empty("No complete observations for the selected model.");
    }

    let pred_slices: Vec<&[f64]> = pred_cols.iter().map(|c| c.as_slice()).collect();
    let Some(fit) = fit_multivariate(&pred_slices, y) else {
        return Figure::empty("The least-squares fit could not be computed.");
    };

    let predicted: Vec<f64> = (0..y.len())
        .map(|row| {
            let obs: Vec<f64> = pred_slices.iter().map(|c| c[row]).collect();
            fit.predict(&obs)
        })
        .collect();

    let mut fig = Figure::new(format!("Multivariate model: {target}"));
    fig.x_label = "Observed".to_string();
    fig.y_label = "Predicted".to_string();

    fig.traces.push(Trace::Points {
        name: "Observed vs predicted".to_string(),
        points: y
            .iter()
            .zip(predicted.iter())
            .map(|(&o, &p)| [o, p])
            .collect(),
        color: with_alpha(OBSERVATION_COLOR, 0.6),
        radius: 2.5,
    });

    let lo = y
        .iter()
        .chain(predicted.iter())
        .copied()
        .fold(f64::INFINITY, f64::min);
    let hi = y
        .iter()
        .chain(predicted.iter())
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    fig.traces.push(Trace::Line {
        name: "Ideal".to_string(),
        points: vec![[lo, lo], [hi, hi]],
        color: FIT_COLOR,
        width: 2.0,
    });

    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn dataset() -> Dataset {
        let base = chrono::NaiveDate::from_ymd_opt(2004, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let n = 50;
        let timestamps = (0..n).map(|i| base + chrono::Duration::hours(i)).collect();
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();
        let z: Vec<f64> = x.iter().map(|v| v * 0.5 - 1.0).collect();
        Dataset::new(
            timestamps,
            vec![
                Column::new("sensor", x),
                Column::new("ref", y),
                Column::new("aux", z),
            ],
        )
    }

    #[test]
    fn univariate_line_matches_the_generating_model() {
        let ds = dataset();
        let fig = univariate(&ds, "sensor", "ref");
        assert_eq!(fig.traces.len(), 2);

        let Trace::Line { points, .. } = &fig.traces[1] else {
            panic!("fit line expected");
        };
        // y = 2x + 3 at both ends of the observed range.
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert!((first[1] - (2.0 * first[0] + 3.0)).abs() < 1e-9);
        assert!((last[1] - (2.0 * last[0] + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn univariate_missing_column_is_empty() {
        let ds = dataset();
        assert!(univariate(&ds, "sensor", "nope").is_empty());
    }

    #[test]
    fn multivariate_prediction_lies_on_the_diagonal_for_exact_data() {
        let ds = dataset();
        let fig = multivariate(&ds, "ref", &["sensor", "aux"]);

        let Trace::Points { points, .. } = &fig.traces[0] else {
            panic!("points expected");
        };
        for p in points {
            assert!((p[0] - p[1]).abs() < 1e-6);
        }
        let Trace::Line { points: diag, .. } = &fig.traces[1] else {
            panic!("diagonal expected");
        };
        assert_eq!(diag.len(), 2);
        assert_eq!(diag[0][0], diag[0][1]);
    }

    #[test]
    fn multivariate_without_predictors_is_empty() {
        let ds = dataset();
        let fig = multivariate(&ds, "ref", &Vec::<String>::new());
        assert!(fig.is_empty());
    }
}
