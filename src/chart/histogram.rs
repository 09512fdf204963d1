use eframe::egui::Color32;

use crate::analysis::stats::GaussianKde;
use crate::config::HistogramConfig;
use crate::data::model::Dataset;

use super::figure::{Figure, Trace};

/// Height derived from sample size when the configuration does not override
/// it: grows slowly with n, clamped to [450, 900].
pub fn derived_height(sample_size: usize) -> f32 {
    ((300 + sample_size / 400) as f32).clamp(450.0, 900.0)
}

/// Histogram of one column with a kernel-density overlay.
///
/// Missing values are dropped first; an empty sample yields an empty
/// figure. Bin edges and counts are computed here (not delegated) so the
/// density curve can be rescaled to the bar axis: its peak is normalised to
/// the tallest bar.
pub fn build(ds: &Dataset, cfg: &HistogramConfig, column: &str) -> Figure {
    let Some(col) = ds.column(column) else {
        return Figure::empty(format!("Column '{column}' is not in the dataset."));
    };
    let sample = col.non_missing();
    if sample.is_empty() {
        return Figure::empty(format!("No observations for '{column}'."));
    }

    let (centers, heights, width) = bin(&sample, cfg.bins.max(1));
    let tallest = heights.iter().copied().fold(0.0f64, f64::max);

    let mut fig = Figure::new(format!("Distribution of {column}"));
    fig.x_label = column.to_string();
    fig.y_label = "Frequency".to_string();
    fig.log_y = cfg.log_scale;
    fig.height = cfg.height.unwrap_or_else(|| derived_height(sample.len()));

    fig.traces.push(Trace::Bars {
        name: "Frequency".to_string(),
        centers,
        heights,
        width,
        color: cfg.color,
    });

    if let Some(overlay) = density_overlay(&sample, tallest) {
        fig.traces.push(overlay);
    }

    fig
}

/// Equal-width binning over [min, max]. A zero-spread sample collapses to a
/// single bin of nominal width.
fn bin(sample: &[f64], bins: usize) -> (Vec<f64>, Vec<f64>, f64) {
    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return (vec![min], vec![sample.len() as f64], 1.0);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0.0f64; bins];
    for &v in sample {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1.0;
    }
    let centers = (0..bins)
        .map(|i| min + (i as f64 + 0.5) * width)
        .collect();
    (centers, counts, width)
}

/// KDE curve scaled so its peak matches the tallest bar.
fn density_overlay(sample: &[f64], tallest_bar: f64) -> Option<Trace> {
    let kde = GaussianKde::new(sample)?;
    let min = sample.iter().copied().fold(f64::INFINITY, f64::min);
    let max = sample.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let grid = kde.evaluate_grid(min, max, 200);
    let peak = grid.iter().map(|&(_, d)| d).fold(0.0f64, f64::max);
    if !(peak > 0.0) || !(tallest_bar > 0.0) {
        return None;
    }

    let scale = tallest_bar / peak;
    let points = grid.iter().map(|&(x, d)| [x, d * scale]).collect();
    Some(Trace::Line {
        name: "Density".to_string(),
        points,
        color: Color32::from_rgb(0x1A, 0x23, 0x7E),
        width: 2.5,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn dataset_with(values: Vec<f64>) -> Dataset {
        let n = values.len();
        let base = chrono::NaiveDate::from_ymd_opt(2004, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let timestamps = (0..n)
            .map(|i| base + chrono::Duration::hours(i as i64))
            .collect();
        Dataset::new(timestamps, vec![Column::new("CO(GT)", values)])
    }

    #[test]
    fn empty_sample_yields_empty_figure() {
        let ds = dataset_with(vec![f64::NAN, f64::NAN]);
        let fig = build(&ds, &HistogramConfig::default(), "CO(GT)");
        assert!(fig.is_empty());
        assert!(fig.hint.is_some());
    }

    #[test]
    fn unknown_column_yields_empty_figure() {
        let ds = dataset_with(vec![1.0]);
        assert!(build(&ds, &HistogramConfig::default(), "nope").is_empty());
    }

    #[test]
    fn counts_cover_the_whole_sample() {
        let values: Vec<f64> = (0..500).map(|i| (i % 97) as f64).collect();
        let ds = dataset_with(values);
        let fig = build(&ds, &HistogramConfig::default(), "CO(GT)");

        let Trace::Bars { heights, .. } = &fig.traces[0] else {
            panic!("first trace must be the bars");
        };
        let total: f64 = heights.iter().sum();
        assert_eq!(total, 500.0);
        assert_eq!(heights.len(), HistogramConfig::default().bins);
    }

    #[test]
    fn density_peak_matches_tallest_bar() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
        let ds = dataset_with(values);
        let fig = build(&ds, &HistogramConfig::default(), "CO(GT)");

        let Trace::Bars { heights, .. } = &fig.traces[0] else {
            panic!("bars expected");
        };
        let tallest = heights.iter().copied().fold(0.0f64, f64::max);

        let Trace::Line { points, .. } = &fig.traces[1] else {
            panic!("density line expected");
        };
        let peak = points.iter().map(|p| p[1]).fold(0.0f64, f64::max);
        assert!((peak - tallest).abs() < 1e-9);
    }

    #[test]
    fn derived_height_is_monotonic_within_clamp() {
        assert_eq!(derived_height(0), 450.0);
        let mut last = 0.0;
        for n in [0, 10_000, 60_000, 120_000, 500_000] {
            let h = derived_height(n);
            assert!(h >= last);
            assert!((450.0..=900.0).contains(&h));
            last = h;
        }
        assert_eq!(derived_height(1_000_000), 900.0);
    }

    #[test]
    fn explicit_height_override_wins() {
        let ds = dataset_with(vec![1.0, 2.0, 3.0]);
        let cfg = HistogramConfig {
            height: Some(555.0),
            ..Default::default()
        };
        let fig = build(&ds, &cfg, "CO(GT)");
        assert_eq!(fig.height, 555.0);
    }

    #[test]
    fn constant_sample_collapses_to_one_bin() {
        let ds = dataset_with(vec![7.0; 40]);
        let fig = build(&ds, &HistogramConfig::default(), "CO(GT)");
        let Trace::Bars {
            centers, heights, ..
        } = &fig.traces[0]
        else {
            panic!("bars expected");
        };
        assert_eq!(centers, &vec![7.0]);
        assert_eq!(heights, &vec![40.0]);
        // No density overlay for a zero-spread sample.
        assert_eq!(fig.traces.len(), 1);
    }
}
