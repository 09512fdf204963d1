use crate::analysis::stats::correlation_matrix;
use crate::config::HeatmapConfig;
use crate::data::model::Dataset;

use super::figure::{Figure, Trace};

/// Pairwise Pearson correlation heatmap over the listed columns on a
/// diverging scale fixed to [-1, 1]. Correlation is undefined for fewer
/// than two variables, so that case yields an empty figure.
pub fn build<S: AsRef<str>>(ds: &Dataset, cfg: &HeatmapConfig, columns: &[S]) -> Figure {
    let present: Vec<(&str, &[f64])> = columns
        .iter()
        .filter_map(|c| {
            let col = ds.column(c.as_ref())?;
            Some((col.name.as_str(), col.values.as_slice()))
        })
        .collect();
    if present.len() < 2 {
        return Figure::empty("Select at least two columns for the correlation matrix.");
    }

    let series: Vec<&[f64]> = present.iter().map(|&(_, values)| values).collect();
    let values = correlation_matrix(&series);

    let mut fig = Figure::new("Correlation Matrix");
    fig.x_label = "Variables".to_string();
    fig.y_label = "Variables".to_string();
    fig.height = cfg.height.max(80.0 * present.len() as f32);
    fig.traces.push(Trace::Heatmap {
        labels: present.iter().map(|&(name, _)| name.to_string()).collect(),
        values,
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
        let n = 20;
        let timestamps = (0..n).map(|i| base + chrono::Duration::hours(i)).collect();
        let a: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let b: Vec<f64> = a.iter().map(|v| -v).collect();
        let c: Vec<f64> = a.iter().map(|v| (v * 7.0) % 11.0).collect();
        Dataset::new(
            timestamps,
            vec![
                Column::new("a", a),
                Column::new("b", b),
                Column::new("c", c),
            ],
        )
    }

    #[test]
    fn fewer_than_two_columns_is_empty() {
        let ds = dataset();
        assert!(build(&ds, &HeatmapConfig::default(), &["a"]).is_empty());
        assert!(build(&ds, &HeatmapConfig::default(), &Vec::<String>::new()).is_empty());
        // Unknown names do not count towards the minimum.
        assert!(build(&ds, &HeatmapConfig::default(), &["a", "nope"]).is_empty());
    }

    #[test]
    fn matrix_is_square_with_unit_diagonal() {
        let ds = dataset();
        let fig = build(&ds, &HeatmapConfig::default(), &["a", "b", "c"]);
        let Trace::Heatmap { labels, values } = &fig.traces[0] else {
            panic!("heatmap expected");
        };
        assert_eq!(labels.len(), 3);
        assert_eq!(values.len(), 3);
        for (i, row) in values.iter().enumerate() {
            assert_eq!(row.len(), 3);
            assert!((row[i] - 1.0).abs() < 1e-12);
        }
        // a and b are perfectly anti-correlated.
        assert!((values[0][1] + 1.0).abs() < 1e-12);
        // All entries within the fixed [-1, 1] range.
        for row in values {
            for &v in row {
                assert!(v.is_nan() || (-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn height_grows_with_column_count() {
        let ds = dataset();
        let small = build(&ds, &HeatmapConfig::default(), &["a", "b"]);
        let large = build(&ds, &HeatmapConfig { height: 100.0 }, &["a", "b", "c"]);
        assert!(small.height >= 600.0);
        assert_eq!(large.height, 240.0);
    }
}
