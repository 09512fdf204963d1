use crate::analysis::stats::{quantile_sorted, sorted};
use crate::color::generate_palette;
use crate::config::BoxplotConfig;
use crate::data::model::Dataset;

use super::figure::{BoxGroup, Figure, Trace};

/// Height scales with the number of variables being compared.
pub fn derived_height(count: usize) -> f32 {
    (300.0 + 180.0 * count as f32).max(700.0)
}

/// Side-by-side boxplots of the listed columns, outliers drawn as
/// individual points. The incoming list order is preserved (long-form
/// reshape: one observation per row per variable). An empty list yields an
/// empty figure.
pub fn build<S: AsRef<str>>(ds: &Dataset, cfg: &BoxplotConfig, columns: &[S]) -> Figure {
    if columns.is_empty() {
        return Figure::empty("Select at least one variable to compare.");
    }

    let palette = generate_palette(columns.len());
    let mut groups = Vec::new();
    for (i, name) in columns.iter().enumerate() {
        let name = name.as_ref();
        let Some(col) = ds.column(name) else {
            continue;
        };
        let sample = col.non_missing();
        if sample.is_empty() {
            continue;
        }
        groups.push(box_group(name, &sample, palette[i]));
    }

    if groups.is_empty() {
        return Figure::empty("The selected variables have no observations.");
    }

    let mut fig = Figure::new("Distribution and Outlier Comparison");
    fig.x_label = "Variable".to_string();
    fig.y_label = "Value".to_string();
    fig.log_y = cfg.log_scale;
    fig.height = derived_height(groups.len());
    fig.traces.push(Trace::Boxes { groups });
    fig
}

/// Five-number summary with Tukey fences: whiskers reach the most extreme
/// observations within 1.5·IQR of the quartiles, everything outside is an
/// outlier point.
fn box_group(name: &str, sample: &[f64], color: eframe::egui::Color32) -> BoxGroup {
    let v = sorted(sample);
    let q1 = quantile_sorted(&v, 0.25);
    let median = quantile_sorted(&v, 0.5);
    let q3 = quantile_sorted(&v, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let lower_whisker = v
        .iter()
        .copied()
        .find(|&x| x >= low_fence)
        .unwrap_or(q1);
    let upper_whisker = v
        .iter()
        .rev()
        .copied()
        .find(|&x| x <= high_fence)
        .unwrap_or(q3);
    let outliers = v
        .iter()
        .copied()
        .filter(|&x| x < low_fence || x > high_fence)
        .collect();

    BoxGroup {
        name: name.to_string(),
        color,
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn dataset(columns: Vec<Column>) -> Dataset {
        let n = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let base = chrono::NaiveDate::from_ymd_opt(2004, 3, 10)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let timestamps = (0..n)
            .map(|i| base + chrono::Duration::hours(i as i64))
            .collect();
        Dataset::new(timestamps, columns)
    }

    #[test]
    fn empty_column_list_yields_empty_figure() {
        let ds = dataset(vec![Column::new("a", vec![1.0, 2.0])]);
        let fig = build(&ds, &BoxplotConfig::default(), &Vec::<String>::new());
        assert!(fig.is_empty());
        assert!(fig.hint.is_some());
    }

    #[test]
    fn one_box_group_per_valid_column() {
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let ds = dataset(vec![
            Column::new("a", values.clone()),
            Column::new("b", values.clone()),
            Column::new("c", values),
        ]);
        let fig = build(&ds, &BoxplotConfig::default(), &["a", "b", "c"]);

        let Trace::Boxes { groups } = &fig.traces[0] else {
            panic!("boxes expected");
        };
        assert_eq!(groups.len(), 3);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        // Distinct colours per variable.
        assert_ne!(groups[0].color, groups[1].color);
    }

    #[test]
    fn height_scales_with_variable_count() {
        assert_eq!(derived_height(1), 700.0);
        assert_eq!(derived_height(2), 700.0);
        assert_eq!(derived_height(3), 840.0);
        assert_eq!(derived_height(5), 1200.0);
    }

    #[test]
    fn outliers_fall_outside_tukey_fences() {
        let mut values: Vec<f64> = (0..99).map(|i| (i % 10) as f64).collect();
        values.push(1000.0); // far outlier
        let ds = dataset(vec![Column::new("a", values)]);
        let fig = build(&ds, &BoxplotConfig::default(), &["a"]);

        let Trace::Boxes { groups } = &fig.traces[0] else {
            panic!("boxes expected");
        };
        let g = &groups[0];
        assert_eq!(g.outliers, vec![1000.0]);
        assert!(g.upper_whisker <= 9.0);
        assert!(g.q1 <= g.median && g.median <= g.q3);
    }

    #[test]
    fn missing_values_are_dropped_per_variable() {
        let ds = dataset(vec![Column::new(
            "a",
            vec![1.0, f64::NAN, 3.0, f64::NAN, 5.0],
        )]);
        let fig = build(&ds, &BoxplotConfig::default(), &["a"]);
        let Trace::Boxes { groups } = &fig.traces[0] else {
            panic!("boxes expected");
        };
        assert_eq!(groups[0].median, 3.0);
    }
}
