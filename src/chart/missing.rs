use eframe::egui::Color32;

use crate::color::severity;
use crate::config::MissingBarsConfig;
use crate::data::model::MissingReport;

use super::figure::{Figure, Trace};

/// One bar per reported column with its missing percentage, sorted and
/// coloured by severity, with a reference line at the critical threshold.
pub fn build(report: &MissingReport, cfg: &MissingBarsConfig) -> Figure {
    if report.is_empty() {
        return Figure::empty("The missing-value report has no entries.");
    }

    let mut entries = report.entries.clone();
    entries.sort_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct));

    let labels: Vec<String> = entries.iter().map(|e| e.column.clone()).collect();
    let values: Vec<f64> = entries.iter().map(|e| e.missing_pct).collect();
    let colors: Vec<Color32> = entries
        .iter()
        .map(|e| severity(e.missing_pct / 100.0))
        .collect();

    let mut fig = Figure::new("Data Quality Diagnosis");
    fig.x_label = "Variable".to_string();
    fig.y_label = "% Missing".to_string();
    fig.height = (60.0 * entries.len() as f32).max(400.0);
    fig.traces.push(Trace::CategoryBars {
        name: "% Missing".to_string(),
        labels,
        values,
        colors,
    });
    fig.traces.push(Trace::HRule {
        name: format!("Critical ({}%)", cfg.critical_threshold),
        y: cfg.critical_threshold,
        color: Color32::RED,
    });
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MissingEntry;

    fn report() -> MissingReport {
        MissingReport {
            entries: vec![
                MissingEntry {
                    column: "CO(GT)".to_string(),
                    missing_pct: 13.2,
                },
                MissingEntry {
                    column: "NMHC(GT)".to_string(),
                    missing_pct: 90.2,
                },
                MissingEntry {
                    column: "T".to_string(),
                    missing_pct: 2.5,
                },
            ],
        }
    }

    #[test]
    fn empty_report_yields_empty_figure() {
        let fig = build(&MissingReport::default(), &MissingBarsConfig::default());
        assert!(fig.is_empty());
    }

    #[test]
    fn bars_sorted_by_severity_descending() {
        let fig = build(&report(), &MissingBarsConfig::default());
        let Trace::CategoryBars { labels, values, .. } = &fig.traces[0] else {
            panic!("category bars expected");
        };
        assert_eq!(labels, &vec!["NMHC(GT)", "CO(GT)", "T"]);
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn threshold_rule_uses_configuration() {
        let cfg = MissingBarsConfig {
            critical_threshold: 75.0,
        };
        let fig = build(&report(), &cfg);
        let Trace::HRule { y, .. } = &fig.traces[1] else {
            panic!("rule expected");
        };
        assert_eq!(*y, 75.0);
    }

    #[test]
    fn worse_columns_get_darker_colors() {
        let fig = build(&report(), &MissingBarsConfig::default());
        let Trace::CategoryBars { colors, .. } = &fig.traces[0] else {
            panic!("category bars expected");
        };
        // First bar is the most severe; darker means a lower green channel.
        assert!(colors[0].g() < colors[2].g());
    }
}
