use chrono::NaiveDateTime;
use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Figure – the renderable chart object
// ---------------------------------------------------------------------------

/// A chart ready for rendering, independent of any plotting toolkit. The
/// builders produce these; `ui::render` maps them onto egui_plot.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Target height in logical points.
    pub height: f32,
    /// Log-scale the y axis at render time.
    pub log_y: bool,
    /// The x axis holds epoch seconds and should be labelled as dates.
    pub time_axis: bool,
    /// Informational message for the user, set on empty/degenerate input.
    pub hint: Option<String>,
    pub traces: Vec<Trace>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Figure {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            height: 600.0,
            log_y: false,
            time_axis: false,
            hint: None,
            traces: Vec::new(),
        }
    }

    /// A chart with nothing to draw, carrying a hint the shell can display.
    pub fn empty(hint: impl Into<String>) -> Self {
        let mut fig = Figure::new("");
        fig.hint = Some(hint.into());
        fig
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// Five-number summary plus individually drawn outliers for one variable.
#[derive(Debug, Clone)]
pub struct BoxGroup {
    pub name: String,
    pub color: Color32,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone)]
pub enum Trace {
    /// Numeric-axis bars (histogram bins).
    Bars {
        name: String,
        centers: Vec<f64>,
        heights: Vec<f64>,
        width: f64,
        color: Color32,
    },
    /// Labelled category bars (missing-value percentages).
    CategoryBars {
        name: String,
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<Color32>,
    },
    Line {
        name: String,
        points: Vec<[f64; 2]>,
        color: Color32,
        width: f32,
    },
    Points {
        name: String,
        points: Vec<[f64; 2]>,
        color: Color32,
        radius: f32,
    },
    /// One box-and-whisker group per variable.
    Boxes { groups: Vec<BoxGroup> },
    /// Square matrix of values on a diverging scale, fixed to [-1, 1].
    Heatmap {
        labels: Vec<String>,
        values: Vec<Vec<f64>>,
    },
    /// Dashed horizontal reference line.
    HRule {
        name: String,
        y: f64,
        color: Color32,
    },
}

/// X-axis value for a timestamped observation.
pub fn time_x(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_figure_carries_hint_and_no_traces() {
        let fig = Figure::empty("pick a column");
        assert!(fig.is_empty());
        assert_eq!(fig.hint.as_deref(), Some("pick a column"));
    }

    #[test]
    fn time_x_is_monotonic() {
        let a = chrono::NaiveDate::from_ymd_opt(2004, 3, 10)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let b = a + chrono::Duration::hours(1);
        assert!(time_x(b) > time_x(a));
    }
}
