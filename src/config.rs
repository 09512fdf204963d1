use eframe::egui::Color32;

use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Chart configurations
// ---------------------------------------------------------------------------
//
// One bundle per chart family, holding presentation parameters only (never
// data references). Each bundle is an immutable value: updates go through
// the matching `…Overrides` struct, whose fields are all optional, and
// `apply` which produces a new configuration. Fields that do not exist
// cannot be named, so a partial update touches exactly what it spells out.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramConfig {
    pub bins: usize,
    pub color: Color32,
    pub log_scale: bool,
    /// Explicit height override; `None` derives the height from sample size.
    pub height: Option<f32>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        HistogramConfig {
            bins: 30,
            color: Color32::from_rgb(0x4C, 0x72, 0xB0),
            log_scale: false,
            height: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HistogramOverrides {
    pub bins: Option<usize>,
    pub color: Option<Color32>,
    pub log_scale: Option<bool>,
    pub height: Option<f32>,
}

impl HistogramConfig {
    pub fn apply(self, ov: HistogramOverrides) -> Self {
        HistogramConfig {
            bins: ov.bins.unwrap_or(self.bins),
            color: ov.color.unwrap_or(self.color),
            log_scale: ov.log_scale.unwrap_or(self.log_scale),
            height: ov.height.or(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxplotConfig {
    pub log_scale: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoxplotOverrides {
    pub log_scale: Option<bool>,
}

impl BoxplotConfig {
    pub fn apply(self, ov: BoxplotOverrides) -> Self {
        BoxplotConfig {
            log_scale: ov.log_scale.unwrap_or(self.log_scale),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterConfig {
    /// Point opacity in [0, 1].
    pub alpha: f32,
    /// Marker radius in points.
    pub size: f32,
    pub height: f32,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        ScatterConfig {
            alpha: 0.5,
            size: 5.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterOverrides {
    pub alpha: Option<f32>,
    pub size: Option<f32>,
    pub height: Option<f32>,
}

impl ScatterConfig {
    pub fn apply(self, ov: ScatterOverrides) -> Self {
        ScatterConfig {
            alpha: ov.alpha.unwrap_or(self.alpha),
            size: ov.size.unwrap_or(self.size),
            height: ov.height.unwrap_or(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapConfig {
    pub height: f32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig { height: 600.0 }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeatmapOverrides {
    pub height: Option<f32>,
}

impl HeatmapConfig {
    pub fn apply(self, ov: HeatmapOverrides) -> Self {
        HeatmapConfig {
            height: ov.height.unwrap_or(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingBarsConfig {
    /// Percentage above which a column counts as critically incomplete.
    pub critical_threshold: f64,
}

impl Default for MissingBarsConfig {
    fn default() -> Self {
        MissingBarsConfig {
            critical_threshold: 90.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MissingBarsOverrides {
    pub critical_threshold: Option<f64>,
}

impl MissingBarsConfig {
    pub fn apply(self, ov: MissingBarsOverrides) -> Self {
        MissingBarsConfig {
            critical_threshold: ov.critical_threshold.unwrap_or(self.critical_threshold),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImputationConfig {
    /// Number of leading rows shown when no explicit range is selected
    /// (744 hourly rows ≈ one month).
    pub window_hours: usize,
}

impl Default for ImputationConfig {
    fn default() -> Self {
        ImputationConfig { window_hours: 744 }
    }
}

/// The full per-session configuration set, created once with defaults at
/// session start. Not persisted across sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartConfigs {
    pub histogram: HistogramConfig,
    pub boxplot: BoxplotConfig,
    pub scatter: ScatterConfig,
    pub heatmap: HeatmapConfig,
    pub missing_bars: MissingBarsConfig,
    pub imputation: ImputationConfig,
}

// ---------------------------------------------------------------------------
// Column allow-list
// ---------------------------------------------------------------------------

/// The measurement columns the dashboard exposes. The clean dataset is
/// restricted to `permitted`; the raw dataset additionally carries
/// `raw_extra` (a pollutant dropped during cleaning for excessive missing
/// values).
#[derive(Debug, Clone)]
pub struct AllowedColumns {
    pub permitted: Vec<String>,
    pub raw_extra: Vec<String>,
}

impl Default for AllowedColumns {
    fn default() -> Self {
        let permitted = [
            "CO(GT)",
            "PT08.S1(CO)",
            "C6H6(GT)",
            "PT08.S2(NMHC)",
            "NOx(GT)",
            "PT08.S3(NOx)",
            "NO2(GT)",
            "PT08.S4(NO2)",
            "PT08.S5(O3)",
            "T",
            "RH",
            "AH",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        AllowedColumns {
            permitted,
            raw_extra: vec!["NMHC(GT)".to_string()],
        }
    }
}

impl AllowedColumns {
    /// Permitted columns for the raw dataset (allow-list plus the extra).
    pub fn raw_permitted(&self) -> Vec<String> {
        let mut cols = self.permitted.clone();
        cols.extend(self.raw_extra.iter().cloned());
        cols
    }

    /// Restrict a clean dataset to the allow-list.
    pub fn clean_view(&self, ds: &Dataset) -> Dataset {
        ds.select(&self.permitted)
    }

    /// Restrict a raw dataset to the allow-list plus the raw-only extra.
    pub fn raw_view(&self, ds: &Dataset) -> Dataset {
        ds.select(&self.raw_permitted())
    }
}

/// Reference measurements (ground truth) among the given column names.
pub fn reference_columns<'a>(names: &[&'a str]) -> Vec<&'a str> {
    names.iter().copied().filter(|n| n.contains("(GT)")).collect()
}

/// MOX sensor channels among the given column names.
pub fn sensor_columns<'a>(names: &[&'a str]) -> Vec<&'a str> {
    names
        .iter()
        .copied()
        .filter(|n| n.starts_with("PT08."))
        .collect()
}
