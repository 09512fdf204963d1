use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const COLUMNS: &[&str] = &[
    "CO(GT)",
    "PT08.S1(CO)",
    "NMHC(GT)",
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
];

const HOURS: usize = 24 * 90;

/// One hour of synthetic measurements: references follow a diurnal cycle,
/// sensor channels respond to them with gain, offset and noise.
fn sample_row(hour: usize, rng: &mut SimpleRng) -> Vec<f64> {
    let t = hour as f64;
    let diurnal = (t * std::f64::consts::TAU / 24.0).sin();

    let co = (2.0 + 1.2 * diurnal + rng.gauss(0.0, 0.3)).max(0.1);
    let nmhc = (150.0 + 60.0 * diurnal + rng.gauss(0.0, 20.0)).max(1.0);
    let c6h6 = (9.0 + 4.0 * diurnal + rng.gauss(0.0, 1.0)).max(0.1);
    let nox = (180.0 + 90.0 * diurnal + rng.gauss(0.0, 25.0)).max(1.0);
    let no2 = (100.0 + 40.0 * diurnal + rng.gauss(0.0, 12.0)).max(1.0);
    let temp = 15.0 + 8.0 * diurnal + rng.gauss(0.0, 1.5);
    let rh = (50.0 - 10.0 * diurnal + rng.gauss(0.0, 4.0)).clamp(5.0, 95.0);
    let ah = (0.8 + 0.2 * diurnal + rng.gauss(0.0, 0.05)).max(0.05);

    // Slow gain decay so the drift chart has something to show.
    let decay = 1.0 - 0.02 * (t / HOURS as f64);

    vec![
        co,
        (900.0 + 220.0 * co * decay + rng.gauss(0.0, 30.0)).max(1.0),
        nmhc,
        c6h6,
        (700.0 + 40.0 * c6h6 + rng.gauss(0.0, 25.0)).max(1.0),
        nox,
        (1200.0 - 2.0 * nox + rng.gauss(0.0, 40.0)).max(1.0),
        no2,
        (1000.0 + 4.5 * no2 + rng.gauss(0.0, 35.0)).max(1.0),
        (700.0 + 120.0 * co + rng.gauss(0.0, 40.0)).max(1.0),
        temp,
        rh,
        ah,
    ]
}

fn format_cell(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v:.3}")
    }
}

fn write_dataset(path: &Path, timestamps: &[NaiveDateTime], rows: &[Vec<f64>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["DateTime".to_string()];
    header.extend(COLUMNS.iter().map(|c| c.to_string()));
    writer.write_record(&header)?;

    for (ts, row) in timestamps.iter().zip(rows.iter()) {
        let mut record = vec![ts.format("%Y-%m-%d %H:%M:%S").to_string()];
        record.extend(row.iter().map(|&v| format_cell(v)));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Fill gaps by linear interpolation between the nearest present values.
fn interpolate(series: &[f64]) -> Vec<f64> {
    let mut out = series.to_vec();
    let n = out.len();
    let mut i = 0;
    while i < n {
        if !out[i].is_nan() {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && out[i].is_nan() {
            i += 1;
        }
        let before = start.checked_sub(1).map(|j| out[j]);
        let after = if i < n { Some(out[i]) } else { None };
        for (k, slot) in out.iter_mut().enumerate().take(i).skip(start) {
            *slot = match (before, after) {
                (Some(a), Some(b)) => {
                    let frac = (k - start + 1) as f64 / (i - start + 1) as f64;
                    a + (b - a) * frac
                }
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => f64::NAN,
            };
        }
    }
    out
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let base = NaiveDate::from_ymd_opt(2004, 3, 10)
        .and_then(|d| d.and_hms_opt(18, 0, 0))
        .context("bad base timestamp")?;
    let timestamps: Vec<NaiveDateTime> =
        (0..HOURS as i64).map(|h| base + Duration::hours(h)).collect();

    let mut raw: Vec<Vec<f64>> = (0..HOURS).map(|h| sample_row(h, &mut rng)).collect();

    // Knock out values: scattered dropouts everywhere, and NMHC(GT) almost
    // entirely missing like the real station.
    let nmhc_idx = COLUMNS
        .iter()
        .position(|&c| c == "NMHC(GT)")
        .context("NMHC(GT) not in column list")?;
    for row in raw.iter_mut() {
        for (c, v) in row.iter_mut().enumerate() {
            let p = if c == nmhc_idx { 0.92 } else { 0.04 };
            if rng.next_f64() < p {
                *v = f64::NAN;
            }
        }
    }

    // The clean dataset drops NMHC(GT) and interpolates the rest.
    let clean_cols: Vec<usize> = (0..COLUMNS.len()).filter(|&c| c != nmhc_idx).collect();
    let clean: Vec<Vec<f64>> = {
        let interpolated: Vec<Vec<f64>> = (0..COLUMNS.len())
            .map(|c| interpolate(&raw.iter().map(|r| r[c]).collect::<Vec<_>>()))
            .collect();
        (0..HOURS)
            .map(|r| clean_cols.iter().map(|&c| interpolated[c][r]).collect())
            .collect()
    };

    let data_dir = Path::new("Data");
    write_dataset(
        &data_dir.join("raw").join("AirQualityUCI_cleaned_columns_and_rows_any.csv"),
        &timestamps,
        &raw,
    )?;

    // Rewrite the clean file with its reduced column set.
    {
        let path = data_dir.join("processed").join("air_quality_UCI_cleaned.csv");
        fs::create_dir_all(path.parent().context("no parent")?)?;
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut header = vec!["DateTime".to_string()];
        header.extend(clean_cols.iter().map(|&c| COLUMNS[c].to_string()));
        writer.write_record(&header)?;
        for (ts, row) in timestamps.iter().zip(clean.iter()) {
            let mut record = vec![ts.format("%Y-%m-%d %H:%M:%S").to_string()];
            record.extend(row.iter().map(|&v| format_cell(v)));
            writer.write_record(&record)?;
        }
        writer.flush()?;
    }

    // Missing-value summary over the raw data.
    {
        let path = data_dir.join("processed").join("missing_values_summary.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["Column", "Raw_Missing_%"])?;
        for (c, name) in COLUMNS.iter().enumerate() {
            let missing = raw.iter().filter(|r| r[c].is_nan()).count();
            let pct = 100.0 * missing as f64 / HOURS as f64;
            writer.write_record([name.to_string(), format!("{pct:.2}")])?;
        }
        writer.flush()?;
    }

    println!("Wrote sample data for {HOURS} hours under {}", data_dir.display());
    Ok(())
}
