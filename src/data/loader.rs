use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use super::error::{DataError, Result};
use super::model::{Column, Dataset, MissingEntry, MissingReport};

/// Name of the index column in both dataset files.
const INDEX_COLUMN: &str = "DateTime";

/// Timestamp formats accepted for the index, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

// ---------------------------------------------------------------------------
// Dataset loader
// ---------------------------------------------------------------------------

/// Load a timestamp-indexed dataset from a CSV file.
///
/// Returns `Ok(None)` when the file does not exist (the caller shows a
/// "no data" state). The loaded table goes through a fixed cleaning pass:
/// 1. drop columns whose every value is missing
/// 2. drop rows whose every value is missing
/// 3. drop `Unnamed*` / blank-named columns
/// 4. drop columns whose non-missing fraction is zero
pub fn load_dataset(path: &Path) -> Result<Option<Dataset>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let index_idx =
        headers
            .iter()
            .position(|h| h == INDEX_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                column: INDEX_COLUMN.to_string(),
                path: path.to_path_buf(),
            })?;

    let value_headers: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index_idx)
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut timestamps: Vec<NaiveDateTime> = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); value_headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;

        let raw_ts = record.get(index_idx).unwrap_or("");
        let ts = parse_timestamp(raw_ts).ok_or_else(|| DataError::InvalidTimestamp {
            value: raw_ts.to_string(),
            row: row_no,
            path: path.to_path_buf(),
        })?;
        timestamps.push(ts);

        for (k, (col_idx, _)) in value_headers.iter().enumerate() {
            let cell = record.get(*col_idx).unwrap_or("");
            values[k].push(parse_cell(cell));
        }
    }

    let columns: Vec<Column> = value_headers
        .into_iter()
        .zip(values)
        .map(|((_, name), vals)| Column::new(name, vals))
        .collect();

    let dataset = clean_dataset(Dataset::new(timestamps, columns));
    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(Some(dataset))
}

/// Parse the index cell; date-only values get a midnight time.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Blank or unparseable cells become NaN (missing).
fn parse_cell(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Cleaning passes
// ---------------------------------------------------------------------------

fn clean_dataset(ds: Dataset) -> Dataset {
    let ds = drop_all_missing_columns(ds);
    let ds = drop_all_missing_rows(ds);
    let ds = drop_unnamed_columns(ds);
    drop_zero_coverage_columns(ds)
}

fn drop_all_missing_columns(mut ds: Dataset) -> Dataset {
    ds.columns.retain(|c| !c.is_all_missing());
    ds
}

fn drop_all_missing_rows(ds: Dataset) -> Dataset {
    let keep: Vec<usize> = (0..ds.len())
        .filter(|&row| ds.columns.iter().any(|c| !c.values[row].is_nan()))
        .collect();
    if keep.len() == ds.len() {
        return ds;
    }

    let timestamps = keep.iter().map(|&i| ds.timestamps[i]).collect();
    let columns = ds
        .columns
        .into_iter()
        .map(|c| {
            let values = keep.iter().map(|&i| c.values[i]).collect();
            Column::new(c.name, values)
        })
        .collect();
    Dataset::new(timestamps, columns)
}

fn drop_unnamed_columns(mut ds: Dataset) -> Dataset {
    ds.columns
        .retain(|c| !is_unnamed(&c.name) && !c.name.trim().is_empty());
    ds
}

fn drop_zero_coverage_columns(mut ds: Dataset) -> Dataset {
    ds.columns.retain(|c| c.missing_fraction() < 1.0);
    ds
}

/// Artifact columns that pandas writes for a blank header.
pub(crate) fn is_unnamed(name: &str) -> bool {
    name.starts_with("Unnamed")
}

// ---------------------------------------------------------------------------
// Missing-report loader
// ---------------------------------------------------------------------------

/// The two header schemas the report has shipped with over time.
const REPORT_SCHEMAS: &[(&str, &str)] = &[
    ("Column", "Raw_Missing_%"),
    ("Variable", "Missing Percentage"),
];

/// One report row, under either historical header spelling. The percentage
/// stays a string so a malformed cell skips the row instead of aborting
/// the whole load.
#[derive(Debug, Deserialize)]
struct ReportRow {
    #[serde(rename = "Column", alias = "Variable")]
    column: String,
    #[serde(rename = "Raw_Missing_%", alias = "Missing Percentage")]
    missing_pct: String,
}

/// Load the per-column missing-value report.
///
/// Both historical header spellings are accepted (`Column`/`Raw_Missing_%`
/// and `Variable`/`Missing Percentage`). Entries with blank or `Unnamed*`
/// names, an unparseable percentage, or 100% missing are dropped.
pub fn load_missing_report(path: &Path) -> Result<Option<MissingReport>> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let schema_known = REPORT_SCHEMAS.iter().any(|(name_col, pct_col)| {
        headers.iter().any(|h| h == name_col) && headers.iter().any(|h| h == pct_col)
    });
    if !schema_known {
        return Err(DataError::UnknownReportSchema {
            path: path.to_path_buf(),
            headers,
        });
    }

    let mut entries = Vec::new();
    for result in reader.deserialize::<ReportRow>() {
        let row = result?;
        let name = row.column.trim();
        if name.is_empty() || is_unnamed(name) {
            continue;
        }
        let Ok(pct) = row.missing_pct.trim().parse::<f64>() else {
            continue;
        };
        // 100% missing carries no information.
        if pct >= 100.0 {
            continue;
        }
        entries.push(MissingEntry {
            column: name.to_string(),
            missing_pct: pct,
        });
    }

    log::info!(
        "Loaded missing report with {} entries from {}",
        entries.len(),
        path.display()
    );
    Ok(Some(MissingReport { entries }))
}
