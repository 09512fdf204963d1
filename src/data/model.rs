use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Column – one named series of the table
// ---------------------------------------------------------------------------

/// A named numeric series. `NaN` marks a missing value, mirroring how the
/// source CSVs encode blanks.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Values with missing entries dropped.
    pub fn non_missing(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).collect()
    }

    /// Number of non-missing entries.
    pub fn non_missing_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Fraction of missing entries (0.0 for an empty column).
    pub fn missing_fraction(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let missing = self.values.len() - self.non_missing_count();
        missing as f64 / self.values.len() as f64
    }

    pub fn is_all_missing(&self) -> bool {
        self.non_missing_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Dataset – timestamp-indexed table
// ---------------------------------------------------------------------------

/// A table indexed by timestamp. All columns have the same length as the
/// index. The "clean" variant contains no missing values; the "raw" variant
/// may.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Row index, ascending by convention of the source files.
    pub timestamps: Vec<NaiveDateTime>,
    /// Named series, in source-file order.
    pub columns: Vec<Column>,
}

impl Dataset {
    pub fn new(timestamps: Vec<NaiveDateTime>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == timestamps.len()));
        Dataset {
            timestamps,
            columns,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// A new dataset keeping only the listed columns, in the listed order.
    /// Names not present in the table are skipped.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Dataset {
        let columns = names
            .iter()
            .filter_map(|n| self.column(n.as_ref()).cloned())
            .collect();
        Dataset {
            timestamps: self.timestamps.clone(),
            columns,
        }
    }

    /// Paired values of two columns over rows where both are non-missing.
    /// `None` if either column does not exist.
    pub fn paired(&self, a: &str, b: &str) -> Option<(Vec<f64>, Vec<f64>)> {
        let ca = self.column(a)?;
        let cb = self.column(b)?;
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for (&x, &y) in ca.values.iter().zip(cb.values.iter()) {
            if !x.is_nan() && !y.is_nan() {
                xs.push(x);
                ys.push(y);
            }
        }
        Some((xs, ys))
    }

    /// Like [`paired`](Self::paired) but keeping the timestamp of each
    /// surviving row, for time-grouped analysis.
    pub fn paired_with_times(
        &self,
        a: &str,
        b: &str,
    ) -> Option<Vec<(NaiveDateTime, f64, f64)>> {
        let ca = self.column(a)?;
        let cb = self.column(b)?;
        let rows = self
            .timestamps
            .iter()
            .zip(ca.values.iter().zip(cb.values.iter()))
            .filter(|(_, (x, y))| !x.is_nan() && !y.is_nan())
            .map(|(&t, (&x, &y))| (t, x, y))
            .collect();
        Some(rows)
    }

    /// Rows where every listed column is non-missing, as one `Vec<f64>` per
    /// column in the listed order. `None` if any column is absent.
    pub fn complete_rows(&self, names: &[&str]) -> Option<Vec<Vec<f64>>> {
        let cols: Vec<&Column> = names
            .iter()
            .map(|n| self.column(n))
            .collect::<Option<Vec<_>>>()?;

        let mut out: Vec<Vec<f64>> = vec![Vec::new(); cols.len()];
        for row in 0..self.len() {
            if cols.iter().all(|c| !c.values[row].is_nan()) {
                for (k, c) in cols.iter().enumerate() {
                    out[k].push(c.values[row]);
                }
            }
        }
        Some(out)
    }
}

// ---------------------------------------------------------------------------
// MissingReport – per-column missing percentages
// ---------------------------------------------------------------------------

/// One row of the missing-value report: a source column and the percentage
/// of its values that were missing before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingEntry {
    pub column: String,
    pub missing_pct: f64,
}

/// Summary of per-column missing percentages, already filtered of entries
/// that carry no information (blank names, 100% missing).
#[derive(Debug, Clone, Default)]
pub struct MissingReport {
    pub entries: Vec<MissingEntry>,
}

impl MissingReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
