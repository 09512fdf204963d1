use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::regression::fit_line;

/// Months with fewer paired observations than this are skipped entirely,
/// never zero-filled.
pub const MIN_MONTHLY_SAMPLES: usize = 20;

/// One point of the drift series: the slope of the sensor→reference fit for
/// a single calendar month, labelled with the month's last day.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftPoint {
    pub month_end: NaiveDate,
    pub slope: f64,
}

/// Group paired (sensor, reference) observations into calendar-month
/// buckets, fit a line per bucket with at least `min_samples` rows, and
/// return the slopes in chronological order.
pub fn monthly_slopes(
    rows: &[(NaiveDateTime, f64, f64)],
    min_samples: usize,
) -> Vec<DriftPoint> {
    let mut buckets: BTreeMap<(i32, u32), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for &(t, x, y) in rows {
        let bucket = buckets.entry((t.year(), t.month())).or_default();
        bucket.0.push(x);
        bucket.1.push(y);
    }

    buckets
        .into_iter()
        .filter(|(_, (xs, _))| xs.len() >= min_samples)
        .filter_map(|((year, month), (xs, ys))| {
            let fit = fit_line(&xs, &ys)?;
            Some(DriftPoint {
                month_end: month_end(year, month),
                slope: fit.slope,
            })
        })
        .collect()
}

/// Last calendar day of the given month.
fn month_end(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("valid month arithmetic")
        .pred_opt()
        .expect("month start has a predecessor")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly_rows(
        year: i32,
        month: u32,
        count: usize,
        slope: f64,
    ) -> Vec<(NaiveDateTime, f64, f64)> {
        (0..count)
            .map(|i| {
                let day = 1 + (i / 24) as u32;
                let hour = (i % 24) as u32;
                let t = NaiveDate::from_ymd_opt(year, month, day)
                    .unwrap()
                    .and_hms_opt(hour, 0, 0)
                    .unwrap();
                let x = i as f64;
                (t, x, slope * x + 1.0)
            })
            .collect()
    }

    #[test]
    fn skips_months_below_threshold() {
        let mut rows = hourly_rows(2004, 3, 30, 2.0);
        rows.extend(hourly_rows(2004, 4, 10, 5.0)); // below 20 observations
        rows.extend(hourly_rows(2004, 5, 25, 3.0));

        let series = monthly_slopes(&rows, MIN_MONTHLY_SAMPLES);
        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].month_end,
            NaiveDate::from_ymd_opt(2004, 3, 31).unwrap()
        );
        assert_eq!(
            series[1].month_end,
            NaiveDate::from_ymd_opt(2004, 5, 31).unwrap()
        );
        assert!((series[0].slope - 2.0).abs() < 1e-9);
        assert!((series[1].slope - 3.0).abs() < 1e-9);
    }

    #[test]
    fn output_is_chronological_across_years() {
        let mut rows = hourly_rows(2005, 1, 25, 1.0);
        rows.extend(hourly_rows(2004, 12, 25, 2.0));

        let series = monthly_slopes(&rows, 20);
        assert_eq!(series.len(), 2);
        assert!(series[0].month_end < series[1].month_end);
        assert_eq!(
            series[0].month_end,
            NaiveDate::from_ymd_opt(2004, 12, 31).unwrap()
        );
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(monthly_slopes(&[], MIN_MONTHLY_SAMPLES).is_empty());
    }

    #[test]
    fn month_end_handles_december_and_leap_february() {
        assert_eq!(
            month_end(2004, 12),
            NaiveDate::from_ymd_opt(2004, 12, 31).unwrap()
        );
        assert_eq!(
            month_end(2004, 2),
            NaiveDate::from_ymd_opt(2004, 2, 29).unwrap()
        );
    }
}
