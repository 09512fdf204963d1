use nalgebra::{DMatrix, DVector};

// ---------------------------------------------------------------------------
// Univariate ordinary least squares
// ---------------------------------------------------------------------------

/// Result of a univariate fit `y = slope * x + intercept`. Ephemeral:
/// computed fresh per request, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form OLS fit. `None` with fewer than two points or zero x-variance.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xx: f64 = x.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();

    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    Some(LinearFit { slope, intercept })
}

// ---------------------------------------------------------------------------
// Multivariate least squares
// ---------------------------------------------------------------------------

/// Coefficients of a multivariate fit. The last entry is the bias term.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFit {
    pub coeffs: Vec<f64>,
}

impl MultiFit {
    /// Prediction for one observation (same predictor order as the fit).
    pub fn predict(&self, predictors: &[f64]) -> f64 {
        debug_assert_eq!(predictors.len() + 1, self.coeffs.len());
        let bias = self.coeffs[self.coeffs.len() - 1];
        predictors
            .iter()
            .zip(self.coeffs.iter())
            .map(|(x, c)| x * c)
            .sum::<f64>()
            + bias
    }
}

/// Least-squares solve of `target ~ predictors + bias` via SVD, which yields
/// the minimum-norm solution when the design matrix is rank-deficient.
///
/// `predictors` holds one slice per predictor column; all slices and
/// `target` must be the same length (rows with missing values are expected
/// to be dropped by the caller). `None` when there are no predictors, no
/// rows, or the SVD solve fails.
pub fn fit_multivariate(predictors: &[&[f64]], target: &[f64]) -> Option<MultiFit> {
    let rows = target.len();
    let cols = predictors.len();
    if rows == 0 || cols == 0 {
        return None;
    }
    debug_assert!(predictors.iter().all(|p| p.len() == rows));

    // Design matrix with an appended bias column of ones.
    let design = DMatrix::from_fn(rows, cols + 1, |r, c| {
        if c == cols {
            1.0
        } else {
            predictors[c][r]
        }
    });
    let rhs = DVector::from_column_slice(target);

    let svd = design.svd(true, true);
    let solution = svd.solve(&rhs, 1e-12).ok()?;
    Some(MultiFit {
        coeffs: solution.iter().copied().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_linear_relationship() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 3.0).collect();

        let fit = fit_line(&x, &y).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 3.0).abs() < 1e-9);
        assert!((fit.predict(10.0) - 23.0).abs() < 1e-9);
    }

    #[test]
    fn fit_line_rejects_degenerate_input() {
        assert!(fit_line(&[], &[]).is_none());
        assert!(fit_line(&[1.0], &[2.0]).is_none());
        // Zero x-variance: vertical line has no OLS solution.
        assert!(fit_line(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn fit_line_with_noise_stays_close() {
        let x: Vec<f64> = (0..100).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.5 * v - 0.5 + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();
        let fit = fit_line(&x, &y).unwrap();
        assert!((fit.slope - 1.5).abs() < 0.01);
        assert!((fit.intercept + 0.5).abs() < 0.02);
    }

    #[test]
    fn multivariate_recovers_exact_coefficients() {
        // y = 2*a - 1*b + 0.5, over a small grid.
        let a: Vec<f64> = (0..30).map(|i| (i % 6) as f64).collect();
        let b: Vec<f64> = (0..30).map(|i| (i / 6) as f64).collect();
        let y: Vec<f64> = a
            .iter()
            .zip(b.iter())
            .map(|(&ai, &bi)| 2.0 * ai - bi + 0.5)
            .collect();

        let fit = fit_multivariate(&[&a, &b], &y).unwrap();
        assert_eq!(fit.coeffs.len(), 3);
        assert!((fit.coeffs[0] - 2.0).abs() < 1e-8);
        assert!((fit.coeffs[1] + 1.0).abs() < 1e-8);
        assert!((fit.coeffs[2] - 0.5).abs() < 1e-8);
        assert!((fit.predict(&[3.0, 1.0]) - 5.5).abs() < 1e-8);
    }

    #[test]
    fn multivariate_handles_rank_deficiency() {
        // Second predictor is an exact copy of the first: rank-deficient
        // design, the SVD solve must still produce a finite fit.
        let a: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let dup = a.clone();
        let y: Vec<f64> = a.iter().map(|&v| 3.0 * v + 1.0).collect();

        let fit = fit_multivariate(&[&a, &dup], &y).unwrap();
        assert!(fit.coeffs.iter().all(|c| c.is_finite()));
        // The duplicated predictors share the weight, predictions still match.
        assert!((fit.predict(&[4.0, 4.0]) - 13.0).abs() < 1e-6);
    }

    #[test]
    fn multivariate_rejects_empty_input() {
        assert!(fit_multivariate(&[], &[1.0, 2.0]).is_none());
        let empty: &[f64] = &[];
        assert!(fit_multivariate(&[empty], &[]).is_none());
    }
}
