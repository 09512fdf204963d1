// ---------------------------------------------------------------------------
// Descriptive statistics shared by the chart builders
// ---------------------------------------------------------------------------

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (n − 1 denominator).
pub fn sample_std(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return f64::NAN;
    }
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|&x| (x - m) * (x - m)).sum();
    (ss / (xs.len() - 1) as f64).sqrt()
}

/// Pearson correlation of two equally-long slices. NaN when either side has
/// no variance or fewer than two points.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let mx = mean(x);
    let my = mean(y);

    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (&a, &b) in x.iter().zip(y.iter()) {
        let da = a - mx;
        let db = b - my;
        cov += da * db;
        vx += da * da;
        vy += db * db;
    }
    if vx <= 0.0 || vy <= 0.0 {
        return f64::NAN;
    }
    cov / (vx.sqrt() * vy.sqrt())
}

/// Pairwise Pearson correlation matrix over pairwise-complete observations
/// (rows where both columns of a pair are non-missing). The diagonal is
/// exactly 1.0.
pub fn correlation_matrix(columns: &[&[f64]]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];

    for i in 0..k {
        matrix[i][i] = 1.0;
        for j in (i + 1)..k {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for (&a, &b) in columns[i].iter().zip(columns[j].iter()) {
                if !a.is_nan() && !b.is_nan() {
                    xs.push(a);
                    ys.push(b);
                }
            }
            let r = pearson(&xs, &ys);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

// ---------------------------------------------------------------------------
// Gaussian kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE with Silverman's rule-of-thumb bandwidth. Used for the
/// density overlay on histograms.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// `None` when a usable bandwidth cannot be derived (fewer than two
    /// samples, or zero spread).
    pub fn new(samples: &[f64]) -> Option<Self> {
        if samples.len() < 2 {
            return None;
        }
        let std = sample_std(samples);
        let iqr = interquartile_range(samples);
        let spread = if iqr > 0.0 { std.min(iqr / 1.34) } else { std };
        if !(spread > 0.0) {
            return None;
        }
        let bandwidth = 0.9 * spread * (samples.len() as f64).powf(-0.2);
        Some(GaussianKde {
            samples: samples.to_vec(),
            bandwidth,
        })
    }

    /// Density at a single point.
    pub fn density(&self, x: f64) -> f64 {
        const INV_SQRT_TAU: f64 = 0.398_942_280_401_432_7;
        let h = self.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let u = (x - s) / h;
                INV_SQRT_TAU * (-0.5 * u * u).exp()
            })
            .sum();
        sum / (self.samples.len() as f64 * h)
    }

    /// Densities over an evenly spaced grid of `steps` points on [lo, hi].
    pub fn evaluate_grid(&self, lo: f64, hi: f64, steps: usize) -> Vec<(f64, f64)> {
        if steps < 2 || !(hi > lo) {
            return Vec::new();
        }
        let dx = (hi - lo) / (steps - 1) as f64;
        (0..steps)
            .map(|i| {
                let x = lo + i as f64 * dx;
                (x, self.density(x))
            })
            .collect()
    }
}

fn interquartile_range(xs: &[f64]) -> f64 {
    quantile_sorted(&sorted(xs), 0.75) - quantile_sorted(&sorted(xs), 0.25)
}

pub(crate) fn sorted(xs: &[f64]) -> Vec<f64> {
    let mut v = xs.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Linear-interpolation quantile of an already sorted slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
