//! Descriptive statistics over `f64` slices.
//!
//! Every function tolerates an empty input and returns 0 instead of NaN;
//! callers filter out non-finite samples before anything lands here, so no
//! statistic can poison a report.

/// Arithmetic mean. Empty input reads as 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median; the midpoint average for even-length input. Empty input reads as 0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Largest sample, 0 for empty input.
pub fn max(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Smallest sample, 0 for empty input.
pub fn min(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Sample standard deviation (n - 1 denominator). Fewer than two samples read
/// as 0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// An ordinary least-squares line fitted over `(index, value)` pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Evaluates the fitted line at position `x`.
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a least-squares line to `values` against their indices `0..n-1`.
/// Degenerate inputs (empty, single sample, zero x-variance) yield a flat
/// line through the mean.
pub fn linear_regression(values: &[f64]) -> LinearFit {
    let n = values.len();
    if n == 0 {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
        };
    }
    let mean_y = mean(values);
    if n == 1 {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
        };
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .map(|(i, y)| {
            let dx = i as f64 - mean_x;
            (dx * (y - mean_y), dx * dx)
        })
        .fold((0.0, 0.0), |acc, (xy, xx)| (acc.0 + xy, acc.1 + xx));

    if sxx == 0.0 {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
        };
    }
    let slope = sxy / sxx;
    LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    }
}

/// Pearson correlation coefficient over the two series, truncated to the
/// shorter length. Reads as 0 when either series has zero variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = mean(&x[..n]);
    let mean_y = mean(&y[..n]);

    let (covariance, var_x, var_y) = x[..n]
        .iter()
        .zip(y[..n].iter())
        .map(|(a, b)| {
            let dx = a - mean_x;
            let dy = b - mean_y;
            (dx * dy, dx * dx, dy * dy)
        })
        .fold((0.0, 0.0, 0.0), |acc, (c, vx, vy)| {
            (acc.0 + c, acc.1 + vx, acc.2 + vy)
        });

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    covariance / denominator
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
