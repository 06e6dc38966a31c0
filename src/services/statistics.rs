//! Sample statistics shared by the risk calculators.
//!
//! Moments follow the usual sample conventions (n − 1 denominators, bias-corrected
//! skewness and excess kurtosis). Degenerate inputs yield NaN or 0 as documented per
//! function; callers run results through `finite_or_zero`.

use statrs::statistics::Statistics;

// Second moments below this are treated as zero variance.
const MOMENT_TOLERANCE: f64 = 1e-14;

pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Sample variance; NaN for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    values.iter().variance()
}

/// Sample standard deviation; NaN for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    values.iter().std_dev()
}

/// Sample covariance of two equally long series.
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().covariance(b.iter())
}

/// Pearson correlation; NaN when either side has zero variance.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    covariance(a, b) / (std_dev(a) * std_dev(b))
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is a fraction in [0, 1]. Returns NaN for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let m = mean(values);
    let (m2, m3, m4) = values.iter().fold((0.0, 0.0, 0.0), |(s2, s3, s4), &v| {
        let d = v - m;
        let d2 = d * d;
        (s2 + d2, s3 + d2 * d, s4 + d2 * d2)
    });
    (m2 / n, m3 / n, m4 / n)
}

/// Bias-corrected sample skewness (G1).
///
/// NaN for fewer than three values, 0 for a constant series.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return f64::NAN;
    }

    let (m2, m3, _) = central_moments(values);
    if m2 < MOMENT_TOLERANCE {
        return 0.0;
    }

    let n = n as f64;
    let g1 = m3 / m2.powf(1.5);
    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// Bias-corrected sample excess kurtosis (G2).
///
/// NaN for fewer than four values, 0 for a constant series.
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 4 {
        return f64::NAN;
    }

    let (m2, _, m4) = central_moments(values);
    if m2 < MOMENT_TOLERANCE {
        return 0.0;
    }

    let n = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
}
