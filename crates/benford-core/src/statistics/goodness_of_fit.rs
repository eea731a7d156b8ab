//! Deviation statistics between found and expected bucket frequencies.
//!
//! Every function here takes parallel slices ordered by feature value.
//! Buckets whose expected mass is not strictly positive are skipped
//! wherever the formula would divide by it.

use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Sample size used for Z-scores: the lesser of `n` and the cap.
pub fn effective_n(n: u64, limit_n: Option<u64>) -> u64 {
    match limit_n {
        Some(limit) if limit < n => limit,
        _ => n,
    }
}

/// Continuity-corrected one-proportion Z statistic.
///
/// Negative values are legitimate: the absolute deviation is smaller
/// than the `1/(2N)` correction.
pub fn z_score(found: f64, expected: f64, n: u64) -> Option<f64> {
    if n == 0 || expected <= 0.0 || expected >= 1.0 {
        return None;
    }
    let n = n as f64;
    let abs_dif = (found - expected).abs();
    let std_err = (expected * (1.0 - expected) / n).sqrt();
    Some((abs_dif - 1.0 / (2.0 * n)) / std_err)
}

/// Pearson chi-square over counts against `total * expected`.
pub fn chi_square_statistic(counts: &[u64], expected: &[f64], total: u64) -> f64 {
    let total = total as f64;
    counts
        .iter()
        .zip(expected)
        .filter_map(|(&count, &p)| {
            let expected_count = total * p;
            if expected_count > 0.0 {
                let diff = count as f64 - expected_count;
                Some(diff * diff / expected_count)
            } else {
                None
            }
        })
        .sum()
}

/// Upper-tail probability of the chi-square statistic.
pub fn chi_square_p_value(statistic: f64, degrees_of_freedom: u32) -> Option<f64> {
    if degrees_of_freedom == 0 || !statistic.is_finite() {
        return None;
    }
    let dist = ChiSquared::new(f64::from(degrees_of_freedom)).ok()?;
    Some((1.0 - dist.cdf(statistic)).clamp(0.0, 1.0))
}

/// Kolmogorov-Smirnov supremum of the cumulative difference.
pub fn ks_supremum(found: &[f64], expected: &[f64]) -> f64 {
    let mut cum_found = 0.0;
    let mut cum_expected = 0.0;
    let mut suprem: f64 = 0.0;
    for (f, e) in found.iter().zip(expected) {
        cum_found += f;
        cum_expected += e;
        suprem = suprem.max((cum_found - cum_expected).abs());
    }
    suprem
}

pub fn mean_absolute_deviation(found: &[f64], expected: &[f64]) -> f64 {
    if found.is_empty() {
        return 0.0;
    }
    found
        .iter()
        .zip(expected)
        .map(|(f, e)| (f - e).abs())
        .sum::<f64>()
        / found.len() as f64
}

pub fn mean_squared_error(found: &[f64], expected: &[f64]) -> f64 {
    if found.is_empty() {
        return 0.0;
    }
    found
        .iter()
        .zip(expected)
        .map(|(f, e)| (f - e).powi(2))
        .sum::<f64>()
        / found.len() as f64
}

/// Lower and upper bounds of the acceptance band around `expected`.
pub fn confidence_bounds(expected: f64, n: u64, z_critical: f64) -> Option<(f64, f64)> {
    if n == 0 {
        return None;
    }
    let n = n as f64;
    let sig = z_critical * (expected * (1.0 - expected) / n).sqrt();
    let correction = 1.0 / (2.0 * n);
    let upper = expected + sig + correction;
    let lower = (expected - sig - correction).max(0.0);
    Some((lower, upper))
}
