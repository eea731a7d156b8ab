//! Summation test: share of the total absolute amount per leading-digit group.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::digits::extraction::DigitBase;
use crate::error::BenfordError;
use crate::sample::Sample;
use crate::types::TestKind;
use crate::BenfordResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummationRow {
    pub digit: u16,
    pub sum: f64,
    pub percent: f64,
    pub abs_dif: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummationResult {
    pub kind: TestKind,
    pub n: usize,
    pub total: f64,
    /// Uniform share every group should hold: `1 / (9 * 10^(digits - 1))`.
    pub expected: f64,
    /// Every group of the domain, ordered by digit.
    pub rows: Vec<SummationRow>,
    pub mad: f64,
}

impl SummationResult {
    /// Groups ordered by largest deviation first.
    pub fn top(&self, n: usize) -> Vec<&SummationRow> {
        let mut rows: Vec<&SummationRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.abs_dif.total_cmp(&a.abs_dif).then(a.digit.cmp(&b.digit)));
        rows.truncate(n);
        rows
    }
}

fn check_kind(kind: TestKind) -> BenfordResult<u32> {
    kind.leading_digits().ok_or_else(|| {
        BenfordError::InvalidTestKind(format!("{kind}; the summation test needs F1D, F2D or F3D"))
    })
}

pub(crate) fn summation_from_base(
    base: &DigitBase,
    kind: TestKind,
) -> BenfordResult<SummationResult> {
    let digits = check_kind(kind)?;
    let domain = kind.domain();
    let start = *domain.start();
    let mut sums = vec![0.0f64; kind.bucket_count()];
    let mut n = 0usize;
    for (value, digit) in base.values().iter().zip(base.feature_column(kind)) {
        if let Some(d) = digit {
            sums[usize::from(d - start)] += value.as_f64().abs();
            n += 1;
        }
    }

    let total: f64 = sums.iter().sum();
    let expected = 1.0 / (9.0 * 10f64.powi(digits as i32 - 1));
    let rows: Vec<SummationRow> = domain
        .zip(&sums)
        .map(|(digit, &sum)| {
            let percent = if total > 0.0 { sum / total } else { 0.0 };
            SummationRow {
                digit,
                sum,
                percent,
                abs_dif: (percent - expected).abs(),
            }
        })
        .collect();
    let mad = rows.iter().map(|r| r.abs_dif).sum::<f64>() / rows.len() as f64;

    debug!(test = kind.label(), n, total, mad, "summation computed");
    Ok(SummationResult {
        kind,
        n,
        total,
        expected,
        rows,
        mad,
    })
}

pub fn summation_test(
    sample: &Sample,
    kind: TestKind,
    config: &AnalysisConfig,
) -> BenfordResult<SummationResult> {
    check_kind(kind)?;
    let base = DigitBase::new(sample, config.decimals, config.sign);
    summation_from_base(&base, kind)
}

/// MAD of the summation test alone.
pub fn mad_summ(sample: &Sample, kind: TestKind, config: &AnalysisConfig) -> BenfordResult<f64> {
    summation_test(sample, kind, config).map(|r| r.mad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_sums_by_first_digit() {
        let sample = Sample::Integers(vec![100, -150, 200, 900]);
        let r = summation_test(&sample, TestKind::FirstDigit, &AnalysisConfig::default()).unwrap();
        assert_eq!(r.rows.len(), 9);
        assert_eq!(r.n, 4);
        assert_eq!(r.total, 1350.0);
        assert_eq!(r.rows[0].sum, 250.0);
        assert!(approx_eq(r.rows[0].percent, 250.0 / 1350.0, 1e-12));
        assert_eq!(r.rows[4].sum, 0.0);
        assert!(approx_eq(r.expected, 1.0 / 9.0, 1e-15));
    }

    #[test]
    fn test_uniform_sums_have_zero_mad() {
        // 2520 / d entries of d * 100: every group sums to 252000
        let values: Vec<i64> = (1..=9i64)
            .flat_map(|d| std::iter::repeat(d * 100).take((2520 / d) as usize))
            .collect();
        let r = summation_test(
            &Sample::Integers(values),
            TestKind::FirstDigit,
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert!(r.rows.iter().all(|row| row.sum == 252_000.0));
        assert!(r.mad < 1e-12);
    }

    #[test]
    fn test_only_first_digits_family() {
        let sample = Sample::Integers(vec![123, 456]);
        for kind in [TestKind::SecondDigit, TestKind::LastTwoDigits] {
            assert!(matches!(
                mad_summ(&sample, kind, &AnalysisConfig::default()),
                Err(BenfordError::InvalidTestKind(_))
            ));
        }
    }

    #[test]
    fn test_empty_sample() {
        let r = summation_test(
            &Sample::Floats(vec![]),
            TestKind::FirstDigit,
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(r.total, 0.0);
        assert!(r.rows.iter().all(|row| row.percent == 0.0));
    }

    #[test]
    fn test_top_orders_by_deviation() {
        let sample = Sample::Integers(vec![900, 900, 100]);
        let r = summation_test(&sample, TestKind::FirstDigit, &AnalysisConfig::default()).unwrap();
        let top = r.top(2);
        assert_eq!(top[0].digit, 9);
        assert_eq!(top.len(), 2);
    }
}
