//! Digit extraction from raw values.
//!
//! Every entry is first reduced to a digits-only integer magnitude (ZN).
//! All digit features are then derived from ZN with integer arithmetic:
//! the digit count comes from `u128::ilog10`, so exact powers of ten can
//! never be shifted by a float rounding in `log10`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::digits::mantissa::mantissa;
use crate::sample::{Number, Sample};
use crate::types::{Precision, SignFilter, TestKind};

/// Maximum digits kept by [`Precision::Infer`].
pub const INFER_MAX_DIGITS: usize = 5;

/// Decimal digits of `u128::MAX`.
const MAX_ZN_DIGITS: usize = 39;

// ---------------------------------------------------------------------------
// Magnitude
// ---------------------------------------------------------------------------

/// Digits-only magnitude of a raw entry.
///
/// Integers use their absolute value and ignore `precision`.
pub fn magnitude(value: Number, precision: Precision) -> u128 {
    match value {
        Number::Int(v) => u128::from(v.unsigned_abs()),
        Number::Float(v) => match precision {
            Precision::Fixed(decimals) => scale_fixed(v.abs(), decimals),
            Precision::Infer => infer_digits(v.abs()),
        },
    }
}

/// Truncate `abs` after `decimals` places, working on its shortest
/// round-trip decimal string so the result matches the printed digits.
fn scale_fixed(abs: f64, decimals: u32) -> u128 {
    if abs == 0.0 {
        return 0;
    }
    let text = abs.to_string();
    let exact = Decimal::from_str_exact(&text).ok().and_then(|d| {
        let mut scaled = d;
        for _ in 0..decimals {
            scaled = scaled.checked_mul(dec!(10))?;
        }
        scaled.trunc().to_u128()
    });
    // Outside Decimal range or scale: shift the digit string itself.
    exact.unwrap_or_else(|| shift_digits(&text, decimals))
}

/// Move the radix point of a plain decimal string `decimals` places to the
/// right and truncate, saturating at `u128::MAX`.
fn shift_digits(text: &str, decimals: u32) -> u128 {
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text, ""));
    let decimals = decimals as usize;
    // every padding zero past 39 digits overflows u128 for a non-zero value
    if decimals > frac_part.len() + MAX_ZN_DIGITS {
        return u128::MAX;
    }
    let frac: String = frac_part
        .chars()
        .chain(std::iter::repeat('0'))
        .take(decimals)
        .collect();
    let digits = format!("{int_part}{frac}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u128::MAX)
}

/// Remove the radix point and leading zeros, keep the first five digits.
///
/// Integral floats print without a radix point, so one is added first:
/// `45.0` reads as `"45.0"` and yields 450.
fn infer_digits(abs: f64) -> u128 {
    let mut text = abs.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    let digits: String = text
        .chars()
        .filter(|c| *c != '.')
        .skip_while(|c| *c == '0')
        .take(INFER_MAX_DIGITS)
        .collect();
    digits.parse().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// Number of decimal digits in `zn`; zero has none.
pub fn digit_count(zn: u128) -> u32 {
    zn.checked_ilog10().map_or(0, |l| l + 1)
}

/// First `n` digits of `zn`, or `None` when `zn < 10^(n-1)`.
pub fn first_digits(zn: u128, n: u32) -> Option<u16> {
    if n == 0 || zn < 10u128.pow(n - 1) {
        return None;
    }
    let shift = digit_count(zn) - n;
    u16::try_from(zn / 10u128.pow(shift)).ok()
}

pub fn second_digit(zn: u128) -> Option<u16> {
    first_digits(zn, 2).map(|d| d % 10)
}

/// `zn mod 100`, defined only from four digits up.
pub fn last_two_digits(zn: u128) -> Option<u16> {
    if zn < TestKind::LastTwoDigits.threshold() {
        return None;
    }
    u16::try_from(zn % 100).ok()
}

/// Feature value of `zn` for a test, `None` when `zn` is below the
/// test's threshold.
pub fn feature(zn: u128, kind: TestKind) -> Option<u16> {
    if zn < kind.threshold() {
        return None;
    }
    match kind {
        TestKind::FirstDigit => first_digits(zn, 1),
        TestKind::FirstTwoDigits => first_digits(zn, 2),
        TestKind::FirstThreeDigits => first_digits(zn, 3),
        TestKind::SecondDigit => second_digit(zn),
        TestKind::LastTwoDigits => last_two_digits(zn),
    }
}

// ---------------------------------------------------------------------------
// Prepared base
// ---------------------------------------------------------------------------

/// Entries discarded per test because ZN is below the feature threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardTally {
    pub f1d: usize,
    pub f2d: usize,
    pub f3d: usize,
    pub sd: usize,
    pub l2d: usize,
}

impl DiscardTally {
    pub fn get(&self, kind: TestKind) -> usize {
        match kind {
            TestKind::FirstDigit => self.f1d,
            TestKind::FirstTwoDigits => self.f2d,
            TestKind::FirstThreeDigits => self.f3d,
            TestKind::SecondDigit => self.sd,
            TestKind::LastTwoDigits => self.l2d,
        }
    }

    fn set(&mut self, kind: TestKind, count: usize) {
        match kind {
            TestKind::FirstDigit => self.f1d = count,
            TestKind::FirstTwoDigits => self.f2d = count,
            TestKind::FirstThreeDigits => self.f3d = count,
            TestKind::SecondDigit => self.sd = count,
            TestKind::LastTwoDigits => self.l2d = count,
        }
    }
}

/// Sign-filtered sample with ZN, every digit feature and the mantissas.
#[derive(Debug, Clone)]
pub struct DigitBase {
    values: Vec<Number>,
    magnitudes: Vec<u128>,
    features: [Vec<Option<u16>>; 5],
    mantissas: Vec<f64>,
    dropped_non_finite: usize,
}

impl DigitBase {
    pub fn new(sample: &Sample, precision: Precision, sign: SignFilter) -> Self {
        let (filtered, dropped_non_finite) = sample.filtered(sign);
        let values: Vec<Number> = filtered.iter().collect();
        let magnitudes: Vec<u128> = values.iter().map(|&v| magnitude(v, precision)).collect();
        let features = TestKind::ALL.map(|kind| {
            magnitudes
                .iter()
                .map(|&zn| feature(zn, kind))
                .collect::<Vec<_>>()
        });
        let mantissas = values.iter().map(|v| mantissa(v.as_f64())).collect();
        DigitBase {
            values,
            magnitudes,
            features,
            mantissas,
            dropped_non_finite,
        }
    }

    /// Number of entries that passed the sign filter.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Number] {
        &self.values
    }

    pub fn magnitudes(&self) -> &[u128] {
        &self.magnitudes
    }

    pub fn mantissas(&self) -> &[f64] {
        &self.mantissas
    }

    pub fn dropped_non_finite(&self) -> usize {
        self.dropped_non_finite
    }

    /// Per-entry feature column, `None` marking discarded entries.
    pub fn feature_column(&self, kind: TestKind) -> &[Option<u16>] {
        &self.features[kind.index()]
    }

    /// Valid feature values in original order.
    pub fn valid_features(&self, kind: TestKind) -> Vec<u16> {
        self.feature_column(kind)
            .iter()
            .flatten()
            .copied()
            .collect()
    }

    pub fn discarded(&self, kind: TestKind) -> usize {
        self.feature_column(kind)
            .iter()
            .filter(|f| f.is_none())
            .count()
    }

    pub fn discard_tally(&self) -> DiscardTally {
        let mut tally = DiscardTally::default();
        for kind in TestKind::ALL {
            tally.set(kind, self.discarded(kind));
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_magnitude_ignores_decimals() {
        assert_eq!(magnitude(Number::Int(-1234), Precision::Fixed(2)), 1234);
        assert_eq!(
            magnitude(Number::Int(i64::MIN), Precision::Infer),
            1u128 << 63
        );
    }

    #[test]
    fn test_fixed_truncates_not_rounds() {
        assert_eq!(magnitude(Number::Float(12.349), Precision::Fixed(2)), 1234);
        assert_eq!(magnitude(Number::Float(-0.999), Precision::Fixed(1)), 9);
    }

    #[test]
    fn test_fixed_matches_printed_digits() {
        // 0.29 * 100.0 is 28.999999999999996 in binary floating point
        assert_eq!(magnitude(Number::Float(0.29), Precision::Fixed(2)), 29);
        assert_eq!(magnitude(Number::Float(1.15), Precision::Fixed(2)), 115);
    }

    #[test]
    fn test_fixed_zero_decimals() {
        assert_eq!(magnitude(Number::Float(100.0), Precision::Fixed(0)), 100);
        assert_eq!(magnitude(Number::Float(0.5), Precision::Fixed(0)), 0);
    }

    #[test]
    fn test_fixed_huge_value_falls_back() {
        let zn = magnitude(Number::Float(1e30), Precision::Fixed(2));
        assert_eq!(first_digits(zn, 1), Some(1));
        assert_eq!(digit_count(zn), 33);
    }

    #[test]
    fn test_infer_strips_point_and_zeros() {
        assert_eq!(magnitude(Number::Float(0.00123), Precision::Infer), 123);
        assert_eq!(
            magnitude(Number::Float(123.456789), Precision::Infer),
            12345
        );
        assert_eq!(magnitude(Number::Float(-45.5), Precision::Infer), 455);
    }

    #[test]
    fn test_infer_integral_floats_keep_trailing_zero() {
        let zn = magnitude(Number::Float(45.0), Precision::Infer);
        assert_eq!(zn, 450);
        assert_eq!(feature(zn, TestKind::FirstThreeDigits), Some(450));

        let zn = magnitude(Number::Float(1234.0), Precision::Infer);
        assert_eq!(zn, 12340);
        assert_eq!(feature(zn, TestKind::LastTwoDigits), Some(40));
    }

    #[test]
    fn test_fixed_beyond_decimal_scale() {
        // 29 fractional digits in the shortest string
        let zn = magnitude(Number::Float(1.2345e-25), Precision::Fixed(30));
        assert_eq!(zn, 123_450);
        let zn = magnitude(Number::Float(0.5), Precision::Fixed(35));
        assert_eq!(zn, 5 * 10u128.pow(34));
    }

    #[test]
    fn test_fixed_huge_decimals_saturate() {
        let zn = magnitude(Number::Float(1.5), Precision::Fixed(4_000_000_000));
        assert_eq!(zn, u128::MAX);
        assert_eq!(
            magnitude(Number::Float(0.0), Precision::Fixed(4_000_000_000)),
            0
        );
        assert_eq!(shift_digits("0.25", 38), 25 * 10u128.pow(36));
    }

    #[test]
    fn test_powers_of_ten() {
        for exp in 0..30u32 {
            let zn = 10u128.pow(exp);
            assert_eq!(digit_count(zn), exp + 1);
            assert_eq!(first_digits(zn, 1), Some(1));
            if exp >= 1 {
                assert_eq!(first_digits(zn, 2), Some(10));
                assert_eq!(second_digit(zn), Some(0));
            }
            if exp >= 2 {
                assert_eq!(first_digits(zn, 3), Some(100));
            }
            // one below a power of ten keeps all nines
            if exp >= 3 {
                assert_eq!(first_digits(zn - 1, 3), Some(999));
            }
        }
    }

    #[test]
    fn test_hundred_point_zero() {
        let zn = magnitude(Number::Float(100.0), Precision::Fixed(0));
        assert_eq!(feature(zn, TestKind::FirstDigit), Some(1));
        assert_eq!(feature(zn, TestKind::FirstTwoDigits), Some(10));
        assert_eq!(feature(zn, TestKind::FirstThreeDigits), Some(100));
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(feature(0, TestKind::FirstDigit), None);
        assert_eq!(feature(9, TestKind::FirstTwoDigits), None);
        assert_eq!(feature(9, TestKind::SecondDigit), None);
        assert_eq!(feature(99, TestKind::FirstThreeDigits), None);
        assert_eq!(feature(999, TestKind::LastTwoDigits), None);
        assert_eq!(feature(1000, TestKind::LastTwoDigits), Some(0));
        assert_eq!(feature(123_456, TestKind::LastTwoDigits), Some(56));
        assert_eq!(feature(123_456, TestKind::SecondDigit), Some(2));
    }

    #[test]
    fn test_feature_defined_from_threshold() {
        for kind in TestKind::ALL {
            let t = kind.threshold();
            assert_eq!(feature(t - 1, kind), None, "{kind}");
            assert!(feature(t, kind).is_some(), "{kind}");
        }
    }

    #[test]
    fn test_base_discarded_counts() {
        let sample = Sample::Integers(vec![0, 5, 42, 137, 2024, -7, 0]);
        let base = DigitBase::new(&sample, Precision::Fixed(0), SignFilter::All);
        assert_eq!(base.len(), 5);
        let tally = base.discard_tally();
        assert_eq!(tally.f1d, 0);
        assert_eq!(tally.f2d, 2);
        assert_eq!(tally.sd, 2);
        assert_eq!(tally.f3d, 3);
        assert_eq!(tally.l2d, 4);
        assert_eq!(
            base.valid_features(TestKind::FirstTwoDigits),
            vec![42, 13, 20]
        );
    }

    #[test]
    fn test_base_sign_filter() {
        let sample = Sample::Floats(vec![1.5, -2.5, 3.5]);
        let base = DigitBase::new(&sample, Precision::Fixed(1), SignFilter::Neg);
        assert_eq!(base.magnitudes(), &[25]);
    }
}
