//! One-shot entry points that run a single test without a session.
//!
//! Each call extracts digits from the sample with the given configuration
//! and evaluates against [`CriticalTables::shared`].

use crate::config::AnalysisConfig;
use crate::digits::extraction::DigitBase;
use crate::error::BenfordError;
use crate::sample::Sample;
use crate::statistics::frequency::FrequencyTable;
use crate::statistics::goodness_of_fit::{mean_absolute_deviation, mean_squared_error};
use crate::statistics::result::TestResult;
use crate::tables::CriticalTables;
use crate::types::TestKind;
use crate::BenfordResult;

use super::battery::run_kind;

pub fn digit_test(
    sample: &Sample,
    kind: TestKind,
    config: &AnalysisConfig,
) -> BenfordResult<TestResult> {
    let base = DigitBase::new(sample, config.decimals, config.sign);
    Ok(run_kind(
        &base,
        kind,
        &config.settings(CriticalTables::shared()),
    ))
}

/// First, first-two or first-three digits test; `digits` must be 1, 2 or 3.
pub fn first_digits(
    sample: &Sample,
    digits: u8,
    config: &AnalysisConfig,
) -> BenfordResult<TestResult> {
    let kind = match digits {
        1 => TestKind::FirstDigit,
        2 => TestKind::FirstTwoDigits,
        3 => TestKind::FirstThreeDigits,
        other => {
            return Err(BenfordError::InvalidTestKind(format!(
                "{other} leading digits; must be 1, 2 or 3"
            )))
        }
    };
    digit_test(sample, kind, config)
}

pub fn second_digit(sample: &Sample, config: &AnalysisConfig) -> BenfordResult<TestResult> {
    digit_test(sample, TestKind::SecondDigit, config)
}

pub fn last_two_digits(sample: &Sample, config: &AnalysisConfig) -> BenfordResult<TestResult> {
    digit_test(sample, TestKind::LastTwoDigits, config)
}

fn found_and_expected(
    sample: &Sample,
    kind: TestKind,
    config: &AnalysisConfig,
) -> (Vec<f64>, &'static [f64]) {
    let base = DigitBase::new(sample, config.decimals, config.sign);
    let freq = FrequencyTable::from_features(kind, &base.valid_features(kind));
    (freq.found(), crate::digits::expected(kind).probabilities.as_slice())
}

/// Mean absolute deviation only, skipping every other statistic.
pub fn mad(sample: &Sample, kind: TestKind, config: &AnalysisConfig) -> BenfordResult<f64> {
    let (found, expected) = found_and_expected(sample, kind, config);
    Ok(mean_absolute_deviation(&found, expected))
}

pub fn mse(sample: &Sample, kind: TestKind, config: &AnalysisConfig) -> BenfordResult<f64> {
    let (found, expected) = found_and_expected(sample, kind, config);
    Ok(mean_squared_error(&found, expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hundreds() -> Sample {
        Sample::Integers((1..=9).map(|d| d * 100).collect())
    }

    #[test]
    fn test_first_digits_rejects_four() {
        let r = first_digits(&hundreds(), 4, &AnalysisConfig::default());
        assert!(matches!(r, Err(BenfordError::InvalidTestKind(_))));
    }

    #[test]
    fn test_mad_matches_full_test() {
        let config = AnalysisConfig::default();
        let full = digit_test(&hundreds(), TestKind::FirstDigit, &config).unwrap();
        let quick = mad(&hundreds(), TestKind::FirstDigit, &config).unwrap();
        assert!((full.mad.value - quick).abs() < 1e-15);
        let quick_mse = mse(&hundreds(), TestKind::FirstDigit, &config).unwrap();
        assert!((full.mse - quick_mse).abs() < 1e-15);
    }

    #[test]
    fn test_wrappers_pick_the_kind() {
        let config = AnalysisConfig::default();
        assert_eq!(
            second_digit(&hundreds(), &config).unwrap().kind,
            TestKind::SecondDigit
        );
        let l2d = last_two_digits(&hundreds(), &config).unwrap();
        // every entry is below 1000
        assert_eq!(l2d.n, 0);
        assert_eq!(l2d.discarded, 9);
    }
}
