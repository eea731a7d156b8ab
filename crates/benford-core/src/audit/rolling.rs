//! Sliding-window MAD and MSE over the valid features in original order.

use crate::config::AnalysisConfig;
use crate::digits::expected::expected;
use crate::digits::extraction::DigitBase;
use crate::error::BenfordError;
use crate::sample::Sample;
use crate::statistics::frequency::FrequencyTable;
use crate::statistics::goodness_of_fit::{mean_absolute_deviation, mean_squared_error};
use crate::types::TestKind;
use crate::BenfordResult;

fn rolling(
    sample: &Sample,
    kind: TestKind,
    window: usize,
    config: &AnalysisConfig,
    statistic: fn(&[f64], &[f64]) -> f64,
) -> BenfordResult<Vec<f64>> {
    if window == 0 {
        return Err(BenfordError::config("window", "must be at least 1"));
    }
    let base = DigitBase::new(sample, config.decimals, config.sign);
    let features = base.valid_features(kind);
    if features.len() < window {
        return Ok(Vec::new());
    }

    let probabilities = &expected(kind).probabilities;
    let mut table = FrequencyTable::from_features(kind, &features[..window]);
    let mut out = Vec::with_capacity(features.len() - window + 1);
    out.push(statistic(&table.found(), probabilities));
    for (incoming, outgoing) in features[window..].iter().zip(&features) {
        table.remove(*outgoing);
        table.add(*incoming);
        out.push(statistic(&table.found(), probabilities));
    }
    Ok(out)
}

/// MAD of each window of `window` consecutive valid entries.
pub fn rolling_mad(
    sample: &Sample,
    kind: TestKind,
    window: usize,
    config: &AnalysisConfig,
) -> BenfordResult<Vec<f64>> {
    rolling(sample, kind, window, config, mean_absolute_deviation)
}

pub fn rolling_mse(
    sample: &Sample,
    kind: TestKind,
    window: usize,
    config: &AnalysisConfig,
) -> BenfordResult<Vec<f64>> {
    rolling(sample, kind, window, config, mean_squared_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::functions::mad;

    fn ten() -> Sample {
        Sample::Integers(vec![12, 25, 31, 47, 18, 190, 1234, 5, 62, 11])
    }

    #[test]
    fn test_output_length() {
        let r = rolling_mad(&ten(), TestKind::FirstDigit, 3, &AnalysisConfig::default()).unwrap();
        assert_eq!(r.len(), 8);
        assert!(r.iter().all(|m| (0.0..=1.0).contains(m)));
    }

    #[test]
    fn test_window_matches_direct_mad() {
        let config = AnalysisConfig::default();
        let r = rolling_mad(&ten(), TestKind::FirstDigit, 4, &config).unwrap();
        let second_window = Sample::Integers(vec![25, 31, 47, 18]);
        let direct = mad(&second_window, TestKind::FirstDigit, &config).unwrap();
        assert!((r[1] - direct).abs() < 1e-12);
    }

    #[test]
    fn test_full_window_single_value() {
        let config = AnalysisConfig::default();
        let r = rolling_mse(&ten(), TestKind::FirstDigit, 10, &config).unwrap();
        assert_eq!(r.len(), 1);
        assert!(rolling_mse(&ten(), TestKind::FirstDigit, 11, &config)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_window_counts_only_valid_entries() {
        // 5 has no second digit, leaving nine valid entries
        let r = rolling_mad(&ten(), TestKind::SecondDigit, 3, &AnalysisConfig::default()).unwrap();
        assert_eq!(r.len(), 7);
    }

    #[test]
    fn test_zero_window_rejected() {
        let r = rolling_mad(&ten(), TestKind::FirstDigit, 0, &AnalysisConfig::default());
        assert!(matches!(r, Err(BenfordError::InvalidConfiguration { .. })));
    }
}
