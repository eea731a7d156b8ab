//! Per-test result assembly.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::digits::expected::expected;
use crate::statistics::frequency::FrequencyTable;
use crate::statistics::goodness_of_fit::{
    chi_square_p_value, chi_square_statistic, confidence_bounds, effective_n, ks_supremum,
    mean_absolute_deviation, mean_squared_error, z_score,
};
use crate::tables::{CriticalTables, MadConformity, MadThresholds};
use crate::types::{Confidence, TestKind};

/// One bucket of a digit test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitFrequency {
    pub digit: u16,
    pub counts: u64,
    pub found: f64,
    pub expected: f64,
    pub abs_dif: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareStat {
    pub statistic: f64,
    pub degrees_of_freedom: u32,
    pub critical: Option<f64>,
    pub p_value: Option<f64>,
    pub conforms: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KsStat {
    pub statistic: f64,
    /// Table value divided by sqrt(N).
    pub critical: Option<f64>,
    pub conforms: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MadStat {
    pub value: f64,
    pub thresholds: Option<MadThresholds>,
    pub conformity: Option<MadConformity>,
}

/// Which buckets to list as significant deviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighZ {
    /// Found above expected with Z past the critical value.
    Positive,
    /// Found below expected with Z past the critical value.
    Negative,
    /// Any bucket with Z past the critical value.
    All,
    /// The `n` largest Z scores (largest absolute deviations without confidence).
    Top(usize),
}

/// Confidence-dependent parameters shared by every test of a run.
#[derive(Debug, Clone, Copy)]
pub struct TestSettings<'a> {
    pub confidence: Option<Confidence>,
    pub limit_n: Option<u64>,
    pub tables: &'a CriticalTables,
}

/// Outcome of one digit test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub kind: TestKind,
    /// Entries counted.
    pub n: u64,
    /// Sample size used for the Z scores.
    pub effective_n: u64,
    pub discarded: usize,
    pub confidence: Option<Confidence>,
    pub z_critical: Option<f64>,
    pub table: Vec<DigitFrequency>,
    pub chi_square: ChiSquareStat,
    pub ks: KsStat,
    pub mad: MadStat,
    pub mse: f64,
    pub notices: Vec<String>,
}

impl TestResult {
    pub fn row(&self, digit: u16) -> Option<&DigitFrequency> {
        self.table.iter().find(|r| r.digit == digit)
    }

    /// Buckets whose deviation is significant under `high_z`, highest Z first.
    pub fn significant_deviations(&self, high_z: HighZ) -> Vec<&DigitFrequency> {
        let mut rows: Vec<&DigitFrequency> = match (high_z, self.z_critical) {
            (HighZ::Top(_), None) => {
                let mut rows: Vec<&DigitFrequency> = self.table.iter().collect();
                rows.sort_by(|a, b| b.abs_dif.total_cmp(&a.abs_dif));
                rows
            }
            (HighZ::Top(_), Some(_)) => self.table.iter().filter(|r| r.z_score.is_some()).collect(),
            (_, None) => Vec::new(),
            (filter, Some(crit)) => self
                .table
                .iter()
                .filter(|r| r.z_score.is_some_and(|z| z > crit))
                .filter(|r| match filter {
                    HighZ::Positive => r.found > r.expected,
                    HighZ::Negative => r.found < r.expected,
                    _ => true,
                })
                .collect(),
        };
        if self.z_critical.is_some() {
            rows.sort_by(|a, b| {
                let za = a.z_score.unwrap_or(f64::NEG_INFINITY);
                let zb = b.z_score.unwrap_or(f64::NEG_INFINITY);
                zb.total_cmp(&za)
            });
        }
        if let HighZ::Top(n) = high_z {
            rows.truncate(n);
        }
        rows
    }

    /// Per-bucket `(lower, upper)` acceptance band; needs a confidence level.
    pub fn confidence_band(&self) -> Option<Vec<(f64, f64)>> {
        let crit = self.z_critical?;
        self.table
            .iter()
            .map(|r| confidence_bounds(r.expected, self.effective_n, crit))
            .collect()
    }
}

/// Run one digit test over already-extracted valid feature values.
pub fn run_digit_test(
    kind: TestKind,
    features: &[u16],
    discarded: usize,
    settings: &TestSettings<'_>,
) -> TestResult {
    let tables = settings.tables;
    let dist = expected(kind);
    let freq = FrequencyTable::from_features(kind, features);
    let n = freq.total();
    let n_eff = effective_n(n, settings.limit_n);
    let found = freq.found();
    let mut notices = Vec::new();

    let z_critical = settings.confidence.and_then(|c| tables.z_critical(c));
    let table: Vec<DigitFrequency> = dist
        .iter()
        .zip(freq.counts())
        .zip(&found)
        .map(|(((digit, exp), &counts), &fnd)| DigitFrequency {
            digit,
            counts,
            found: fnd,
            expected: exp,
            abs_dif: (fnd - exp).abs(),
            z_score: z_critical.and_then(|_| z_score(fnd, exp, n_eff)),
        })
        .collect();

    let degrees_of_freedom = (dist.len() - 1) as u32;
    let chi_stat = chi_square_statistic(freq.counts(), &dist.probabilities, n);
    let ks_stat = ks_supremum(&found, &dist.probabilities);

    let (chi_critical, ks_critical) = match settings.confidence {
        Some(_) if n == 0 => {
            notices.push(format!(
                "{}: no valid entries, conformity verdicts skipped",
                kind.name()
            ));
            (None, None)
        }
        Some(c) => (
            tables.chi_square_critical(degrees_of_freedom, c),
            tables.ks_critical(c).map(|k| k / (n as f64).sqrt()),
        ),
        None => {
            notices.push(format!(
                "{}: chi-square and Kolmogorov-Smirnov verdicts need a confidence level other than none",
                kind.name()
            ));
            (None, None)
        }
    };
    if settings.confidence.is_some() && n > 0 && chi_critical.is_none() {
        notices.push(format!(
            "{}: no critical chi-square value for {degrees_of_freedom} degrees of freedom",
            kind.name()
        ));
    }

    let chi_square = ChiSquareStat {
        statistic: chi_stat,
        degrees_of_freedom,
        critical: chi_critical,
        p_value: if n > 0 {
            chi_square_p_value(chi_stat, degrees_of_freedom)
        } else {
            None
        },
        conforms: chi_critical.map(|crit| chi_stat < crit),
    };
    let ks = KsStat {
        statistic: ks_stat,
        critical: ks_critical,
        conforms: ks_critical.map(|crit| ks_stat < crit),
    };

    let mad_value = mean_absolute_deviation(&found, &dist.probabilities);
    let thresholds = tables.mad_thresholds(kind);
    let mad = MadStat {
        value: mad_value,
        thresholds,
        conformity: thresholds.filter(|_| n > 0).map(|t| t.classify(mad_value)),
    };
    let mse = mean_squared_error(&found, &dist.probabilities);

    for notice in &notices {
        warn!(test = kind.label(), "{notice}");
    }
    debug!(
        test = kind.label(),
        n,
        effective_n = n_eff,
        discarded,
        mad = mad_value,
        chi_square = chi_stat,
        ks = ks_stat,
        "digit test computed"
    );

    TestResult {
        kind,
        n,
        effective_n: n_eff,
        discarded,
        confidence: settings.confidence,
        z_critical,
        table,
        chi_square,
        ks,
        mad,
        mse,
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn settings(tables: &CriticalTables, confidence: Option<Confidence>) -> TestSettings<'_> {
        TestSettings {
            confidence,
            limit_n: None,
            tables,
        }
    }

    #[test]
    fn test_one_per_digit() {
        let tables = CriticalTables::standard();
        let features: Vec<u16> = (1..=9).collect();
        let r = run_digit_test(
            TestKind::FirstDigit,
            &features,
            0,
            &settings(&tables, Some(Confidence::NinetyFive)),
        );
        assert_eq!(r.table.len(), 9);
        assert!(r.table.iter().all(|row| row.counts == 1));
        let one = r.row(1).unwrap();
        assert!(approx_eq(one.found, 1.0 / 9.0, 1e-12));
        assert!(approx_eq(one.abs_dif, 0.190, 1e-3));
        assert_eq!(r.chi_square.degrees_of_freedom, 8);
        assert_eq!(r.chi_square.critical, Some(15.507));
        assert!(approx_eq(r.ks.critical.unwrap(), 1.36 / 3.0, 1e-12));
    }

    #[test]
    fn test_without_confidence() {
        let tables = CriticalTables::standard();
        let r = run_digit_test(
            TestKind::SecondDigit,
            &[1, 2, 3],
            4,
            &settings(&tables, None),
        );
        assert!(r.table.iter().all(|row| row.z_score.is_none()));
        assert_eq!(r.chi_square.critical, None);
        assert_eq!(r.chi_square.conforms, None);
        assert_eq!(r.ks.conforms, None);
        assert!(r.chi_square.statistic > 0.0);
        assert_eq!(r.discarded, 4);
        assert_eq!(r.notices.len(), 1);
    }

    #[test]
    fn test_empty_features() {
        let tables = CriticalTables::standard();
        let r = run_digit_test(
            TestKind::LastTwoDigits,
            &[],
            7,
            &settings(&tables, Some(Confidence::NinetyFive)),
        );
        assert_eq!(r.n, 0);
        assert_eq!(r.chi_square.conforms, None);
        assert!(r.table.iter().all(|row| row.z_score.is_none()));
        assert!(r.mad.conformity.is_none());
        assert!(!r.notices.is_empty());
    }

    #[test]
    fn test_limit_n_caps_z_sample() {
        let tables = CriticalTables::standard();
        let features: Vec<u16> = std::iter::repeat(1).take(1000).collect();
        let s = TestSettings {
            confidence: Some(Confidence::NinetyFive),
            limit_n: Some(100),
            tables: &tables,
        };
        let r = run_digit_test(TestKind::FirstDigit, &features, 0, &s);
        assert_eq!(r.n, 1000);
        assert_eq!(r.effective_n, 100);
        let uncapped = run_digit_test(
            TestKind::FirstDigit,
            &features,
            0,
            &settings(&tables, Some(Confidence::NinetyFive)),
        );
        let capped_z = r.row(1).unwrap().z_score.unwrap();
        assert!(capped_z < uncapped.row(1).unwrap().z_score.unwrap());
    }

    #[test]
    fn test_significant_deviations() {
        let tables = CriticalTables::standard();
        let features: Vec<u16> = std::iter::repeat(5).take(500).chain(1..=9).collect();
        let r = run_digit_test(
            TestKind::FirstDigit,
            &features,
            0,
            &settings(&tables, Some(Confidence::NinetyFive)),
        );
        let pos = r.significant_deviations(HighZ::Positive);
        assert_eq!(pos.len(), 1);
        assert_eq!(pos[0].digit, 5);
        let neg = r.significant_deviations(HighZ::Negative);
        assert!(neg.iter().all(|row| row.found < row.expected));
        assert!(neg.iter().any(|row| row.digit == 1));
        assert_eq!(r.significant_deviations(HighZ::Top(2)).len(), 2);
    }

    #[test]
    fn test_top_without_confidence_uses_abs_dif() {
        let tables = CriticalTables::standard();
        let features: Vec<u16> = std::iter::repeat(9).take(50).collect();
        let r = run_digit_test(TestKind::FirstDigit, &features, 0, &settings(&tables, None));
        let top = r.significant_deviations(HighZ::Top(1));
        assert_eq!(top[0].digit, 9);
        assert!(r.significant_deviations(HighZ::All).is_empty());
    }

    #[test]
    fn test_confidence_band() {
        let tables = CriticalTables::standard();
        let features: Vec<u16> = (1..=9).cycle().take(90).collect();
        let r = run_digit_test(
            TestKind::FirstDigit,
            &features,
            0,
            &settings(&tables, Some(Confidence::NinetyNine)),
        );
        let band = r.confidence_band().unwrap();
        assert_eq!(band.len(), 9);
        for ((lower, upper), row) in band.iter().zip(&r.table) {
            assert!(*lower <= row.expected && row.expected <= *upper);
        }
    }

    #[test]
    fn test_serde() {
        let tables = CriticalTables::standard();
        let r = run_digit_test(
            TestKind::FirstDigit,
            &[1, 2, 3],
            0,
            &settings(&tables, Some(Confidence::NinetyFive)),
        );
        let j = serde_json::to_string(&r).unwrap();
        let back: TestResult = serde_json::from_str(&j).unwrap();
        assert_eq!(back.table.len(), 9);
        assert_eq!(back.kind, TestKind::FirstDigit);
    }
}
