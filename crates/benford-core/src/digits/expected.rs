//! Theoretical Benford distributions per test kind.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::types::TestKind;

/// Feature value → expected probability, ordered by feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedDistribution {
    pub kind: TestKind,
    pub digits: Vec<u16>,
    pub probabilities: Vec<f64>,
}

impl ExpectedDistribution {
    fn compute(kind: TestKind) -> Self {
        let digits: Vec<u16> = kind.domain().collect();
        let probabilities = digits
            .iter()
            .map(|&d| match kind {
                TestKind::FirstDigit | TestKind::FirstTwoDigits | TestKind::FirstThreeDigits => {
                    leading_probability(d)
                }
                TestKind::SecondDigit => (1..=9u16)
                    .map(|a| leading_probability(10 * a + d))
                    .sum::<f64>(),
                // 1/99 over 100 buckets; the reference distribution sums to 100/99
                TestKind::LastTwoDigits => 1.0 / 99.0,
            })
            .collect();
        ExpectedDistribution {
            kind,
            digits,
            probabilities,
        }
    }

    /// Position of `digit` in the table.
    pub fn position(&self, digit: u16) -> Option<usize> {
        let start = *self.kind.domain().start();
        let idx = usize::from(digit.checked_sub(start)?);
        (idx < self.digits.len()).then_some(idx)
    }

    pub fn probability(&self, digit: u16) -> Option<f64> {
        self.position(digit).map(|i| self.probabilities[i])
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.digits
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }
}

/// `log10(1 + 1/d)`.
fn leading_probability(d: u16) -> f64 {
    (1.0 + 1.0 / f64::from(d)).log10()
}

static EXPECTED: OnceLock<[ExpectedDistribution; 5]> = OnceLock::new();

/// Expected distribution for `kind`, computed once per process.
pub fn expected(kind: TestKind) -> &'static ExpectedDistribution {
    let all = EXPECTED.get_or_init(|| TestKind::ALL.map(ExpectedDistribution::compute));
    &all[kind.index()]
}
