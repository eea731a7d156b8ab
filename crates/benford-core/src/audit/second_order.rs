//! Second-order test: the digit battery over the gaps of the sorted sample.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audit::battery::run_battery;
use crate::config::AnalysisConfig;
use crate::digits::extraction::{DigitBase, DiscardTally};
use crate::error::BenfordError;
use crate::sample::Sample;
use crate::statistics::result::TestResult;
use crate::tables::CriticalTables;
use crate::types::TestKind;
use crate::BenfordResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondOrderResult {
    /// Non-zero differences analysed after the sign filter.
    pub n_differences: usize,
    pub discarded: DiscardTally,
    /// One result per kind, in [`TestKind::ALL`] order.
    pub results: Vec<TestResult>,
}

impl SecondOrderResult {
    pub fn result(&self, kind: TestKind) -> Option<&TestResult> {
        self.results.iter().find(|r| r.kind == kind)
    }
}

/// Sort ascending and take `x[i] - x[i-1]`, dropping zero differences.
///
/// Non-finite floats are removed before sorting. Integer differences
/// that overflow `i64` are rejected.
pub fn second_order_differences(sample: &Sample) -> BenfordResult<Sample> {
    match sample {
        Sample::Integers(values) => {
            let mut sorted = values.clone();
            sorted.sort_unstable();
            let mut diffs = Vec::with_capacity(sorted.len().saturating_sub(1));
            for pair in sorted.windows(2) {
                let diff = pair[1].checked_sub(pair[0]).ok_or_else(|| {
                    BenfordError::InvalidDataType(format!(
                        "difference {} - {} overflows a 64-bit integer",
                        pair[1], pair[0]
                    ))
                })?;
                if diff != 0 {
                    diffs.push(diff);
                }
            }
            Ok(Sample::Integers(diffs))
        }
        Sample::Floats(values) => {
            let mut sorted: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
            sorted.sort_by(f64::total_cmp);
            let diffs = sorted
                .windows(2)
                .map(|pair| pair[1] - pair[0])
                .filter(|d| *d != 0.0)
                .collect();
            Ok(Sample::Floats(diffs))
        }
    }
}

pub(crate) fn second_order_battery(
    sample: &Sample,
    config: &AnalysisConfig,
    tables: &CriticalTables,
) -> BenfordResult<SecondOrderResult> {
    let diffs = second_order_differences(sample)?;
    let base = DigitBase::new(&diffs, config.decimals, config.sign);
    let results = run_battery(&base, &config.settings(tables));
    info!(
        differences = base.len(),
        discarded_f1d = base.discarded(TestKind::FirstDigit),
        "second order tests computed"
    );
    Ok(SecondOrderResult {
        n_differences: base.len(),
        discarded: base.discard_tally(),
        results,
    })
}

/// Second-order result for a single test kind.
pub fn second_order_test(
    sample: &Sample,
    kind: TestKind,
    config: &AnalysisConfig,
) -> BenfordResult<TestResult> {
    let diffs = second_order_differences(sample)?;
    crate::audit::functions::digit_test(&diffs, kind, config)
}
