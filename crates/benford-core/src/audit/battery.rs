use crate::digits::extraction::DigitBase;
use crate::statistics::result::{run_digit_test, TestResult, TestSettings};
use crate::types::TestKind;

pub(crate) fn run_kind(
    base: &DigitBase,
    kind: TestKind,
    settings: &TestSettings<'_>,
) -> TestResult {
    run_digit_test(
        kind,
        &base.valid_features(kind),
        base.discarded(kind),
        settings,
    )
}

/// The five primary tests, in [`TestKind::ALL`] order.
#[cfg(feature = "parallel")]
pub(crate) fn run_battery(base: &DigitBase, settings: &TestSettings<'_>) -> Vec<TestResult> {
    use rayon::prelude::*;

    TestKind::ALL
        .as_slice()
        .par_iter()
        .map(|&kind| run_kind(base, kind, settings))
        .collect()
}

/// The five primary tests, in [`TestKind::ALL`] order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn run_battery(base: &DigitBase, settings: &TestSettings<'_>) -> Vec<TestResult> {
    TestKind::ALL
        .iter()
        .map(|&kind| run_kind(base, kind, settings))
        .collect()
}
