//! Collaborator seams for human-readable reports and plots.
//!
//! The library never formats or renders anything itself. A session hands
//! a [`SessionSummary`] to a [`ReportSink`] and per-test
//! [`DigitPlotSeries`] to a [`PlotSink`]; both are owned by the caller.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::digits::extraction::DiscardTally;
use crate::statistics::result::{HighZ, TestResult};
use crate::tables::MadConformity;
use crate::types::{Confidence, TestKind};

/// Statistic-versus-critical-value digest of one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub kind: TestKind,
    pub n: u64,
    pub discarded: usize,
    pub mad: f64,
    pub mad_conformity: Option<MadConformity>,
    pub chi_square: f64,
    pub chi_square_critical: Option<f64>,
    pub ks: f64,
    pub ks_critical: Option<f64>,
    /// Buckets found above expectation past the Z critical value.
    pub positive_deviations: Vec<u16>,
}

impl From<&TestResult> for TestSummary {
    fn from(r: &TestResult) -> Self {
        TestSummary {
            kind: r.kind,
            n: r.n,
            discarded: r.discarded,
            mad: r.mad.value,
            mad_conformity: r.mad.conformity,
            chi_square: r.chi_square.statistic,
            chi_square_critical: r.chi_square.critical,
            ks: r.ks.statistic,
            ks_critical: r.ks.critical,
            positive_deviations: r
                .significant_deviations(HighZ::Positive)
                .into_iter()
                .map(|row| row.digit)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub initial_size: usize,
    /// Entries left after the sign filter.
    pub analysed: usize,
    pub dropped_non_finite: usize,
    pub discarded: DiscardTally,
    pub confidence: Option<Confidence>,
    /// Significance level matching `confidence`, as printed in reports.
    pub significance: Option<String>,
    pub tests: Vec<TestSummary>,
    pub second_order: Option<Vec<TestSummary>>,
    /// MAD of each summation test that was run.
    pub summation_mad: Vec<(TestKind, f64)>,
}

pub trait ReportSink {
    fn report(&mut self, summary: &SessionSummary);
}

/// Writes the summary as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl TracingReporter {
    fn test_event(scope: &str, t: &TestSummary) {
        info!(
            scope,
            test = t.kind.label(),
            n = t.n,
            discarded = t.discarded,
            mad = t.mad,
            conformity = ?t.mad_conformity,
            chi_square = t.chi_square,
            chi_square_critical = ?t.chi_square_critical,
            ks = t.ks,
            ks_critical = ?t.ks_critical,
            deviations = ?t.positive_deviations,
            "benford test"
        );
    }
}

impl ReportSink for TracingReporter {
    fn report(&mut self, summary: &SessionSummary) {
        info!(
            initial_size = summary.initial_size,
            analysed = summary.analysed,
            discarded = ?summary.discarded,
            confidence = ?summary.confidence.map(f64::from),
            significance = summary.significance.as_deref().unwrap_or("none"),
            "benford session"
        );
        if summary.dropped_non_finite > 0 {
            warn!(
                count = summary.dropped_non_finite,
                "non-finite entries dropped"
            );
        }
        for t in &summary.tests {
            Self::test_event("primary", t);
        }
        for t in summary.second_order.iter().flatten() {
            Self::test_event("second_order", t);
        }
        for (kind, mad) in &summary.summation_mad {
            info!(test = kind.label(), mad, "summation");
        }
    }
}

/// Bars and bands for one digit test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitPlotSeries {
    pub kind: TestKind,
    pub x: Vec<u16>,
    pub expected: Vec<f64>,
    pub found: Vec<f64>,
    pub lower: Option<Vec<f64>>,
    pub upper: Option<Vec<f64>>,
}

impl From<&TestResult> for DigitPlotSeries {
    fn from(r: &TestResult) -> Self {
        let (lower, upper) = match r.confidence_band() {
            Some(band) => {
                let (lower, upper) = band.into_iter().unzip();
                (Some(lower), Some(upper))
            }
            None => (None, None),
        };
        DigitPlotSeries {
            kind: r.kind,
            x: r.table.iter().map(|row| row.digit).collect(),
            expected: r.table.iter().map(|row| row.expected).collect(),
            found: r.table.iter().map(|row| row.found).collect(),
            lower,
            upper,
        }
    }
}

pub trait PlotSink {
    fn plot(&mut self, series: &DigitPlotSeries);
}
