//! The full test battery over one sample.

use serde::Serialize;
use tracing::info;

use crate::audit::battery::run_battery;
use crate::audit::duplicates::{count_duplicates, DuplicatesReport};
use crate::audit::mantissas::{mantissa_stats, MantissaStats};
use crate::audit::second_order::{second_order_battery, SecondOrderResult};
use crate::audit::summation::{summation_from_base, SummationResult};
use crate::config::AnalysisConfig;
use crate::digits::extraction::{DigitBase, DiscardTally};
use crate::report::{DigitPlotSeries, PlotSink, ReportSink, SessionSummary, TestSummary};
use crate::sample::Sample;
use crate::statistics::result::TestResult;
use crate::tables::CriticalTables;
use crate::types::{Confidence, TestKind};
use crate::BenfordResult;

const SUMMATION_KINDS: [TestKind; 3] = [
    TestKind::FirstDigit,
    TestKind::FirstTwoDigits,
    TestKind::FirstThreeDigits,
];

/// Prepared sample plus the results of every test run on it.
///
/// Construction runs the five primary tests. Second-order and summation
/// results are added on request and are re-evaluated together with the
/// primary results when the confidence level changes.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    sample: Sample,
    config: AnalysisConfig,
    tables: CriticalTables,
    base: DigitBase,
    results: Vec<TestResult>,
    second_order: Option<SecondOrderResult>,
    summation: Option<Vec<SummationResult>>,
}

impl AnalysisSession {
    pub fn new(sample: Sample, config: AnalysisConfig) -> Self {
        AnalysisSession::with_tables(sample, config, CriticalTables::standard())
    }

    pub fn with_tables(sample: Sample, config: AnalysisConfig, tables: CriticalTables) -> Self {
        let base = DigitBase::new(&sample, config.decimals, config.sign);
        let results = run_battery(&base, &config.settings(&tables));
        info!(
            initial_size = sample.len(),
            analysed = base.len(),
            dropped_non_finite = base.dropped_non_finite(),
            discarded = ?base.discard_tally(),
            "benford session created"
        );
        AnalysisSession {
            sample,
            config,
            tables,
            base,
            results,
            second_order: None,
            summation: None,
        }
    }

    /// Run the battery on the sorted-difference sequence.
    pub fn add_second_order(&mut self) -> BenfordResult<&SecondOrderResult> {
        let result = second_order_battery(&self.sample, &self.config, &self.tables)?;
        Ok(&*self.second_order.insert(result))
    }

    /// Summation tests for F1D, F2D and F3D.
    pub fn add_summation(&mut self) -> BenfordResult<&[SummationResult]> {
        let results = SUMMATION_KINDS
            .iter()
            .map(|&kind| summation_from_base(&self.base, kind))
            .collect::<BenfordResult<Vec<_>>>()?;
        info!("summation tests added for F1D, F2D and F3D");
        Ok(self.summation.insert(results).as_slice())
    }

    /// Re-evaluate every stored result under a new confidence level.
    pub fn update_confidence(&mut self, confidence: Option<Confidence>) -> BenfordResult<()> {
        self.config.confidence = confidence;
        self.results = run_battery(&self.base, &self.config.settings(&self.tables));
        if self.second_order.is_some() {
            self.second_order = Some(second_order_battery(
                &self.sample,
                &self.config,
                &self.tables,
            )?);
        }
        info!(confidence = ?confidence.map(f64::from), "confidence updated");
        Ok(())
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn tables(&self) -> &CriticalTables {
        &self.tables
    }

    pub fn base(&self) -> &DigitBase {
        &self.base
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn result(&self, kind: TestKind) -> Option<&TestResult> {
        self.results.iter().find(|r| r.kind == kind)
    }

    pub fn discarded(&self) -> DiscardTally {
        self.base.discard_tally()
    }

    pub fn second_order(&self) -> Option<&SecondOrderResult> {
        self.second_order.as_ref()
    }

    pub fn summation(&self) -> Option<&[SummationResult]> {
        self.summation.as_deref()
    }

    /// Duplicates among the sign-filtered entries.
    pub fn duplicates(&self, top_rep: Option<usize>) -> DuplicatesReport {
        count_duplicates(self.base.values(), top_rep)
    }

    pub fn mantissas(&self) -> BenfordResult<MantissaStats> {
        mantissa_stats(self.base.mantissas())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            initial_size: self.sample.len(),
            analysed: self.base.len(),
            dropped_non_finite: self.base.dropped_non_finite(),
            discarded: self.discarded(),
            confidence: self.config.confidence,
            significance: self
                .config
                .confidence
                .map(|c| c.p_value_label().to_string()),
            tests: self.results.iter().map(TestSummary::from).collect(),
            second_order: self
                .second_order
                .as_ref()
                .map(|so| so.results.iter().map(TestSummary::from).collect()),
            summation_mad: self
                .summation
                .iter()
                .flatten()
                .map(|s| (s.kind, s.mad))
                .collect(),
        }
    }

    pub fn report(&self, sink: &mut dyn ReportSink) {
        sink.report(&self.summary());
    }

    /// Send one test's plot series to the sink; false if the kind has no result.
    pub fn plot(&self, kind: TestKind, sink: &mut dyn PlotSink) -> bool {
        match self.result(kind) {
            Some(r) => {
                sink.plot(&DigitPlotSeries::from(r));
                true
            }
            None => false,
        }
    }

    /// Serializable snapshot of every result held by the session.
    pub fn output(&self) -> SessionOutput<'_> {
        SessionOutput {
            config: &self.config,
            initial_size: self.sample.len(),
            analysed: self.base.len(),
            discarded: self.discarded(),
            results: &self.results,
            second_order: self.second_order.as_ref(),
            summation: self.summation.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionOutput<'a> {
    pub config: &'a AnalysisConfig,
    pub initial_size: usize,
    pub analysed: usize,
    pub discarded: DiscardTally,
    pub results: &'a [TestResult],
    pub second_order: Option<&'a SecondOrderResult>,
    pub summation: Option<&'a [SummationResult]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TracingReporter;

    fn hundreds() -> Sample {
        Sample::Integers((1..=9).map(|d| d * 100).collect())
    }

    #[test]
    fn test_session_runs_five_tests() {
        let s = AnalysisSession::new(hundreds(), AnalysisConfig::default());
        assert_eq!(s.results().len(), 5);
        let kinds: Vec<TestKind> = s.results().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, TestKind::ALL.to_vec());
        assert_eq!(s.discarded().l2d, 9);
        assert!(s.second_order().is_none());
    }

    #[test]
    fn test_update_confidence_reruns() {
        let mut s = AnalysisSession::new(hundreds(), AnalysisConfig::default());
        s.add_second_order().unwrap();
        s.update_confidence(None).unwrap();
        let f1d = s.result(TestKind::FirstDigit).unwrap();
        assert_eq!(f1d.confidence, None);
        assert!(f1d.table.iter().all(|r| r.z_score.is_none()));
        let so = s.second_order().unwrap();
        assert!(so.results.iter().all(|r| r.chi_square.critical.is_none()));

        s.update_confidence(Some(Confidence::NinetyNine)).unwrap();
        assert_eq!(
            s.result(TestKind::FirstDigit).unwrap().chi_square.critical,
            Some(20.090)
        );
    }

    #[test]
    fn test_summation_and_summary() {
        let mut s = AnalysisSession::new(hundreds(), AnalysisConfig::default());
        assert_eq!(s.add_summation().unwrap().len(), 3);
        let summary = s.summary();
        assert_eq!(summary.initial_size, 9);
        assert_eq!(summary.summation_mad.len(), 3);
        assert!(summary.second_order.is_none());
        assert_eq!(summary.significance.as_deref(), Some("0.05"));
        s.report(&mut TracingReporter);
    }

    #[test]
    fn test_summary_significance_follows_confidence() {
        let mut s = AnalysisSession::new(hundreds(), AnalysisConfig::default());
        s.update_confidence(Some(Confidence::ThreeNines)).unwrap();
        assert_eq!(s.summary().significance.as_deref(), Some("0.001"));
        s.update_confidence(None).unwrap();
        assert_eq!(s.summary().significance, None);
    }

    #[test]
    fn test_sign_filter_applies_to_duplicates() {
        let sample = Sample::Integers(vec![-5, -5, 5, 5, 5]);
        let config = AnalysisConfig::default().with_sign(crate::types::SignFilter::Pos);
        let s = AnalysisSession::new(sample, config);
        let d = s.duplicates(None);
        assert_eq!(d.entries.len(), 1);
        assert_eq!(d.entries[0].count, 3);
    }

    #[test]
    fn test_output_serializes() {
        let mut s = AnalysisSession::new(hundreds(), AnalysisConfig::default());
        s.add_summation().unwrap();
        let v = serde_json::to_value(s.output()).unwrap();
        assert_eq!(v["results"].as_array().unwrap().len(), 5);
        assert_eq!(v["summation"].as_array().unwrap().len(), 3);
        assert!(v["second_order"].is_null());
    }
}
