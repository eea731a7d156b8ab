use clap::Args;
use serde_json::Value;
use std::time::Instant;

use benford_core::{AnalysisSession, ReportSink, TracingReporter};

use crate::input::request::{self, InputArgs};

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Also run the second-order tests
    #[arg(long)]
    pub sec_order: bool,

    /// Also run the F1D, F2D and F3D summation tests
    #[arg(long)]
    pub summation: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = request::load(&args.source)?;
    let start = Instant::now();

    let mut session = AnalysisSession::new(req.sample, req.config);
    if args.sec_order || req.doc.sec_order {
        session.add_second_order()?;
    }
    if args.summation || req.doc.summation {
        session.add_summation()?;
    }
    TracingReporter.report(&session.summary());

    let mut warnings: Vec<String> = session
        .results()
        .iter()
        .flat_map(|r| r.notices.iter().cloned())
        .collect();
    let dropped = session.base().dropped_non_finite();
    if dropped > 0 {
        warnings.push(format!(
            "{dropped} non-finite entries dropped before analysis"
        ));
    }

    super::envelope(
        "Benford digit tests (Z-score, chi-square, Kolmogorov-Smirnov, MAD, MSE)",
        session.config(),
        warnings,
        start,
        session.output(),
    )
}
