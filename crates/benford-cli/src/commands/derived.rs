use clap::{Args, ValueEnum};
use serde_json::{json, Value};
use std::time::Instant;

use benford_core::digits::expected;
use benford_core::{
    duplicates, mantissa_test, rolling_mad, rolling_mse, second_order_test, summation_test,
    AnalysisConfig, BenfordInput, TestKind,
};

use crate::input::request::{self, InputArgs};

#[derive(Args)]
pub struct SecondOrderArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Test kind: 1, 2, 3, 22, -2 or F1D, F2D, F3D, SD, L2D
    #[arg(long, allow_hyphen_values = true)]
    pub test: Option<String>,
}

#[derive(Args)]
pub struct SummationArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// F1D, F2D or F3D (default F2D)
    #[arg(long)]
    pub test: Option<String>,

    /// Number of groups listed, largest deviation first
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

#[derive(Args)]
pub struct DuplicatesArgs {
    #[command(flatten)]
    pub source: InputArgs,

    /// Number of values listed (all when omitted from flags and document)
    #[arg(long)]
    pub top_rep: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RollingStatistic {
    Mad,
    Mse,
}

#[derive(Args)]
pub struct RollingArgs {
    #[command(flatten)]
    pub source: InputArgs,

    #[arg(long, allow_hyphen_values = true)]
    pub test: Option<String>,

    /// Window size in valid entries
    #[arg(long)]
    pub window: Option<usize>,

    #[arg(long, value_enum, default_value = "mad")]
    pub statistic: RollingStatistic,
}

#[derive(Args)]
pub struct MantissasArgs {
    #[command(flatten)]
    pub source: InputArgs,
}

#[derive(Args)]
pub struct ExpectedArgs {
    #[arg(long, allow_hyphen_values = true, default_value = "F1D")]
    pub test: String,
}

/// Flag first, then the document's `test` field, then `fallback`.
fn resolve_kind(
    flag: Option<&str>,
    doc: &BenfordInput,
    fallback: Option<TestKind>,
) -> Result<TestKind, Box<dyn std::error::Error>> {
    if let Some(s) = flag {
        return Ok(s.parse::<TestKind>()?);
    }
    match (doc.test_kind()?, fallback) {
        (Some(kind), _) | (None, Some(kind)) => Ok(kind),
        (None, None) => {
            Err("--test <kind> required (1, 2, 3, 22, -2 or F1D, F2D, F3D, SD, L2D)".into())
        }
    }
}

pub fn run_second_order(args: SecondOrderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = request::load(&args.source)?;
    let kind = resolve_kind(
        args.test.as_deref(),
        &req.doc,
        Some(TestKind::FirstTwoDigits),
    )?;
    let start = Instant::now();
    let result = second_order_test(&req.sample, kind, &req.config)?;
    let warnings = result.notices.clone();
    super::envelope(
        "Second-order Benford test on sorted differences",
        &req.config,
        warnings,
        start,
        result,
    )
}

pub fn run_summation(args: SummationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = request::load(&args.source)?;
    let kind = resolve_kind(
        args.test.as_deref(),
        &req.doc,
        Some(TestKind::FirstTwoDigits),
    )?;
    let start = Instant::now();
    let result = summation_test(&req.sample, kind, &req.config)?;
    let top: Vec<_> = result.top(args.top).into_iter().cloned().collect();
    super::envelope(
        "Benford summation test",
        &req.config,
        Vec::new(),
        start,
        json!({
            "kind": result.kind,
            "n": result.n,
            "total": result.total,
            "expected": result.expected,
            "mad": result.mad,
            "top": top,
            "rows": result.rows,
        }),
    )
}

pub fn run_duplicates(args: DuplicatesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = request::load(&args.source)?;
    let top_rep = match args.top_rep {
        Some(n) => Some(n),
        None => req.doc.top_rep()?,
    };
    let start = Instant::now();
    let result = duplicates(&req.sample, top_rep);
    super::envelope(
        "Duplicate value count",
        &req.config,
        Vec::new(),
        start,
        result,
    )
}

pub fn run_rolling(args: RollingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = request::load(&args.source)?;
    let kind = resolve_kind(args.test.as_deref(), &req.doc, Some(TestKind::FirstDigit))?;
    let window = match args.window {
        Some(w) => w,
        None => req.doc.window()?.ok_or("--window <size> required")?,
    };
    let start = Instant::now();
    let values = match args.statistic {
        RollingStatistic::Mad => rolling_mad(&req.sample, kind, window, &req.config)?,
        RollingStatistic::Mse => rolling_mse(&req.sample, kind, window, &req.config)?,
    };
    let statistic = match args.statistic {
        RollingStatistic::Mad => "mad",
        RollingStatistic::Mse => "mse",
    };
    super::envelope(
        "Rolling-window Benford deviation",
        &req.config,
        Vec::new(),
        start,
        json!({
            "kind": kind,
            "window": window,
            "statistic": statistic,
            "values": values,
        }),
    )
}

pub fn run_mantissas(args: MantissasArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = request::load(&args.source)?;
    let start = Instant::now();
    let result = mantissa_test(&req.sample, &req.config)?;
    super::envelope(
        "Mantissa moments against U(0, 1) and arc test",
        &req.config,
        Vec::new(),
        start,
        result,
    )
}

pub fn run_expected(args: ExpectedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let kind: TestKind = args.test.parse()?;
    let start = Instant::now();
    let dist = expected(kind);
    let rows: Vec<Value> = dist
        .iter()
        .map(|(digit, p)| json!({ "digit": digit, "expected": p }))
        .collect();
    super::envelope(
        "Benford expected distribution",
        &AnalysisConfig::default(),
        Vec::new(),
        start,
        json!({ "kind": kind, "total": dist.total(), "table": rows }),
    )
}
