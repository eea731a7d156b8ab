//! Analysis configuration.
//!
//! [`AnalysisConfig`] is the typed form every analysis takes.
//! [`BenfordInput`] is the loosely typed JSON document accepted at the
//! boundary; its accessors validate each field into the error taxonomy
//! before any computation starts.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::BenfordError;
use crate::sample::Sample;
use crate::statistics::result::TestSettings;
use crate::tables::CriticalTables;
use crate::types::{Confidence, Precision, SignFilter, TestKind};
use crate::BenfordResult;

/// Default number of duplicated values listed.
pub const DEFAULT_TOP_REP: usize = 20;

// ---------------------------------------------------------------------------
// Typed configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub decimals: Precision,
    pub sign: SignFilter,
    /// `None` disables Z-scores and the chi-square and KS verdicts.
    pub confidence: Option<Confidence>,
    /// Cap on the sample size used for Z-scores.
    pub limit_n: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            decimals: Precision::default(),
            sign: SignFilter::All,
            confidence: Some(Confidence::NinetyFive),
            limit_n: None,
        }
    }
}

impl AnalysisConfig {
    pub fn with_decimals(mut self, decimals: Precision) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_sign(mut self, sign: SignFilter) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_confidence(mut self, confidence: Option<Confidence>) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_limit_n(mut self, limit_n: Option<u64>) -> Self {
        self.limit_n = limit_n;
        self
    }

    pub(crate) fn settings<'a>(&self, tables: &'a CriticalTables) -> TestSettings<'a> {
        TestSettings {
            confidence: self.confidence,
            limit_n: self.limit_n,
            tables,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON boundary
// ---------------------------------------------------------------------------

fn default_confidence() -> Value {
    json!(95)
}

fn default_top_rep() -> Value {
    json!(DEFAULT_TOP_REP)
}

/// Raw request document. Missing fields take the library defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenfordInput {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub decimals: Value,
    #[serde(default)]
    pub sign: Value,
    /// `null` or `"none"` disables confidence-based reporting.
    #[serde(default = "default_confidence")]
    pub confidence: Value,
    #[serde(default, alias = "limit_N")]
    pub limit_n: Value,
    #[serde(default)]
    pub sec_order: bool,
    #[serde(default)]
    pub summation: bool,
    /// Test kind for the single-test operations.
    #[serde(default)]
    pub test: Value,
    /// `null` lists every duplicated value.
    #[serde(default = "default_top_rep", alias = "top_Rep")]
    pub top_rep: Value,
    #[serde(default)]
    pub window: Value,
}

impl Default for BenfordInput {
    fn default() -> Self {
        BenfordInput {
            data: Vec::new(),
            decimals: Value::Null,
            sign: Value::Null,
            confidence: default_confidence(),
            limit_n: Value::Null,
            sec_order: false,
            summation: false,
            test: Value::Null,
            top_rep: default_top_rep(),
            window: Value::Null,
        }
    }
}

impl BenfordInput {
    pub fn sample(&self) -> BenfordResult<Sample> {
        Sample::from_json_values(&self.data)
    }

    pub fn config(&self) -> BenfordResult<AnalysisConfig> {
        Ok(AnalysisConfig {
            decimals: Precision::try_from(self.decimals.clone())?,
            sign: parse_sign(&self.sign)?,
            confidence: Confidence::parse_optional(&self.confidence)?,
            limit_n: parse_limit_n(&self.limit_n)?,
        })
    }

    /// Requested test kind, if any.
    pub fn test_kind(&self) -> BenfordResult<Option<TestKind>> {
        match &self.test {
            Value::Null => Ok(None),
            other => TestKind::try_from(other.clone()).map(Some),
        }
    }

    pub fn top_rep(&self) -> BenfordResult<Option<usize>> {
        optional_count("top_rep", &self.top_rep)
    }

    pub fn window(&self) -> BenfordResult<Option<usize>> {
        optional_count("window", &self.window)
    }
}

fn parse_sign(value: &Value) -> BenfordResult<SignFilter> {
    match value {
        Value::Null => Ok(SignFilter::default()),
        Value::String(s) => s.parse(),
        other => Err(BenfordError::InvalidSignFilter(format!(
            "{other}; must be 'all', 'pos' or 'neg'"
        ))),
    }
}

/// `limit_n` must be a non-negative integer or absent.
pub fn parse_limit_n(value: &Value) -> BenfordResult<Option<u64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_u64().map(Some).ok_or_else(|| {
            BenfordError::config("limit_n", format!("{n} is not a non-negative integer"))
        }),
        other => Err(BenfordError::config(
            "limit_n",
            format!("{other} is not a non-negative integer"),
        )),
    }
}

fn optional_count(field: &str, value: &Value) -> BenfordResult<Option<usize>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| {
                BenfordError::config(field, format!("{n} is not a non-negative integer"))
            }),
        other => Err(BenfordError::config(
            field,
            format!("{other} must be an integer or null"),
        )),
    }
}
