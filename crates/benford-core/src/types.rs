use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::BenfordError;

/// The five digit-position tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "String")]
pub enum TestKind {
    FirstDigit,
    FirstTwoDigits,
    FirstThreeDigits,
    SecondDigit,
    LastTwoDigits,
}

impl TestKind {
    pub const ALL: [TestKind; 5] = [
        TestKind::FirstDigit,
        TestKind::FirstTwoDigits,
        TestKind::FirstThreeDigits,
        TestKind::SecondDigit,
        TestKind::LastTwoDigits,
    ];

    /// Numeric identifier: 1, 2, 3, 22 or -2.
    pub fn code(self) -> i32 {
        match self {
            TestKind::FirstDigit => 1,
            TestKind::FirstTwoDigits => 2,
            TestKind::FirstThreeDigits => 3,
            TestKind::SecondDigit => 22,
            TestKind::LastTwoDigits => -2,
        }
    }

    /// Short column label (F1D, F2D, F3D, SD, L2D).
    pub fn label(self) -> &'static str {
        match self {
            TestKind::FirstDigit => "F1D",
            TestKind::FirstTwoDigits => "F2D",
            TestKind::FirstThreeDigits => "F3D",
            TestKind::SecondDigit => "SD",
            TestKind::LastTwoDigits => "L2D",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TestKind::FirstDigit => "First Digit Test",
            TestKind::FirstTwoDigits => "First Two Digits Test",
            TestKind::FirstThreeDigits => "First Three Digits Test",
            TestKind::SecondDigit => "Second Digit Test",
            TestKind::LastTwoDigits => "Last Two Digits Test",
        }
    }

    /// Inclusive range of feature values the test is defined over.
    pub fn domain(self) -> std::ops::RangeInclusive<u16> {
        match self {
            TestKind::FirstDigit => 1..=9,
            TestKind::FirstTwoDigits => 10..=99,
            TestKind::FirstThreeDigits => 100..=999,
            TestKind::SecondDigit => 0..=9,
            TestKind::LastTwoDigits => 0..=99,
        }
    }

    pub fn bucket_count(self) -> usize {
        self.domain().len()
    }

    /// Smallest ZN for which the feature is defined.
    pub fn threshold(self) -> u128 {
        match self {
            TestKind::FirstDigit => 1,
            TestKind::FirstTwoDigits | TestKind::SecondDigit => 10,
            TestKind::FirstThreeDigits => 100,
            TestKind::LastTwoDigits => 1000,
        }
    }

    /// Number of leading digits for the first-digits family.
    pub fn leading_digits(self) -> Option<u32> {
        match self {
            TestKind::FirstDigit => Some(1),
            TestKind::FirstTwoDigits => Some(2),
            TestKind::FirstThreeDigits => Some(3),
            TestKind::SecondDigit | TestKind::LastTwoDigits => None,
        }
    }

    /// Position of the kind in [`TestKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            TestKind::FirstDigit => 0,
            TestKind::FirstTwoDigits => 1,
            TestKind::FirstThreeDigits => 2,
            TestKind::SecondDigit => 3,
            TestKind::LastTwoDigits => 4,
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<TestKind> for String {
    fn from(kind: TestKind) -> Self {
        kind.label().to_string()
    }
}

impl TryFrom<i64> for TestKind {
    type Error = BenfordError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(TestKind::FirstDigit),
            2 => Ok(TestKind::FirstTwoDigits),
            3 => Ok(TestKind::FirstThreeDigits),
            22 => Ok(TestKind::SecondDigit),
            -2 => Ok(TestKind::LastTwoDigits),
            other => Err(BenfordError::InvalidTestKind(format!(
                "{other}; must be one of 1, 2, 3, 22, -2"
            ))),
        }
    }
}

impl FromStr for TestKind {
    type Err = BenfordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return TestKind::try_from(code);
        }
        match trimmed.to_ascii_uppercase().as_str() {
            "F1D" => Ok(TestKind::FirstDigit),
            "F2D" => Ok(TestKind::FirstTwoDigits),
            "F3D" => Ok(TestKind::FirstThreeDigits),
            "SD" => Ok(TestKind::SecondDigit),
            "L2D" => Ok(TestKind::LastTwoDigits),
            _ => Err(BenfordError::InvalidTestKind(format!(
                "'{trimmed}'; must be one of F1D, F2D, F3D, SD, L2D"
            ))),
        }
    }
}

impl TryFrom<Value> for TestKind {
    type Error = BenfordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::Number(n) => match n.as_i64() {
                Some(code) => TestKind::try_from(code),
                None => Err(BenfordError::InvalidTestKind(n.to_string())),
            },
            Value::String(s) => s.parse(),
            other => Err(BenfordError::InvalidTestKind(other.to_string())),
        }
    }
}

/// Which portion of the sample to analyse. Zeros are always excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignFilter {
    #[default]
    All,
    Pos,
    Neg,
}

impl SignFilter {
    pub fn keeps(self, value: f64) -> bool {
        match self {
            SignFilter::All => value != 0.0,
            SignFilter::Pos => value > 0.0,
            SignFilter::Neg => value < 0.0,
        }
    }
}

impl FromStr for SignFilter {
    type Err = BenfordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(SignFilter::All),
            "pos" => Ok(SignFilter::Pos),
            "neg" => Ok(SignFilter::Neg),
            other => Err(BenfordError::InvalidSignFilter(format!(
                "'{other}'; must be 'all', 'pos' or 'neg'"
            ))),
        }
    }
}

/// Supported confidence levels. `None` at the use site disables
/// confidence-dependent verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Confidence {
    Eighty,
    EightyFive,
    Ninety,
    NinetyFive,
    NinetyNine,
    ThreeNines,
    FourNines,
    FiveNines,
    SixNines,
    SevenNines,
}

impl Confidence {
    pub const ALL: [Confidence; 10] = [
        Confidence::Eighty,
        Confidence::EightyFive,
        Confidence::Ninety,
        Confidence::NinetyFive,
        Confidence::NinetyNine,
        Confidence::ThreeNines,
        Confidence::FourNines,
        Confidence::FiveNines,
        Confidence::SixNines,
        Confidence::SevenNines,
    ];

    pub fn level(self) -> f64 {
        match self {
            Confidence::Eighty => 80.0,
            Confidence::EightyFive => 85.0,
            Confidence::Ninety => 90.0,
            Confidence::NinetyFive => 95.0,
            Confidence::NinetyNine => 99.0,
            Confidence::ThreeNines => 99.9,
            Confidence::FourNines => 99.99,
            Confidence::FiveNines => 99.999,
            Confidence::SixNines => 99.9999,
            Confidence::SevenNines => 99.99999,
        }
    }

    /// Significance level as printed in reports.
    pub fn p_value_label(self) -> &'static str {
        match self {
            Confidence::Eighty => "0.2",
            Confidence::EightyFive => "0.15",
            Confidence::Ninety => "0.1",
            Confidence::NinetyFive => "0.05",
            Confidence::NinetyNine => "0.01",
            Confidence::ThreeNines => "0.001",
            Confidence::FourNines => "0.0001",
            Confidence::FiveNines => "0.00001",
            Confidence::SixNines => "0.000001",
            Confidence::SevenNines => "0.0000001",
        }
    }

    /// Parse an optional level where `"none"`/`null` means no confidence.
    pub fn parse_optional(value: &Value) -> Result<Option<Confidence>, BenfordError> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s.trim().eq_ignore_ascii_case("none") => Ok(None),
            Value::String(s) => s.parse().map(Some),
            Value::Number(n) => match n.as_f64() {
                Some(level) => Confidence::try_from(level).map(Some),
                None => Err(BenfordError::InvalidConfidence(n.to_string())),
            },
            other => Err(BenfordError::InvalidConfidence(other.to_string())),
        }
    }
}

impl TryFrom<f64> for Confidence {
    type Error = BenfordError;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        Confidence::ALL
            .into_iter()
            .find(|c| (c.level() - level).abs() < 1e-9)
            .ok_or_else(|| {
                BenfordError::InvalidConfidence(format!(
                    "{level}; must be one of 80, 85, 90, 95, 99, 99.9, 99.99, 99.999, 99.9999, 99.99999 or none"
                ))
            })
    }
}

impl FromStr for Confidence {
    type Err = BenfordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: f64 = s
            .trim()
            .parse()
            .map_err(|_| BenfordError::InvalidConfidence(format!("'{}'", s.trim())))?;
        Confidence::try_from(level)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.level()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.level())
    }
}

/// How floating-point values are turned into the digits-only magnitude.
///
/// `Fixed(d)` truncates after `d` decimal places. `Infer` drops the radix
/// point and leading zeros and keeps at most five digits, which is faster
/// to reason about for mixed-scale data but loses the trailing digits
/// that the last-two-digits test looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Precision {
    Fixed(u32),
    Infer,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Fixed(2)
    }
}

impl TryFrom<Value> for Precision {
    type Error = BenfordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match &value {
            Value::Null => Ok(Precision::default()),
            Value::String(s) if s.trim().eq_ignore_ascii_case("infer") => Ok(Precision::Infer),
            Value::String(s) => s
                .trim()
                .parse::<u32>()
                .map(Precision::Fixed)
                .map_err(|_| {
                    BenfordError::config(
                        "decimals",
                        format!("'{s}' is not a non-negative integer or 'infer'"),
                    )
                }),
            Value::Number(n) => n
                .as_u64()
                .and_then(|d| u32::try_from(d).ok())
                .map(Precision::Fixed)
                .ok_or_else(|| {
                    BenfordError::config("decimals", format!("{n} is not a non-negative integer"))
                }),
            other => Err(BenfordError::config(
                "decimals",
                format!("{other} is not a non-negative integer or 'infer'"),
            )),
        }
    }
}

impl From<Precision> for Value {
    fn from(p: Precision) -> Self {
        match p {
            Precision::Fixed(d) => Value::from(d),
            Precision::Infer => Value::from("infer"),
        }
    }
}

impl FromStr for Precision {
    type Err = BenfordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Precision::try_from(Value::String(s.to_string()))
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}
