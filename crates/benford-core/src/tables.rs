//! Critical values and conformity thresholds.
//!
//! The tables are plain immutable data owned by a [`CriticalTables`]
//! value. Analyses take the tables as an explicit argument so alternate
//! tables can be substituted without touching shared state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::types::{Confidence, TestKind};

/// Z multipliers, in [`Confidence::ALL`] order.
const Z_CRITICAL: [f64; 10] = [
    1.285, 1.435, 1.645, 1.96, 2.576, 3.29, 3.89, 4.417, 4.892, 5.327,
];

/// Kolmogorov-Smirnov numerators (divide by sqrt(N)).
const KS_CRITICAL: [f64; 10] = [1.075, 1.139, 1.224, 1.36, 1.63, 1.95, 2.23, 2.47, 2.7, 2.9];

const CHI2_DF8: [f64; 10] = [
    11.03, 12.027, 13.362, 15.507, 20.090, 26.124, 31.827, 37.332, 42.701, 47.972,
];
const CHI2_DF9: [f64; 10] = [
    12.242, 13.288, 14.684, 16.919, 21.666, 27.877, 33.72, 39.341, 44.811, 50.172,
];
const CHI2_DF89: [f64; 10] = [
    99.991, 102.826, 106.469, 112.022, 122.942, 135.978, 147.350, 157.702, 167.348, 176.471,
];
const CHI2_DF99: [f64; 10] = [
    110.607, 113.585, 117.407, 123.225, 134.642, 148.230, 160.056, 170.798, 180.792, 190.23,
];
const CHI2_DF899: [f64; 10] = [
    934.479, 942.981, 953.752, 969.865, 1000.575, 1035.753, 1065.314, 1091.422, 1115.141, 1137.082,
];

/// Upper bounds of the Close, Acceptable and Marginal MAD tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MadThresholds {
    pub close: f64,
    pub acceptable: f64,
    pub marginal: f64,
}

impl MadThresholds {
    pub fn classify(&self, mad: f64) -> MadConformity {
        if mad <= self.close {
            MadConformity::Close
        } else if mad <= self.acceptable {
            MadConformity::Acceptable
        } else if mad <= self.marginal {
            MadConformity::Marginal
        } else {
            MadConformity::Nonconformity
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MadConformity {
    Close,
    Acceptable,
    Marginal,
    Nonconformity,
}

/// Lookup tables consulted by the statistics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalTables {
    pub z: BTreeMap<Confidence, f64>,
    pub ks: BTreeMap<Confidence, f64>,
    /// Keyed by degrees of freedom.
    pub chi_square: BTreeMap<u32, BTreeMap<Confidence, f64>>,
    pub mad: BTreeMap<TestKind, MadThresholds>,
}

fn by_level(values: &[f64; 10]) -> BTreeMap<Confidence, f64> {
    Confidence::ALL
        .into_iter()
        .zip(values.iter().copied())
        .collect()
}

impl CriticalTables {
    /// The published Benford audit tables (Nigrini).
    pub fn standard() -> Self {
        let chi_square = [
            (8, &CHI2_DF8),
            (9, &CHI2_DF9),
            (89, &CHI2_DF89),
            (99, &CHI2_DF99),
            (899, &CHI2_DF899),
        ]
        .into_iter()
        .map(|(df, values)| (df, by_level(values)))
        .collect();

        let mad = [
            (TestKind::FirstDigit, (0.006, 0.012, 0.015)),
            (TestKind::FirstTwoDigits, (0.0012, 0.0018, 0.0022)),
            (TestKind::FirstThreeDigits, (0.00036, 0.00044, 0.00050)),
            (TestKind::SecondDigit, (0.008, 0.010, 0.012)),
        ]
        .into_iter()
        .map(|(kind, (close, acceptable, marginal))| {
            (
                kind,
                MadThresholds {
                    close,
                    acceptable,
                    marginal,
                },
            )
        })
        .collect();

        CriticalTables {
            z: by_level(&Z_CRITICAL),
            ks: by_level(&KS_CRITICAL),
            chi_square,
            mad,
        }
    }

    /// Process-wide copy of [`CriticalTables::standard`].
    pub fn shared() -> &'static CriticalTables {
        static STANDARD: OnceLock<CriticalTables> = OnceLock::new();
        STANDARD.get_or_init(CriticalTables::standard)
    }

    pub fn z_critical(&self, confidence: Confidence) -> Option<f64> {
        self.z.get(&confidence).copied()
    }

    /// KS numerator; the critical value for a sample is this over sqrt(N).
    pub fn ks_critical(&self, confidence: Confidence) -> Option<f64> {
        self.ks.get(&confidence).copied()
    }

    pub fn chi_square_critical(
        &self,
        degrees_of_freedom: u32,
        confidence: Confidence,
    ) -> Option<f64> {
        self.chi_square
            .get(&degrees_of_freedom)
            .and_then(|row| row.get(&confidence))
            .copied()
    }

    /// MAD tiers; the last-two-digits test has none.
    pub fn mad_thresholds(&self, kind: TestKind) -> Option<MadThresholds> {
        self.mad.get(&kind).copied()
    }
}

impl Default for CriticalTables {
    fn default() -> Self {
        CriticalTables::standard()
    }
}
