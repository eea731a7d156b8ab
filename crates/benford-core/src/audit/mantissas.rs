//! Mantissa moment and arc tests.
//!
//! Under Benford's Law the mantissas `log10|x| mod 1` are uniform on
//! [0, 1), so their moments should approach those of U(0, 1) and their
//! images on the unit circle should average out near the origin.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::f64::consts::TAU;

use crate::config::AnalysisConfig;
use crate::digits::extraction::DigitBase;
use crate::error::BenfordError;
use crate::sample::Sample;
use crate::BenfordResult;

/// Moments of U(0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MantissaReference {
    pub mean: f64,
    pub variance: f64,
    pub skewness: f64,
    pub excess_kurtosis: f64,
}

pub const UNIFORM_MANTISSA: MantissaReference = MantissaReference {
    mean: 0.5,
    variance: 1.0 / 12.0,
    skewness: 0.0,
    excess_kurtosis: -1.2,
};

/// Centroid of the mantissas mapped to `(cos 2πm, sin 2πm)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcTest {
    pub x: f64,
    pub y: f64,
    /// Distance of the centroid from the origin.
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MantissaStats {
    pub n: usize,
    pub mean: f64,
    /// Sample variance (n - 1 denominator).
    pub variance: f64,
    /// Bias-adjusted skewness, present from three mantissas.
    pub skewness: Option<f64>,
    /// Bias-adjusted excess kurtosis, present from four mantissas.
    pub kurtosis: Option<f64>,
    pub reference: MantissaReference,
    pub arc: ArcTest,
}

fn central_moments(values: &[f64], mean: f64) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    (m2 / n, m3 / n, m4 / n)
}

fn adjusted_skewness(n: f64, m2: f64, m3: f64) -> f64 {
    if m2 == 0.0 {
        return 0.0;
    }
    let g1 = m3 / m2.powf(1.5);
    (n * (n - 1.0)).sqrt() / (n - 2.0) * g1
}

fn adjusted_excess_kurtosis(n: f64, m2: f64, m4: f64) -> f64 {
    if m2 == 0.0 {
        return 0.0;
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
}

pub fn arc_test(mantissas: &[f64]) -> ArcTest {
    if mantissas.is_empty() {
        return ArcTest {
            x: 0.0,
            y: 0.0,
            radius: 0.0,
        };
    }
    let n = mantissas.len() as f64;
    let (sx, sy) = mantissas
        .iter()
        .fold((0.0, 0.0), |(sx, sy), m| {
            (sx + (TAU * m).cos(), sy + (TAU * m).sin())
        });
    let (x, y) = (sx / n, sy / n);
    ArcTest {
        x,
        y,
        radius: x.hypot(y),
    }
}

/// Moments and arc centroid of a mantissa sequence; needs two values.
pub fn mantissa_stats(mantissas: &[f64]) -> BenfordResult<MantissaStats> {
    if mantissas.len() < 2 {
        return Err(BenfordError::InsufficientData(format!(
            "{} mantissas; at least 2 are needed for the variance",
            mantissas.len()
        )));
    }
    let mean = mantissas.mean();
    let variance = mantissas.variance();
    let (m2, m3, m4) = central_moments(mantissas, mean);
    let n = mantissas.len() as f64;
    Ok(MantissaStats {
        n: mantissas.len(),
        mean,
        variance,
        skewness: (mantissas.len() >= 3).then(|| adjusted_skewness(n, m2, m3)),
        kurtosis: (mantissas.len() >= 4).then(|| adjusted_excess_kurtosis(n, m2, m4)),
        reference: UNIFORM_MANTISSA,
        arc: arc_test(mantissas),
    })
}

pub fn mantissa_test(sample: &Sample, config: &AnalysisConfig) -> BenfordResult<MantissaStats> {
    let base = DigitBase::new(sample, config.decimals, config.sign);
    mantissa_stats(base.mantissas())
}
