//! Seeded sample generators for demos and statistical tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BenfordError;
use crate::BenfordResult;

fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

fn benford_value(rng: &mut StdRng, decades: u32) -> f64 {
    10f64.powf(rng.gen::<f64>() * f64::from(decades))
}

fn uniform_digit_value(rng: &mut StdRng, decades: u32) -> f64 {
    let digit = f64::from(rng.gen_range(1u8..=9));
    let exponent = rng.gen_range(0..decades.max(1)) as i32;
    (digit + rng.gen::<f64>()) * 10f64.powi(exponent)
}

/// Log-uniform values on `[1, 10^decades)`, whose digits follow Benford's Law.
pub fn benford_sample(n: usize, decades: u32, seed: Option<u64>) -> Vec<f64> {
    let mut rng = rng(seed);
    (0..n).map(|_| benford_value(&mut rng, decades)).collect()
}

/// Values whose leading digit is uniform over 1..=9.
pub fn uniform_digit_sample(n: usize, decades: u32, seed: Option<u64>) -> Vec<f64> {
    let mut rng = rng(seed);
    (0..n).map(|_| uniform_digit_value(&mut rng, decades)).collect()
}

/// Benford sample where each entry is replaced by a uniform-digit value
/// with probability `noise`.
pub fn contaminated_sample(
    n: usize,
    decades: u32,
    noise: f64,
    seed: Option<u64>,
) -> BenfordResult<Vec<f64>> {
    if !(0.0..=1.0).contains(&noise) {
        return Err(BenfordError::config(
            "noise",
            format!("{noise} is outside [0, 1]"),
        ));
    }
    let mut rng = rng(seed);
    Ok((0..n)
        .map(|_| {
            if rng.gen::<f64>() < noise {
                uniform_digit_value(&mut rng, decades)
            } else {
                benford_value(&mut rng, decades)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        assert_eq!(
            benford_sample(50, 4, Some(7)),
            benford_sample(50, 4, Some(7))
        );
    }

    #[test]
    fn test_ranges() {
        assert!(benford_sample(1000, 3, Some(1))
            .iter()
            .all(|&x| (1.0..1000.0).contains(&x)));
        assert!(uniform_digit_sample(1000, 3, Some(1))
            .iter()
            .all(|&x| (1.0..10_000.0).contains(&x)));
    }

    #[test]
    fn test_noise_bounds() {
        assert!(contaminated_sample(10, 3, 1.5, Some(1)).is_err());
        assert_eq!(contaminated_sample(10, 3, 0.5, Some(1)).unwrap().len(), 10);
    }
}
