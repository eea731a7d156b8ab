/// Fractional part of `log10(|value|)`, always in `[0, 1)`.
///
/// Values below one have negative logarithms; `rem_euclid` keeps the
/// mantissa of 0.5 at log10(5) rather than its complement.
pub fn mantissa(value: f64) -> f64 {
    let m = value.abs().log10().rem_euclid(1.0);
    // rem_euclid can return exactly 1.0 for tiny negative inputs
    if m >= 1.0 {
        0.0
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_mantissa_of_powers_of_ten() {
        assert_eq!(mantissa(1.0), 0.0);
        assert_eq!(mantissa(1000.0), 0.0);
    }

    #[test]
    fn test_mantissa_below_one() {
        assert!(approx_eq(mantissa(0.5), 5f64.log10(), 1e-12));
        assert!(approx_eq(mantissa(-0.02), 2f64.log10(), 1e-12));
    }

    #[test]
    fn test_mantissa_range() {
        for v in [3.7, 12.0, 999.99, 1.0e-7, 4.2e12] {
            let m = mantissa(v);
            assert!((0.0..1.0).contains(&m), "{v} -> {m}");
        }
    }
}
