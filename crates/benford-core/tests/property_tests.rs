use benford_core::digits::expected;
use benford_core::{
    digit_test, mad, second_order_test, AnalysisConfig, AnalysisSession, Confidence, MadConformity,
    Precision, Sample, TestKind,
};

/// 60 000 points spaced evenly in log10 over six decades.
fn log_grid() -> Vec<f64> {
    (0..6)
        .flat_map(|k| (0..10_000).map(move |j| 10f64.powi(k) * 10f64.powf(f64::from(j) / 10_000.0)))
        .collect()
}

fn fine_config() -> AnalysisConfig {
    AnalysisConfig::default()
        .with_decimals(Precision::Fixed(8))
        .with_confidence(Some(Confidence::NinetyFive))
}

/// First digits only: `round(n_benford * E(d))` Benford entries plus
/// `n_uniform / 9` entries per digit.
fn mixture(n_benford: usize, n_uniform: usize) -> Sample {
    let e = expected(TestKind::FirstDigit);
    let mut values = Vec::new();
    for (digit, p) in e.iter() {
        let benford = (n_benford as f64 * p).round() as usize;
        let count = benford + n_uniform / 9;
        values.extend(std::iter::repeat(i64::from(digit) * 100).take(count));
    }
    Sample::Integers(values)
}

#[test]
fn test_log_grid_passes_chi_square_and_ks() {
    let session = AnalysisSession::new(Sample::Floats(log_grid()), fine_config());
    for kind in [
        TestKind::FirstDigit,
        TestKind::FirstTwoDigits,
        TestKind::FirstThreeDigits,
        TestKind::SecondDigit,
    ] {
        let r = session.result(kind).unwrap();
        assert_eq!(r.n, 60_000, "{kind}");
        assert_eq!(
            r.chi_square.conforms,
            Some(true),
            "{kind} chi2={}",
            r.chi_square.statistic
        );
        assert_eq!(r.ks.conforms, Some(true), "{kind} ks={}", r.ks.statistic);
    }
}

#[test]
fn test_second_order_of_benford_stays_close() {
    let grid = Sample::Floats(log_grid());
    let r = second_order_test(&grid, TestKind::FirstDigit, &fine_config()).unwrap();
    assert_eq!(r.n, 59_999);
    assert_eq!(
        r.mad.conformity,
        Some(MadConformity::Close),
        "mad={}",
        r.mad.value
    );
}

#[test]
fn test_mad_grows_with_uniform_noise() {
    let total = 9000;
    let config = AnalysisConfig::default();
    let mads: Vec<f64> = [0usize, 1800, 3600, 5400, 7200, 9000]
        .iter()
        .map(|&n_uniform| {
            let sample = mixture(total - n_uniform, n_uniform);
            mad(&sample, TestKind::FirstDigit, &config).unwrap()
        })
        .collect();
    assert!(mads[0] < 1e-4, "clean mad={}", mads[0]);
    assert!(mads.windows(2).all(|w| w[0] < w[1]), "{mads:?}");
}

#[test]
fn test_pure_benford_mixture_is_close() {
    let r = digit_test(
        &mixture(9000, 0),
        TestKind::FirstDigit,
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert_eq!(r.mad.conformity, Some(MadConformity::Close));
    assert_eq!(r.chi_square.conforms, Some(true));
}

#[cfg(feature = "synthetic")]
#[test]
fn test_random_contamination_raises_mad() {
    use benford_core::synthetic::contaminated_sample;

    let config = AnalysisConfig::default().with_decimals(Precision::Fixed(4));
    let clean = Sample::Floats(contaminated_sample(20_000, 5, 0.0, Some(11)).unwrap());
    let noisy = Sample::Floats(contaminated_sample(20_000, 5, 1.0, Some(11)).unwrap());
    let clean_mad = mad(&clean, TestKind::FirstDigit, &config).unwrap();
    let noisy_mad = mad(&noisy, TestKind::FirstDigit, &config).unwrap();
    assert!(clean_mad < 0.006, "clean mad={clean_mad}");
    assert!(noisy_mad > 0.03, "noisy mad={noisy_mad}");
}
