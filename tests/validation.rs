use lcv::config::{CrossTraitIntercept, LcvConfig, LdscIntercept};
use lcv::{LcvError, SummaryVectors, run_lcv};

fn small_vectors(m: usize) -> SummaryVectors {
    let ell: Vec<f64> = (0..m).map(|i| 1.0 + i as f64).collect();
    let z1: Vec<f64> = (0..m).map(|i| ((i * 7) % 5) as f64 - 2.0).collect();
    let z2: Vec<f64> = (0..m).map(|i| ((i * 3) % 7) as f64 - 3.0).collect();
    SummaryVectors::new(ell, z1, z2, None).expect("vectors")
}

#[test]
fn length_mismatch_is_a_shape_error() {
    let err = SummaryVectors::new(vec![1.0, 2.0, 3.0], vec![0.1, 0.2], vec![0.1, 0.2, 0.3], None)
        .unwrap_err();
    assert!(matches!(err, LcvError::Shape(_)), "{err}");

    let err = SummaryVectors::new(vec![1.0, 2.0], vec![0.1, 0.2], vec![0.1], None).unwrap_err();
    assert!(matches!(err, LcvError::Shape(_)), "{err}");

    let err = SummaryVectors::new(vec![1.0, 2.0], vec![0.1, 0.2], vec![0.1, 0.2], Some(vec![1.0]))
        .unwrap_err();
    assert!(matches!(err, LcvError::Shape(_)), "{err}");
}

#[test]
fn empty_input_is_a_shape_error() {
    let err = SummaryVectors::new(vec![], vec![], vec![], None).unwrap_err();
    assert!(matches!(err, LcvError::Shape(_)));
}

#[test]
fn default_weights_are_inverse_ld_scores_floored_at_one() {
    let data = SummaryVectors::new(vec![0.5, 1.0, 4.0], vec![0.0; 3], vec![0.0; 3], None).unwrap();
    assert_eq!(data.weights, vec![1.0, 1.0, 0.25]);
}

#[test]
fn config_defaults() {
    let config = LcvConfig::default();
    assert_eq!(config.crosstrait_intercept, CrossTraitIntercept::Estimated);
    assert_eq!(config.ldsc_intercept, LdscIntercept::Estimated);
    assert!(config.sig_threshold.is_infinite() && config.sig_threshold > 0.0);
    assert_eq!(config.no_blocks, 100);
    assert!(config.n1.is_none() && config.n2.is_none() && config.cross_int.is_none());
}

#[test]
fn fixed_intercepts_require_n1_and_n2() {
    let config = LcvConfig {
        ldsc_intercept: LdscIntercept::Fixed,
        n1: Some(1.0),
        no_blocks: 10,
        ..LcvConfig::default()
    };
    let err = config.validate(100).unwrap_err();
    assert!(matches!(err, LcvError::Argument(ref msg) if msg.contains("n2")), "{err}");
}

#[test]
fn known_cross_intercept_requires_value() {
    let config = LcvConfig {
        crosstrait_intercept: CrossTraitIntercept::Known,
        no_blocks: 10,
        ..LcvConfig::default()
    };
    assert!(matches!(config.validate(100), Err(LcvError::Argument(_))));
}

#[test]
fn block_count_bounds() {
    for no_blocks in [0, 1, 2] {
        let config = LcvConfig { no_blocks, ..LcvConfig::default() };
        assert!(matches!(config.validate(100), Err(LcvError::Argument(_))));
    }
    let config = LcvConfig { no_blocks: 101, ..LcvConfig::default() };
    assert!(matches!(config.validate(100), Err(LcvError::Argument(_))));
    let config = LcvConfig { no_blocks: 100, ..LcvConfig::default() };
    assert!(config.validate(100).is_ok());
}

#[test]
fn non_positive_threshold_is_rejected() {
    for sig_threshold in [0.0, -1.0, f64::NAN] {
        let config = LcvConfig { sig_threshold, no_blocks: 10, ..LcvConfig::default() };
        assert!(matches!(config.validate(100), Err(LcvError::Argument(_))));
    }
}

#[test]
fn intercept_codes() {
    assert_eq!(CrossTraitIntercept::from_code(0).unwrap(), CrossTraitIntercept::Disjoint);
    assert_eq!(CrossTraitIntercept::from_code(2).unwrap(), CrossTraitIntercept::Known);
    assert!(CrossTraitIntercept::from_code(3).is_err());
    assert_eq!(LdscIntercept::from_code(0).unwrap(), LdscIntercept::Fixed);
    assert!(LdscIntercept::from_code(2).is_err());
    assert_eq!(LdscIntercept::Estimated.code(), 1);
}

#[test]
fn validation_failure_happens_before_estimation() {
    let data = small_vectors(20);
    let config = LcvConfig { no_blocks: 2, ..LcvConfig::default() };
    assert!(matches!(run_lcv(&data, &config), Err(LcvError::Argument(_))));
}
