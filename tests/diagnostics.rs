use lcv::aggregate::AggregateEstimates;
use lcv::diagnostics::{Diagnostic, diagnose};

fn estimates(rho: f64, rho_err: f64, s: [f64; 2], s_err: [f64; 2]) -> AggregateEstimates {
    AggregateEstimates {
        intercept: [1.0, 1.0, 0.0],
        rho,
        rho_err,
        s,
        s_err,
        rho_jk: vec![rho; 5],
        asym1_jk: vec![0.0; 5],
        asym2_jk: vec![0.0; 5],
        degenerate_folds: Vec::new(),
    }
}

#[test]
fn clean_estimates_raise_nothing() {
    assert!(diagnose(&estimates(0.5, 0.05, [1.0, 1.0], [0.1, 0.1])).is_empty());
}

#[test]
fn undefined_correlation_suppresses_heritability_checks() {
    let out = diagnose(&estimates(f64::NAN, 0.05, [0.1, 0.1], [1.0, 1.0]));
    assert_eq!(out[0], Diagnostic::NegativeHeritability);
    assert!(!out.iter().any(|d| matches!(
        d,
        Diagnostic::VeryNoisyHeritability { .. } | Diagnostic::NoisyHeritability { .. }
    )));
    assert!(matches!(out[1], Diagnostic::NonSignificantCorrelation { .. }));
}

#[test]
fn one_imaginary_fold_is_enough_to_warn() {
    let mut agg = estimates(0.5, 0.05, [1.0, 1.0], [0.1, 0.1]);
    agg.degenerate_folds = vec![3];
    assert_eq!(diagnose(&agg), vec![Diagnostic::NegativeHeritability]);
}

#[test]
fn heritability_noise_levels() {
    let very = diagnose(&estimates(0.5, 0.05, [1.0, 0.3], [0.1, 0.1]));
    assert_eq!(very, vec![Diagnostic::VeryNoisyHeritability { min_z: 0.3 / 0.1 }]);

    let borderline = diagnose(&estimates(0.5, 0.05, [0.5, 1.0], [0.1, 0.1]));
    assert_eq!(borderline, vec![Diagnostic::NoisyHeritability { min_z: 0.5 / 0.1 }]);
}

#[test]
fn correlation_check_is_independent_of_heritability_checks() {
    let out = diagnose(&estimates(0.1, 0.1, [0.3, 1.0], [0.1, 0.1]));
    assert_eq!(out.len(), 2);
    assert!(matches!(out[0], Diagnostic::VeryNoisyHeritability { .. }));
    assert!(matches!(out[1], Diagnostic::NonSignificantCorrelation { z } if (z - 1.0).abs() < 1e-12));
}

#[test]
fn warnings_are_readable() {
    let text = Diagnostic::NonSignificantCorrelation { z: 1.234 }.to_string();
    assert!(text.starts_with("WARNING"));
    assert!(text.contains("1.23"));
}
