use std::fmt;

use tracing::warn;

use crate::aggregate::AggregateEstimates;

/// Advisory findings about the reliability of an estimate. None of them stop
/// the computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic {
    /// At least one fold had a negative heritability product, so its genetic
    /// correlation is not a real number, or the aggregate correlation is
    /// undefined.
    NegativeHeritability,
    /// `min(s / s_err) < 4`.
    VeryNoisyHeritability { min_z: f64 },
    /// `4 <= min(s / s_err) < 7`.
    NoisyHeritability { min_z: f64 },
    /// `|rho / rho_err| < 2`.
    NonSignificantCorrelation { z: f64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeHeritability => write!(
                f,
                "WARNING: negative heritability estimates; the genetic correlation is undefined and results are unstable with a high risk of false positives."
            ),
            Self::VeryNoisyHeritability { min_z } => write!(
                f,
                "WARNING: very noisy heritability estimates (min h2 Z = {min_z:.2}); there is a high risk of false positives."
            ),
            Self::NoisyHeritability { min_z } => write!(
                f,
                "WARNING: borderline noisy heritability estimates (min h2 Z = {min_z:.2}); there is some risk of false positives."
            ),
            Self::NonSignificantCorrelation { z } => write!(
                f,
                "WARNING: the genetic correlation is not significant (rho Z = {z:.2}); p-values are likely to be conservative."
            ),
        }
    }
}

pub fn diagnose(agg: &AggregateEstimates) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if !agg.degenerate_folds.is_empty() || !agg.rho.is_finite() {
        out.push(Diagnostic::NegativeHeritability);
    } else {
        let [z1, z2] = agg.h2_zscore();
        let min_z = z1.min(z2);
        if min_z < 4.0 {
            out.push(Diagnostic::VeryNoisyHeritability { min_z });
        } else if min_z < 7.0 {
            out.push(Diagnostic::NoisyHeritability { min_z });
        }
    }

    let z = agg.rho / agg.rho_err;
    // A NaN ratio carries no evidence of correlation either.
    if z.is_nan() || z.abs() < 2.0 {
        out.push(Diagnostic::NonSignificantCorrelation { z });
    }

    for diagnostic in &out {
        warn!("{diagnostic}");
    }
    out
}
