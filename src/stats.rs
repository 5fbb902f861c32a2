use statrs::distribution::{Continuous, ContinuousCDF, StudentsT};

use crate::error::{LcvError, Result};

/// Arithmetic mean; NaN in, NaN out, so a degenerate fold stays visible.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with an `n - 1` denominator.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (ss / (n as f64 - 1.0)).sqrt()
}

/// Jackknife standard error for leave-one-block-out estimates.
///
/// The folds overlap in all but one block, so the spread of the fold
/// estimates is scaled by `sqrt(B + 1)`.
pub fn jackknife_se(values: &[f64]) -> f64 {
    sample_std(values) * (values.len() as f64 + 1.0).sqrt()
}

pub fn weighted_mean(values: impl Iterator<Item = f64>, weights: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut sum_w = 0.0;
    for (v, w) in values.zip(weights) {
        sum += v * w;
        sum_w += w;
    }
    if sum_w == 0.0 { f64::NAN } else { sum / sum_w }
}

/// `sign(x) * sqrt(|x|)`.
pub fn signed_sqrt(value: f64) -> f64 {
    value.signum() * value.abs().sqrt()
}

pub fn solve_2x2(xtx: [[f64; 2]; 2], xty: [f64; 2]) -> Result<[f64; 2]> {
    let det = xtx[0][0] * xtx[1][1] - xtx[0][1] * xtx[1][0];
    if det == 0.0 || !det.is_finite() {
        return Err(LcvError::Numerical("Singular matrix in regression".to_string()));
    }
    let inv = [
        [xtx[1][1] / det, -xtx[0][1] / det],
        [-xtx[1][0] / det, xtx[0][0] / det],
    ];
    let b0 = inv[0][0] * xty[0] + inv[0][1] * xty[1];
    let b1 = inv[1][0] * xty[0] + inv[1][1] * xty[1];
    Ok([b0, b1])
}

/// Standard Student-t with `freedom` degrees of freedom.
#[derive(Debug, Clone)]
pub struct TDist {
    inner: StudentsT,
}

impl TDist {
    pub fn new(freedom: f64) -> Result<Self> {
        let inner = StudentsT::new(0.0, 1.0, freedom).map_err(|e| {
            LcvError::Numerical(format!("t distribution with {freedom} degrees of freedom: {e}"))
        })?;
        Ok(Self { inner })
    }

    pub fn pdf(&self, t: f64) -> f64 {
        if t.is_nan() {
            f64::NAN
        } else if t.is_infinite() {
            0.0
        } else {
            self.inner.pdf(t)
        }
    }

    pub fn cdf(&self, t: f64) -> f64 {
        if t.is_nan() {
            f64::NAN
        } else if t == f64::INFINITY {
            1.0
        } else if t == f64::NEG_INFINITY {
            0.0
        } else {
            self.inner.cdf(t)
        }
    }
}
