//! Per-fold mixed fourth-moment estimation.
//!
//! A [`MomentEstimator`] turns the retained variants of one jackknife fold into
//! the eight scalars the aggregator consumes. [`FourthMomentEstimator`] is the
//! default: weighted LD score regression intercepts followed by intercept
//! corrected second and mixed fourth moments of the Z-statistics.

use tracing::trace;

use crate::config::{CrossTraitIntercept, LcvConfig, LdscIntercept};
use crate::error::{LcvError, Result};
use crate::input::BlockInput;
use crate::stats::{signed_sqrt, solve_2x2, weighted_mean};

/// Moment estimates from one fold, in the collaborator's return order.
///
/// A negative heritability product makes the correlation imaginary. `rho` then
/// holds its modulus `|g| / sqrt(|h1 h2|)` carrying the sign of the genetic
/// covariance, the raw asymmetries are scaled by the same real norm, and
/// `degenerate` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMoments {
    pub rho: f64,
    /// Normalized `E[g1^3 g2]` before subtracting `3 * rho`.
    pub raw_asym1: f64,
    /// Normalized `E[g2^3 g1]` before subtracting `3 * rho`.
    pub raw_asym2: f64,
    pub cross_intercept: f64,
    pub s1: f64,
    pub s2: f64,
    pub intercept1: f64,
    pub intercept2: f64,
    pub degenerate: bool,
}

/// Computes [`BlockMoments`] for the retained variants of a single fold.
///
/// Implementations must not keep state between calls; folds may be evaluated
/// in any order and on any thread.
pub trait MomentEstimator: Sync {
    fn estimate(&self, block: &BlockInput, config: &LcvConfig) -> Result<BlockMoments>;
}

impl<F> MomentEstimator for F
where
    F: Fn(&BlockInput, &LcvConfig) -> Result<BlockMoments> + Sync,
{
    fn estimate(&self, block: &BlockInput, config: &LcvConfig) -> Result<BlockMoments> {
        self(block, config)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FourthMomentEstimator;

impl MomentEstimator for FourthMomentEstimator {
    fn estimate(&self, block: &BlockInput, config: &LcvConfig) -> Result<BlockMoments> {
        if block.is_empty() {
            return Err(LcvError::Shape("fold retains no variants".to_string()));
        }
        let w = &block.weights;
        let chi1: Vec<f64> = block.z1.iter().map(|z| z * z).collect();
        let chi2: Vec<f64> = block.z2.iter().map(|z| z * z).collect();
        let zz: Vec<f64> = block.z1.iter().zip(&block.z2).map(|(a, b)| a * b).collect();

        let keep1 = below_threshold(&chi1, config.sig_threshold);
        let keep2 = below_threshold(&chi2, config.sig_threshold);

        let (c1, c2) = match config.ldsc_intercept {
            LdscIntercept::Estimated => (
                ldsc_intercept(&block.ell, &chi1, w, &keep1)?,
                ldsc_intercept(&block.ell, &chi2, w, &keep2)?,
            ),
            LdscIntercept::Fixed => fixed_intercepts(config)?,
        };

        let c12 = match config.crosstrait_intercept {
            CrossTraitIntercept::Disjoint => 0.0,
            CrossTraitIntercept::Estimated => {
                let keep: Vec<bool> = keep1.iter().zip(&keep2).map(|(a, b)| *a && *b).collect();
                ldsc_intercept(&block.ell, &zz, w, &keep)?
            }
            CrossTraitIntercept::Known => config.cross_int.ok_or_else(|| {
                LcvError::Argument("cross_int is required when crosstrait_intercept = 2".to_string())
            })?,
        };

        let h1 = weighted_mean(chi1.iter().copied(), w) - c1;
        let h2 = weighted_mean(chi2.iter().copied(), w) - c2;
        let g = weighted_mean(zz.iter().copied(), w) - c12;
        let product = h1 * h2;
        let norm = product.abs().sqrt();
        let rho = g / norm;

        let m31 = weighted_mean(
            block.z1.iter().zip(&block.z2).map(|(a, b)| a * a * a * b),
            w,
        );
        let m13 = weighted_mean(
            block.z2.iter().zip(&block.z1).map(|(b, a)| b * b * b * a),
            w,
        );
        let k41 = m31 - 3.0 * c12 * h1 - 3.0 * c1 * g - 3.0 * c1 * c12;
        let k42 = m13 - 3.0 * c12 * h2 - 3.0 * c2 * g - 3.0 * c2 * c12;

        let ell_mean = weighted_mean(block.ell.iter().copied(), w);
        let ell_sq_mean = weighted_mean(block.ell.iter().map(|l| l * l), w);
        let kappa = ell_sq_mean / (ell_mean * ell_mean);

        let moments = BlockMoments {
            rho,
            raw_asym1: k41 / (h1 * norm * kappa),
            raw_asym2: k42 / (h2 * norm * kappa),
            cross_intercept: c12,
            s1: signed_sqrt(h1),
            s2: signed_sqrt(h2),
            intercept1: c1,
            intercept2: c2,
            degenerate: product < 0.0,
        };
        trace!(?moments, n = block.len(), "block moments");
        Ok(moments)
    }
}

fn fixed_intercepts(config: &LcvConfig) -> Result<(f64, f64)> {
    match (config.n1, config.n2) {
        (Some(n1), Some(n2)) => Ok((n1, n2)),
        _ => Err(LcvError::Argument(
            "n1 and n2 are required when ldsc_intercept = 0".to_string(),
        )),
    }
}

fn below_threshold(chisq: &[f64], sig_threshold: f64) -> Vec<bool> {
    if sig_threshold.is_infinite() {
        return vec![true; chisq.len()];
    }
    let cutoff = sig_threshold * chisq.iter().sum::<f64>() / chisq.len() as f64;
    chisq.iter().map(|c| *c <= cutoff).collect()
}

/// Weighted regression of `y` on `[ell, 1]` over the kept variants; returns
/// the fitted constant term.
pub fn ldsc_intercept(ell: &[f64], y: &[f64], weights: &[f64], keep: &[bool]) -> Result<f64> {
    let mut xtx = [[0.0; 2]; 2];
    let mut xty = [0.0; 2];
    for i in 0..ell.len() {
        if !keep[i] {
            continue;
        }
        let w = weights[i];
        let l = ell[i];
        xtx[0][0] += w * l * l;
        xtx[0][1] += w * l;
        xtx[1][0] += w * l;
        xtx[1][1] += w;
        xty[0] += w * l * y[i];
        xty[1] += w * y[i];
    }
    let reg = solve_2x2(xtx, xty)
        .map_err(|e| LcvError::Numerical(format!("LD score regression for intercept: {e}")))?;
    Ok(reg[1])
}
