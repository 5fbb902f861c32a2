//! Jackknife fold evaluation and reduction to point estimates.

use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::LcvConfig;
use crate::error::{LcvError, Result};
use crate::input::SummaryVectors;
use crate::jackknife::{Fold, folds};
use crate::moments::{BlockMoments, MomentEstimator};
use crate::stats::{jackknife_se, mean};

/// The eight per-fold sequences, index-aligned by fold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JackknifeMoments {
    pub rho: Vec<f64>,
    pub raw_asym1: Vec<f64>,
    pub raw_asym2: Vec<f64>,
    pub cross_intercept: Vec<f64>,
    pub s1: Vec<f64>,
    pub s2: Vec<f64>,
    pub intercept1: Vec<f64>,
    pub intercept2: Vec<f64>,
    /// Folds whose heritability product was negative.
    pub degenerate: Vec<bool>,
}

impl JackknifeMoments {
    pub fn from_folds(per_fold: &[BlockMoments]) -> Self {
        let pick = |f: fn(&BlockMoments) -> f64| per_fold.iter().map(f).collect::<Vec<_>>();
        Self {
            rho: pick(|m| m.rho),
            raw_asym1: pick(|m| m.raw_asym1),
            raw_asym2: pick(|m| m.raw_asym2),
            cross_intercept: pick(|m| m.cross_intercept),
            s1: pick(|m| m.s1),
            s2: pick(|m| m.s2),
            intercept1: pick(|m| m.intercept1),
            intercept2: pick(|m| m.intercept2),
            degenerate: per_fold.iter().map(|m| m.degenerate).collect(),
        }
    }

    pub fn n_blocks(&self) -> usize {
        self.rho.len()
    }
}

/// Point estimates and jackknife errors reduced from [`JackknifeMoments`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateEstimates {
    /// `[trait 1, trait 2, cross-trait]`.
    pub intercept: [f64; 3],
    pub rho: f64,
    pub rho_err: f64,
    pub s: [f64; 2],
    pub s_err: [f64; 2],
    pub rho_jk: Vec<f64>,
    /// `raw_asym1 - 3 * rho`, fold by fold.
    pub asym1_jk: Vec<f64>,
    pub asym2_jk: Vec<f64>,
    /// Indices of folds with an imaginary correlation.
    pub degenerate_folds: Vec<usize>,
}

impl AggregateEstimates {
    pub fn n_blocks(&self) -> usize {
        self.rho_jk.len()
    }

    /// `s / s_err` for each trait.
    pub fn h2_zscore(&self) -> [f64; 2] {
        [self.s[0] / self.s_err[0], self.s[1] / self.s_err[1]]
    }
}

/// Evaluates `estimator` on every leave-one-out fold, in fold order.
pub fn estimate_folds(
    data: &SummaryVectors,
    config: &LcvConfig,
    estimator: &dyn MomentEstimator,
) -> Result<JackknifeMoments> {
    let folds = folds(data.len(), config.no_blocks);
    let run_fold = |fold: &Fold| -> Result<BlockMoments> {
        let block = data.gather(&fold.retained_indices());
        let moments = estimator.estimate(&block, config)?;
        debug!(
            fold = fold.index,
            retained = fold.retained_len(),
            rho = moments.rho,
            "fold estimated"
        );
        Ok(moments)
    };

    let per_fold = match fold_pool(config.threads, folds.len())? {
        Some(pool) => pool.install(|| {
            folds
                .par_iter()
                .map(run_fold)
                .collect::<Result<Vec<_>>>()
        })?,
        None => folds.iter().map(run_fold).collect::<Result<Vec<_>>>()?,
    };
    Ok(JackknifeMoments::from_folds(&per_fold))
}

/// Worker pool for the fold map; never larger than the number of folds.
fn fold_pool(threads: Option<usize>, n_folds: usize) -> Result<Option<ThreadPool>> {
    let Some(requested) = threads else {
        return Ok(None);
    };
    let workers = requested.min(n_folds.max(1));
    if workers < requested {
        warn!("{requested} threads requested for {n_folds} jackknife folds; using {workers}");
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("lcv-fold-{i}"))
        .build()
        .map_err(|e| {
            LcvError::Argument(format!(
                "could not start {workers} workers for {n_folds} jackknife folds: {e}"
            ))
        })?;
    Ok(Some(pool))
}

pub fn aggregate(jk: &JackknifeMoments) -> AggregateEstimates {
    let asym1_jk = jk
        .raw_asym1
        .iter()
        .zip(&jk.rho)
        .map(|(raw, rho)| raw - 3.0 * rho)
        .collect();
    let asym2_jk = jk
        .raw_asym2
        .iter()
        .zip(&jk.rho)
        .map(|(raw, rho)| raw - 3.0 * rho)
        .collect();

    AggregateEstimates {
        intercept: [
            mean(&jk.intercept1),
            mean(&jk.intercept2),
            mean(&jk.cross_intercept),
        ],
        rho: mean(&jk.rho),
        rho_err: jackknife_se(&jk.rho),
        s: [mean(&jk.s1), mean(&jk.s2)],
        s_err: [jackknife_se(&jk.s1), jackknife_se(&jk.s2)],
        rho_jk: jk.rho.clone(),
        asym1_jk,
        asym2_jk,
        degenerate_folds: jk
            .degenerate
            .iter()
            .enumerate()
            .filter_map(|(k, d)| d.then_some(k))
            .collect(),
    }
}
