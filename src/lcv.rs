use tracing::info;

use crate::aggregate::{aggregate, estimate_folds};
use crate::config::LcvConfig;
use crate::diagnostics::diagnose;
use crate::error::Result;
use crate::grid::{GcpGrid, scan};
use crate::input::SummaryVectors;
use crate::jackknife::never_held_out;
use crate::moments::{FourthMomentEstimator, MomentEstimator};
use crate::types::LcvOutput;

/// Runs LCV with the default fourth-moment estimator.
pub fn run_lcv(data: &SummaryVectors, config: &LcvConfig) -> Result<LcvOutput> {
    run_lcv_with(data, config, &FourthMomentEstimator)
}

pub fn run_lcv_with(
    data: &SummaryVectors,
    config: &LcvConfig,
    estimator: &dyn MomentEstimator,
) -> Result<LcvOutput> {
    config.validate(data.len())?;
    info!(
        variants = data.len(),
        blocks = config.no_blocks,
        crosstrait_intercept = config.crosstrait_intercept.code(),
        ldsc_intercept = config.ldsc_intercept.code(),
        "LCV analysis began"
    );
    let leftover = never_held_out(data.len(), config.no_blocks);
    if !leftover.is_empty() {
        info!(
            "{} trailing variants are never held out by the jackknife",
            leftover.len()
        );
    }

    let jk = estimate_folds(data, config, estimator)?;
    let agg = aggregate(&jk);
    info!("Genetic correlation: {:.4} ({:.4})", agg.rho, agg.rho_err);
    if !agg.degenerate_folds.is_empty() {
        info!(
            "{} of {} folds have a negative heritability product",
            agg.degenerate_folds.len(),
            agg.n_blocks()
        );
    }

    let scan = scan(&agg, &GcpGrid::new())?;
    info!(
        "GCP posterior mean: {:.4} ({:.4}); P(GCP = 0) = {:.3e}",
        scan.gcp_est, scan.gcp_err, scan.p_gcpzero_2tailed
    );

    let diagnostics = diagnose(&agg);
    Ok(LcvOutput::assemble(&agg, &scan, diagnostics))
}
