use crate::aggregate::AggregateEstimates;
use crate::diagnostics::Diagnostic;
use crate::grid::GcpScan;

/// Everything one LCV run reports.
#[derive(Debug, Clone, PartialEq)]
pub struct LcvOutput {
    /// Signed t statistic for GCP = 0.
    pub zsc_gcp: f64,
    pub pval_gcpzero_2tailed: f64,
    /// Posterior mean of GCP.
    pub gcp_pm: f64,
    /// Posterior standard deviation of GCP.
    pub gcp_pse: f64,
    pub rho_est: f64,
    pub rho_err: f64,
    /// `[p(GCP = -1), p(GCP = +1)]`.
    pub pval_fullycausal: [f64; 2],
    pub h2_zscore: [f64; 2],
    /// Likelihood at each grid value, from GCP = -1 to GCP = +1.
    pub likelihood: Vec<f64>,
    /// `[trait 1, trait 2, cross-trait]` LD score regression intercepts.
    pub intercept: [f64; 3],
    pub diagnostics: Vec<Diagnostic>,
}

impl LcvOutput {
    pub fn assemble(agg: &AggregateEstimates, scan: &GcpScan, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            zsc_gcp: scan.zsc_asym,
            pval_gcpzero_2tailed: scan.p_gcpzero_2tailed,
            gcp_pm: scan.gcp_est,
            gcp_pse: scan.gcp_err,
            rho_est: agg.rho,
            rho_err: agg.rho_err,
            pval_fullycausal: [scan.p_fullcausal2, scan.p_fullcausal1],
            h2_zscore: agg.h2_zscore(),
            likelihood: scan.likelihood(),
            intercept: agg.intercept,
            diagnostics,
        }
    }
}
