//! Synthetic summary statistics under the latent causal variable model.
//!
//! Each variant carries a latent effect `L` shared by both traits and
//! trait-specific effects `U1`, `U2`. Trait `i` loads on `L` with `q_i`, where
//! `q1 * q2 = |rho|` and `q2 / q1 = |rho|^gcp`. Effects are sparse (a
//! `causal_fraction` of variants is non-null), scaled by `sqrt(h2_per_ell *
//! ell)` and observed with standard normal sampling noise.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use tracing::info;

use crate::input::SummaryVectors;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub n_variants: usize,
    pub rho: f64,
    pub gcp: f64,
    pub h2_per_ell: f64,
    pub causal_fraction: f64,
    /// Correlation of the two traits' sampling noise (sample overlap).
    pub noise_correlation: f64,
    pub min_ell: f64,
    pub max_ell: f64,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_variants: 10_000,
            rho: 0.5,
            gcp: 0.0,
            h2_per_ell: 0.05,
            causal_fraction: 0.05,
            noise_correlation: 0.0,
            min_ell: 1.0,
            max_ell: 50.0,
            seed: 1,
        }
    }
}

impl SimConfig {
    /// Loadings `(q1, q2)` on the latent causal variable; `q2` carries the sign
    /// of `rho`.
    pub fn loadings(&self) -> (f64, f64) {
        let abs_rho = self.rho.abs();
        let q1 = abs_rho.powf((1.0 - self.gcp) / 2.0);
        let q2 = abs_rho.powf((1.0 + self.gcp) / 2.0);
        (q1, self.rho.signum() * q2)
    }

    fn validate(&self) -> Result<()> {
        if self.n_variants == 0 {
            return Err(anyhow::anyhow!("n_variants must be positive"));
        }
        if !(self.rho.abs() > 0.0 && self.rho.abs() <= 1.0) {
            return Err(anyhow::anyhow!("rho must satisfy 0 < |rho| <= 1 (got {})", self.rho));
        }
        if !(-1.0..=1.0).contains(&self.gcp) {
            return Err(anyhow::anyhow!("gcp must lie in [-1, 1] (got {})", self.gcp));
        }
        if !(self.causal_fraction > 0.0 && self.causal_fraction <= 1.0) {
            return Err(anyhow::anyhow!(
                "causal_fraction must lie in (0, 1] (got {})",
                self.causal_fraction
            ));
        }
        if self.noise_correlation.abs() >= 1.0 {
            return Err(anyhow::anyhow!(
                "noise_correlation must lie in (-1, 1) (got {})",
                self.noise_correlation
            ));
        }
        if !(self.h2_per_ell >= 0.0) {
            return Err(anyhow::anyhow!("h2_per_ell must be non-negative"));
        }
        if !(self.min_ell > 0.0 && self.min_ell <= self.max_ell) {
            return Err(anyhow::anyhow!(
                "LD score range [{}, {}] is invalid",
                self.min_ell,
                self.max_ell
            ));
        }
        Ok(())
    }
}

fn sparse_effect(rng: &mut StdRng, causal_fraction: f64) -> f64 {
    if rng.r#gen::<f64>() < causal_fraction {
        let draw: f64 = StandardNormal.sample(rng);
        draw / causal_fraction.sqrt()
    } else {
        0.0
    }
}

pub fn simulate_summary_vectors(config: &SimConfig) -> Result<SummaryVectors> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (q1, q2) = config.loadings();
    let r1 = (1.0 - q1 * q1).max(0.0).sqrt();
    let r2 = (1.0 - q2 * q2).max(0.0).sqrt();
    let nc = config.noise_correlation;
    let nc_resid = (1.0 - nc * nc).sqrt();

    let m = config.n_variants;
    let mut ell = Vec::with_capacity(m);
    let mut z1 = Vec::with_capacity(m);
    let mut z2 = Vec::with_capacity(m);
    for _ in 0..m {
        let l = rng.gen_range(config.min_ell..=config.max_ell);
        let latent = sparse_effect(&mut rng, config.causal_fraction);
        let u1 = sparse_effect(&mut rng, config.causal_fraction);
        let u2 = sparse_effect(&mut rng, config.causal_fraction);
        let g1 = q1 * latent + r1 * u1;
        let g2 = q2 * latent + r2 * u2;

        let n1: f64 = StandardNormal.sample(&mut rng);
        let n2: f64 = StandardNormal.sample(&mut rng);
        let e1 = n1;
        let e2 = nc * n1 + nc_resid * n2;

        let scale = (config.h2_per_ell * l).sqrt();
        ell.push(l);
        z1.push(scale * g1 + e1);
        z2.push(scale * g2 + e2);
    }

    info!(
        variants = m,
        rho = config.rho,
        gcp = config.gcp,
        q1,
        q2,
        seed = config.seed,
        "simulated summary statistics"
    );
    Ok(SummaryVectors::new(ell, z1, z2, None)?)
}
