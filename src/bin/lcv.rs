use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use lcv::config::{CrossTraitIntercept, LcvConfig, LdscIntercept};
use lcv::io::{
    SummaryColumns, read_summary_vectors, write_lcv_json, write_likelihood, write_summary_vectors,
};
use lcv::logging::{RunLog, init_tracing};
use lcv::simulate::{SimConfig, simulate_summary_vectors};
use lcv::{LcvOutput, SummaryVectors, run_lcv};

#[derive(Parser)]
#[command(name = "lcv")]
#[command(about = "Latent causal variable estimation of the genetic causal proportion", long_about = None)]
struct Cli {
    /// Print per-fold estimates.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate GCP from a table of LD scores and Z-statistics.
    Run {
        #[arg(long, required = true)]
        input: PathBuf,
        #[arg(long, default_value = "L2")]
        ell_col: String,
        #[arg(long, default_value = "Z1")]
        z1_col: String,
        #[arg(long, default_value = "Z2")]
        z2_col: String,
        #[arg(long)]
        weight_col: Option<String>,
        #[command(flatten)]
        estimator: EstimatorArgs,
        #[arg(long, default_value = "lcv")]
        out: PathBuf,
    },
    /// Simulate summary statistics under the LCV model.
    Simulate {
        #[arg(long, required = true)]
        output: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        n_variants: usize,
        #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
        rho: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        gcp: f64,
        #[arg(long, default_value_t = 0.05)]
        h2_per_ell: f64,
        #[arg(long, default_value_t = 0.05)]
        causal_fraction: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        noise_correlation: f64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        gzip: bool,
        /// Also run LCV on the simulated data and write results next to `output`.
        #[arg(long)]
        analyze: bool,
        #[command(flatten)]
        estimator: EstimatorArgs,
    },
}

#[derive(clap::Args)]
struct EstimatorArgs {
    /// 0 = disjoint cohorts, 1 = estimate, 2 = known (`--cross-int`).
    #[arg(long, default_value_t = 1)]
    crosstrait_intercept: u8,
    /// 0 = fixed (`--n1`, `--n2`), 1 = estimate.
    #[arg(long, default_value_t = 1)]
    ldsc_intercept: u8,
    #[arg(long)]
    sig_threshold: Option<f64>,
    #[arg(long, default_value_t = 100)]
    no_blocks: usize,
    #[arg(long)]
    n1: Option<f64>,
    #[arg(long)]
    n2: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    cross_int: Option<f64>,
    #[arg(long)]
    threads: Option<usize>,
}

impl EstimatorArgs {
    fn to_config(&self) -> anyhow::Result<LcvConfig> {
        Ok(LcvConfig {
            crosstrait_intercept: CrossTraitIntercept::from_code(self.crosstrait_intercept)?,
            ldsc_intercept: LdscIntercept::from_code(self.ldsc_intercept)?,
            sig_threshold: self.sig_threshold.unwrap_or(f64::INFINITY),
            no_blocks: self.no_blocks,
            n1: self.n1,
            n2: self.n2,
            cross_int: self.cross_int,
            threads: self.threads,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            input,
            ell_col,
            z1_col,
            z2_col,
            weight_col,
            estimator,
            out,
        } => {
            let config = estimator.to_config()?;
            let columns = SummaryColumns {
                ell: ell_col,
                z1: z1_col,
                z2: z2_col,
                weights: weight_col,
            };
            let mut log = RunLog::create(&out)?;
            log.note(&format!("Reading summary statistics from {}", input.display()))?;
            let (data, dropped) = read_summary_vectors(&input, &columns)?;
            if dropped > 0 {
                log.warn(&format!(
                    "WARNING: dropped {dropped} rows with missing or non-finite values"
                ))?;
            }
            analyze(&data, &config, &out, &mut log)?;
            tracing::info!("Log written to {}", log.path().display());
        }
        Command::Simulate {
            output,
            n_variants,
            rho,
            gcp,
            h2_per_ell,
            causal_fraction,
            noise_correlation,
            seed,
            gzip,
            analyze: run_analysis,
            estimator,
        } => {
            let sim = SimConfig {
                n_variants,
                rho,
                gcp,
                h2_per_ell,
                causal_fraction,
                noise_correlation,
                seed,
                ..SimConfig::default()
            };
            let data = simulate_summary_vectors(&sim)?;
            write_summary_vectors(&data, &output, gzip)
                .with_context(|| format!("write {}", output.display()))?;
            tracing::info!("Wrote {} simulated variants to {}", data.len(), output.display());
            if run_analysis {
                let config = estimator.to_config()?;
                let prefix = strip_extensions(&output);
                let mut log = RunLog::create(&prefix)?;
                log.note(&format!("Simulated rho = {rho}, gcp = {gcp}, seed = {seed}"))?;
                analyze(&data, &config, &prefix, &mut log)?;
            }
        }
    }
    Ok(())
}

fn analyze(
    data: &SummaryVectors,
    config: &LcvConfig,
    prefix: &Path,
    log: &mut RunLog,
) -> anyhow::Result<()> {
    log.record(&format!(
        "LCV on {} variants with {} jackknife blocks",
        data.len(),
        config.no_blocks
    ))?;
    let out = run_lcv(data, config)?;
    report(&out, log)?;
    log.diagnostics(&out.diagnostics)?;

    let json_path = with_suffix(prefix, ".json");
    write_lcv_json(&out, &json_path)?;
    let curve_path = with_suffix(prefix, "_likelihood.tsv");
    write_likelihood(&out, &curve_path)?;
    log.note(&format!(
        "Results written to {} and {}",
        json_path.display(),
        curve_path.display()
    ))?;
    Ok(())
}

/// The correlation and posterior lines are already on the console from
/// `run_lcv`, so they only go to the file.
fn report(out: &LcvOutput, log: &mut RunLog) -> anyhow::Result<()> {
    log.record(&format!(
        "Genetic correlation: {:.4} ({:.4})",
        out.rho_est, out.rho_err
    ))?;
    log.record(&format!(
        "GCP posterior mean: {:.4} ({:.4})",
        out.gcp_pm, out.gcp_pse
    ))?;
    log.note(&format!(
        "GCP = 0 test: Z = {:.3}, P = {:.3e}",
        out.zsc_gcp, out.pval_gcpzero_2tailed
    ))?;
    log.note(&format!(
        "Full causality P-values: GCP = -1: {:.3e}, GCP = 1: {:.3e}",
        out.pval_fullycausal[0], out.pval_fullycausal[1]
    ))?;
    log.note(&format!(
        "Heritability Z-scores: {:.2}, {:.2}",
        out.h2_zscore[0], out.h2_zscore[1]
    ))?;
    Ok(())
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn strip_extensions(path: &Path) -> PathBuf {
    let mut out = path.to_path_buf();
    while out.extension().is_some() {
        out.set_extension("");
    }
    out
}
