//! Latent causal variable (LCV) estimation of the genetic causal proportion
//! between two traits from GWAS summary statistics.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod types;

pub mod aggregate;
pub mod diagnostics;
pub mod grid;
pub mod jackknife;
pub mod lcv;
pub mod moments;
pub mod stats;

pub mod io;
pub mod simulate;

pub use config::{CrossTraitIntercept, LcvConfig, LdscIntercept};
pub use error::{LcvError, Result};
pub use input::SummaryVectors;
pub use lcv::{run_lcv, run_lcv_with};
pub use types::LcvOutput;
