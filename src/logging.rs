use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::diagnostics::Diagnostic;

/// Installs the fmt subscriber. `RUST_LOG` wins; otherwise `verbose` turns on
/// the per-fold debug events of the jackknife.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "lcv=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Plain-text record of one analysis, kept next to its results as
/// `<prefix>_lcv.log`.
pub struct RunLog {
    file: File,
    path: PathBuf,
}

impl RunLog {
    pub fn create(prefix: &Path) -> Result<Self> {
        let mut name = prefix.as_os_str().to_owned();
        name.push("_lcv.log");
        let path = PathBuf::from(name);
        let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `message` to the log and echoes it to the console.
    pub fn note(&mut self, message: &str) -> Result<()> {
        info!("{message}");
        self.record(message)
    }

    pub fn warn(&mut self, message: &str) -> Result<()> {
        warn!("{message}");
        self.record(message)
    }

    /// Log file only, for lines the estimator already reported.
    pub fn record(&mut self, message: &str) -> Result<()> {
        writeln!(self.file, "{message}")
            .with_context(|| format!("write {}", self.path.display()))
    }

    pub fn diagnostics(&mut self, diagnostics: &[Diagnostic]) -> Result<()> {
        for diagnostic in diagnostics {
            self.record(&diagnostic.to_string())?;
        }
        Ok(())
    }
}
