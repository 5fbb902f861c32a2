use crate::error::{LcvError, Result};

/// How the covariance between the two traits' sampling errors is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossTraitIntercept {
    /// Cohorts are disjoint; the cross-trait intercept is fixed at zero.
    Disjoint,
    /// Sample overlap is unknown and the intercept is estimated from the data.
    #[default]
    Estimated,
    /// Sample overlap is known; the intercept is taken from `LcvConfig::cross_int`.
    Known,
}

impl CrossTraitIntercept {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Disjoint),
            1 => Ok(Self::Estimated),
            2 => Ok(Self::Known),
            other => Err(LcvError::Argument(format!(
                "crosstrait_intercept must be 0, 1 or 2 (got {other})"
            ))),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Disjoint => 0,
            Self::Estimated => 1,
            Self::Known => 2,
        }
    }
}

/// How the single-trait LD score regression intercepts are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LdscIntercept {
    /// Intercepts are known and supplied through `n1` and `n2`.
    Fixed,
    #[default]
    Estimated,
}

impl LdscIntercept {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Fixed),
            1 => Ok(Self::Estimated),
            other => Err(LcvError::Argument(format!(
                "ldsc_intercept must be 0 or 1 (got {other})"
            ))),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Fixed => 0,
            Self::Estimated => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LcvConfig {
    pub crosstrait_intercept: CrossTraitIntercept,
    pub ldsc_intercept: LdscIntercept,
    /// Variants with chi-square above `sig_threshold * mean(chisq)` are left out
    /// of intercept estimation.
    pub sig_threshold: f64,
    pub no_blocks: usize,
    /// Inverse phenotypic variance of trait 1, used as its fixed intercept.
    pub n1: Option<f64>,
    pub n2: Option<f64>,
    /// Sampling-error covariance between the traits.
    pub cross_int: Option<f64>,
    /// Worker threads for the per-fold moment estimation; `None` runs inline.
    pub threads: Option<usize>,
}

impl Default for LcvConfig {
    fn default() -> Self {
        Self {
            crosstrait_intercept: CrossTraitIntercept::Estimated,
            ldsc_intercept: LdscIntercept::Estimated,
            sig_threshold: f64::INFINITY,
            no_blocks: 100,
            n1: None,
            n2: None,
            cross_int: None,
            threads: None,
        }
    }
}

impl LcvConfig {
    /// Checks the configuration against `n_variants` input rows.
    pub fn validate(&self, n_variants: usize) -> Result<()> {
        if self.ldsc_intercept == LdscIntercept::Fixed {
            require_finite(self.n1, "n1", "ldsc_intercept = 0")?;
            require_finite(self.n2, "n2", "ldsc_intercept = 0")?;
        }
        if self.crosstrait_intercept == CrossTraitIntercept::Known {
            require_finite(self.cross_int, "cross_int", "crosstrait_intercept = 2")?;
        }
        if self.sig_threshold.is_nan() || self.sig_threshold <= 0.0 {
            return Err(LcvError::Argument(format!(
                "sig_threshold must be positive (got {})",
                self.sig_threshold
            )));
        }
        if self.no_blocks < 3 {
            return Err(LcvError::Argument(format!(
                "no_blocks must be at least 3 so the t distribution has positive degrees of freedom (got {})",
                self.no_blocks
            )));
        }
        if self.no_blocks > n_variants {
            return Err(LcvError::Argument(format!(
                "no_blocks ({}) exceeds the number of variants ({n_variants})",
                self.no_blocks
            )));
        }
        if self.threads == Some(0) {
            return Err(LcvError::Argument("threads must be positive".to_string()));
        }
        Ok(())
    }

    /// Degrees of freedom of the jackknife t statistics.
    pub fn degrees_of_freedom(&self) -> f64 {
        self.no_blocks as f64 - 2.0
    }
}

fn require_finite(value: Option<f64>, name: &str, when: &str) -> Result<()> {
    match value {
        Some(v) if v.is_finite() => Ok(()),
        Some(v) => Err(LcvError::Argument(format!(
            "{name} must be finite when {when} (got {v})"
        ))),
        None => Err(LcvError::Argument(format!("{name} is required when {when}"))),
    }
}
