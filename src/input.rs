use crate::error::{LcvError, Result};

/// Per-variant LD scores, Z-statistics for both traits, and regression weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryVectors {
    pub ell: Vec<f64>,
    pub z1: Vec<f64>,
    pub z2: Vec<f64>,
    pub weights: Vec<f64>,
}

impl SummaryVectors {
    /// Validates lengths and fills in the default weights `1 / max(1, ell)`
    /// when none are given.
    pub fn new(ell: Vec<f64>, z1: Vec<f64>, z2: Vec<f64>, weights: Option<Vec<f64>>) -> Result<Self> {
        if ell.is_empty() {
            return Err(LcvError::Shape("ell must contain at least one variant".to_string()));
        }
        check_equal_length(ell.len(), z1.len(), "ell", "z1")?;
        check_equal_length(ell.len(), z2.len(), "ell", "z2")?;
        let weights = match weights {
            Some(w) => {
                check_equal_length(ell.len(), w.len(), "ell", "weights")?;
                w
            }
            None => default_weights(&ell),
        };
        Ok(Self { ell, z1, z2, weights })
    }

    pub fn len(&self) -> usize {
        self.ell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ell.is_empty()
    }

    /// Copies the variants at `indices` into a block view for one fold.
    pub fn gather(&self, indices: &[usize]) -> BlockInput {
        BlockInput {
            ell: indices.iter().map(|&i| self.ell[i]).collect(),
            z1: indices.iter().map(|&i| self.z1[i]).collect(),
            z2: indices.iter().map(|&i| self.z2[i]).collect(),
            weights: indices.iter().map(|&i| self.weights[i]).collect(),
        }
    }
}

/// The retained variants of one jackknife fold.
#[derive(Debug, Clone)]
pub struct BlockInput {
    pub ell: Vec<f64>,
    pub z1: Vec<f64>,
    pub z2: Vec<f64>,
    pub weights: Vec<f64>,
}

impl BlockInput {
    pub fn len(&self) -> usize {
        self.ell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ell.is_empty()
    }
}

pub fn default_weights(ell: &[f64]) -> Vec<f64> {
    ell.iter().map(|l| 1.0 / l.max(1.0)).collect()
}

pub fn check_equal_length(
    left_len: usize,
    right_len: usize,
    left_name: &str,
    right_name: &str,
) -> Result<()> {
    if left_len != right_len {
        return Err(LcvError::Shape(format!(
            "Length of {left_name} ({left_len}) and {right_name} ({right_len}) should be equal"
        )));
    }
    Ok(())
}
