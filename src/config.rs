//! Induction Configuration
//!
//! Optional stopping thresholds applied while growing a tree. A threshold
//! left as `None` does not constrain the tree.
use crate::errors::GainsplitError;
use crate::utils::{validate_positive_float_parameter, validate_positive_int_parameter};
use serde::{Deserialize, Serialize};

/// Stopping thresholds for tree induction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperparameters {
    /// Nodes at this depth become leaves. The root is at depth 0.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Subsets with fewer records than this become leaves.
    #[serde(default)]
    pub min_samples_split: Option<usize>,
    /// Splits whose best gain is below this become leaves.
    #[serde(default)]
    pub min_gain: Option<f64>,
}

impl Hyperparameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn set_min_samples_split(mut self, min_samples_split: Option<usize>) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn set_min_gain(mut self, min_gain: Option<f64>) -> Self {
        self.min_gain = min_gain;
        self
    }

    /// Check every set threshold is in range.
    pub fn validate(&self) -> Result<(), GainsplitError> {
        if let Some(d) = self.max_depth {
            validate_positive_int_parameter(d, "max_depth")?;
        }
        if let Some(n) = self.min_samples_split {
            validate_positive_int_parameter(n, "min_samples_split")?;
        }
        if let Some(g) = self.min_gain {
            validate_positive_float_parameter(g, "min_gain")?;
        }
        Ok(())
    }

    /// Whether a subset of `n_records` at `depth` has to stop as a leaf.
    pub fn stops_at(&self, depth: usize, n_records: usize) -> bool {
        self.max_depth.is_some_and(|d| depth >= d) || self.min_samples_split.is_some_and(|m| n_records < m)
    }

    /// Whether `gain` is too small to split on.
    pub fn below_min_gain(&self, gain: f64) -> bool {
        self.min_gain.is_some_and(|m| gain < m)
    }
}
