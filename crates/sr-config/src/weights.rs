//! Per-rater fault weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sr_common::{Error, Result};

/// Named non-negative weights, one per fault rater.
///
/// Run-time configuration, not domain data. A total weight of zero is
/// legal and makes the weighted fault fraction undefined (None) rather
/// than an error; setting a rater's weight to zero is the supported way
/// to exclude it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultWeights {
    weights: BTreeMap<String, f64>,
}

impl FaultWeights {
    pub fn new(weights: BTreeMap<String, f64>) -> FaultWeights {
        FaultWeights { weights }
    }

    /// Equal weight for every named rater.
    pub fn equal<I, S>(raters: I, weight: f64) -> FaultWeights
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FaultWeights {
            weights: raters.into_iter().map(|r| (r.into(), weight)).collect(),
        }
    }

    /// Semantic validation: every weight finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (rater, w) in &self.weights {
            if !w.is_finite() || *w < 0.0 {
                return Err(Error::OutOfRange {
                    field: format!("fault_weights.{rater}"),
                    value: *w,
                    expected: "a finite weight >= 0",
                });
            }
        }
        Ok(())
    }

    /// Weight for one rater; None when the rater is not configured.
    pub fn weight(&self, rater: &str) -> Option<f64> {
        self.weights.get(rater).copied()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Default for FaultWeights {
    /// Equal weight for the three raters the incident feed ships with.
    fn default() -> Self {
        FaultWeights::equal(["claude", "codex", "gemini"], 1.0)
    }
}
