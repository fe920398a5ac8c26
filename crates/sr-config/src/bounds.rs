//! Bounded configuration values (the "slider" surface).

use serde::{Deserialize, Serialize};

use sr_common::{Error, Result};

/// A configuration value with its declared slider bounds.
///
/// The bounds travel with the value because the feasible-range
/// derivation of the exposure models evaluates the model at `min` and
/// `max` of its primary parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounded {
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl Bounded {
    pub fn new(value: f64, min: f64, max: f64) -> Bounded {
        Bounded { value, min, max }
    }

    /// Semantic validation: finite, ordered bounds, value inside them.
    pub fn validate(&self, field: &str) -> Result<()> {
        for (suffix, v) in [("value", self.value), ("min", self.min), ("max", self.max)] {
            if !v.is_finite() {
                return Err(Error::OutOfRange {
                    field: format!("{field}.{suffix}"),
                    value: v,
                    expected: "a finite number",
                });
            }
        }
        if self.min > self.max {
            return Err(Error::OutOfRange {
                field: format!("{field}.min"),
                value: self.min,
                expected: "min <= max",
            });
        }
        if self.value < self.min || self.value > self.max {
            return Err(Error::OutOfRange {
                field: format!("{field}.value"),
                value: self.value,
                expected: "within the declared [min, max]",
            });
        }
        Ok(())
    }
}
