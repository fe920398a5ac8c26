//! Per-series exposure models for the what-if estimation view.
//!
//! Each series maps its parameter bundle to an exposure-mile figure plus
//! a feasible range derived by evaluating the model at the primary
//! parameter's declared minimum and maximum. The shapes form a closed
//! tagged variant selected by pattern match.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sr_common::{Error, Result};

use crate::bounds::Bounded;

/// One exposure model shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ExposureModel {
    /// Deadhead-only: `miles = base_miles / (1 - deadhead_fraction)`.
    Simple {
        base_miles: Bounded,
        deadhead_fraction: f64,
    },

    /// Split-regime: an early era where all miles count (fixed
    /// historical total) followed by an era where only a configurable
    /// fraction qualifies, then the deadhead multiplier.
    Composite {
        base_miles: Bounded,
        fixed_era_miles: f64,
        qualifying_fraction: f64,
        deadhead_fraction: f64,
    },

    /// Ratio-of-peer: exposure equals the peer series' exposure
    /// verbatim; the rate estimate is the peer's scaled by 1/divisor.
    Derived { peer: String, divisor: Bounded },
}

impl ExposureModel {
    /// Semantic validation of the parameter bundle.
    pub fn validate(&self, series: &str) -> Result<()> {
        match self {
            ExposureModel::Simple {
                base_miles,
                deadhead_fraction,
            } => {
                base_miles.validate(&format!("{series}.base_miles"))?;
                validate_fraction(series, "deadhead_fraction", *deadhead_fraction)?;
                validate_non_negative(series, "base_miles.min", base_miles.min)
            }
            ExposureModel::Composite {
                base_miles,
                fixed_era_miles,
                qualifying_fraction,
                deadhead_fraction,
            } => {
                base_miles.validate(&format!("{series}.base_miles"))?;
                validate_non_negative(series, "fixed_era_miles", *fixed_era_miles)?;
                validate_fraction(series, "deadhead_fraction", *deadhead_fraction)?;
                if !qualifying_fraction.is_finite()
                    || !(0.0..=1.0).contains(qualifying_fraction)
                {
                    return Err(Error::OutOfRange {
                        field: format!("{series}.qualifying_fraction"),
                        value: *qualifying_fraction,
                        expected: "within [0, 1]",
                    });
                }
                // Domain precondition, not a range check: the declared
                // minimum must already cover the fixed era.
                if base_miles.min < *fixed_era_miles {
                    return Err(Error::OutOfRange {
                        field: format!("{series}.base_miles.min"),
                        value: base_miles.min,
                        expected: "at least the fixed-era miles",
                    });
                }
                Ok(())
            }
            ExposureModel::Derived { divisor, .. } => {
                divisor.validate(&format!("{series}.divisor"))
            }
        }
    }

    /// Exposure miles at a given primary-parameter value.
    ///
    /// Derived models have no local evaluation; the config resolves
    /// them through their peer.
    fn miles_at(&self, base: f64) -> Result<f64> {
        match self {
            ExposureModel::Simple {
                deadhead_fraction, ..
            } => Ok(base * deadhead_multiplier(*deadhead_fraction)?),
            ExposureModel::Composite {
                fixed_era_miles,
                qualifying_fraction,
                deadhead_fraction,
                ..
            } => {
                if base < *fixed_era_miles {
                    return Err(Error::OutOfRange {
                        field: "base_miles".to_string(),
                        value: base,
                        expected: "at least the fixed-era miles",
                    });
                }
                let qualifying = fixed_era_miles + qualifying_fraction * (base - fixed_era_miles);
                Ok(qualifying * deadhead_multiplier(*deadhead_fraction)?)
            }
            // Derived models have no local evaluation; callers resolve
            // them through the peer before getting here.
            ExposureModel::Derived { peer, .. } => Err(Error::UnknownSeries {
                name: peer.clone(),
                referrer: "derived model evaluated locally".to_string(),
            }),
        }
    }
}

/// `1 / (1 - deadhead_fraction)`; fails outside [0, 1).
fn deadhead_multiplier(fraction: f64) -> Result<f64> {
    if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return Err(Error::OutOfRange {
            field: "deadhead_fraction".to_string(),
            value: fraction,
            expected: "within [0, 1)",
        });
    }
    Ok(1.0 / (1.0 - fraction))
}

fn validate_fraction(series: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(Error::OutOfRange {
            field: format!("{series}.{field}"),
            value,
            expected: "within [0, 1)",
        });
    }
    Ok(())
}

fn validate_non_negative(series: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::OutOfRange {
            field: format!("{series}.{field}"),
            value,
            expected: "a finite number >= 0",
        });
    }
    Ok(())
}

/// All configured estimation series, keyed by series name.
///
/// Operator series carry their own model; synthetic series use
/// [`ExposureModel::Derived`] to track a peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureConfig {
    pub series: BTreeMap<String, ExposureModel>,
}

impl ExposureConfig {
    /// Validate every model plus cross-series references: a derived
    /// series must name an existing, non-derived peer.
    pub fn validate(&self) -> Result<()> {
        for (name, model) in &self.series {
            model.validate(name)?;
            if let ExposureModel::Derived { peer, .. } = model {
                match self.series.get(peer) {
                    None => {
                        return Err(Error::UnknownSeries {
                            name: peer.clone(),
                            referrer: name.clone(),
                        })
                    }
                    Some(ExposureModel::Derived { .. }) => {
                        return Err(Error::UnknownSeries {
                            name: peer.clone(),
                            referrer: format!("{name} (peer must not itself be derived)"),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Exposure miles for one series, resolving derived models one
    /// level through their peer.
    pub fn miles(&self, name: &str) -> Result<f64> {
        let model = self.get(name)?;
        match model {
            ExposureModel::Derived { peer, .. } => {
                let peer_model = self.get(peer)?;
                match peer_model {
                    ExposureModel::Derived { .. } => Err(Error::UnknownSeries {
                        name: peer.clone(),
                        referrer: format!("{name} (peer must not itself be derived)"),
                    }),
                    _ => peer_model.miles_at(primary_value(peer_model)),
                }
            }
            _ => model.miles_at(primary_value(model)),
        }
    }

    /// Feasible exposure range: the model evaluated at the primary
    /// parameter's declared minimum and maximum, other parameters held
    /// fixed. Derived series inherit the peer's range, resolved one
    /// level like [`ExposureConfig::miles`].
    pub fn feasible_range(&self, name: &str) -> Result<(f64, f64)> {
        let mut model = self.get(name)?;
        if let ExposureModel::Derived { peer, .. } = model {
            let peer_model = self.get(peer)?;
            if matches!(peer_model, ExposureModel::Derived { .. }) {
                return Err(Error::UnknownSeries {
                    name: peer.clone(),
                    referrer: format!("{name} (peer must not itself be derived)"),
                });
            }
            model = peer_model;
        }
        let bounds = primary_bounds(model);
        let at_min = model.miles_at(bounds.min)?;
        let at_max = model.miles_at(bounds.max)?;
        Ok((at_min.min(at_max), at_min.max(at_max)))
    }

    pub fn get(&self, name: &str) -> Result<&ExposureModel> {
        self.series.get(name).ok_or_else(|| Error::UnknownSeries {
            name: name.to_string(),
            referrer: "exposure config".to_string(),
        })
    }
}

fn primary_value(model: &ExposureModel) -> f64 {
    primary_bounds(model).value
}

fn primary_bounds(model: &ExposureModel) -> Bounded {
    match model {
        ExposureModel::Simple { base_miles, .. }
        | ExposureModel::Composite { base_miles, .. } => *base_miles,
        ExposureModel::Derived { divisor, .. } => *divisor,
    }
}
