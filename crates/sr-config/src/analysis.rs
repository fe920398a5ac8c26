//! The immutable configuration value threaded through every
//! reconciliation and estimation pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sr_common::{Error, Result};

use crate::bounds::Bounded;
use crate::exposure::{ExposureConfig, ExposureModel};
use crate::weights::FaultWeights;
use crate::{CREDIBLE_MASS_PCT_MAX, CREDIBLE_MASS_PCT_MIN};

/// Full analysis configuration.
///
/// Construct, validate once, then pass by reference; nothing in the
/// core mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Credible mass in percent, e.g. 90 for a 90% interval.
    pub credible_mass_pct: f64,

    /// Per-rater fault weights.
    pub fault_weights: FaultWeights,

    /// What-if exposure models per series.
    pub exposure: ExposureConfig,
}

impl AnalysisConfig {
    /// Semantic validation of the whole bundle.
    pub fn validate(&self) -> Result<()> {
        if !self.credible_mass_pct.is_finite()
            || self.credible_mass_pct < CREDIBLE_MASS_PCT_MIN
            || self.credible_mass_pct > CREDIBLE_MASS_PCT_MAX
        {
            return Err(Error::OutOfRange {
                field: "credible_mass_pct".to_string(),
                value: self.credible_mass_pct,
                expected: "within [50, 99.9]",
            });
        }
        self.fault_weights.validate()?;
        self.exposure.validate()
    }

    /// Credible mass as a fraction strictly inside (0, 1).
    pub fn credible_mass(&self) -> f64 {
        self.credible_mass_pct / 100.0
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            credible_mass_pct: 90.0,
            fault_weights: FaultWeights::default(),
            exposure: ExposureConfig {
                series: BTreeMap::from([
                    (
                        "waymo".to_string(),
                        ExposureModel::Simple {
                            base_miles: Bounded::new(40.0e6, 25.0e6, 60.0e6),
                            deadhead_fraction: 0.25,
                        },
                    ),
                    (
                        "tesla".to_string(),
                        ExposureModel::Composite {
                            base_miles: Bounded::new(3.0e6, 1.0e6, 8.0e6),
                            fixed_era_miles: 250_000.0,
                            qualifying_fraction: 0.6,
                            deadhead_fraction: 0.3,
                        },
                    ),
                    (
                        "zoox".to_string(),
                        ExposureModel::Simple {
                            base_miles: Bounded::new(2.0e6, 0.5e6, 4.0e6),
                            deadhead_fraction: 0.35,
                        },
                    ),
                    (
                        "waymo-scaled".to_string(),
                        ExposureModel::Derived {
                            peer: "waymo".to_string(),
                            divisor: Bounded::new(4.0, 2.0, 10.0),
                        },
                    ),
                ]),
            },
        }
    }
}
