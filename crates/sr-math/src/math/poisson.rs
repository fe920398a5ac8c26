//! Jeffreys-prior credible intervals for a Poisson rate.
//!
//! The observed count k over exposure m gives the posterior
//! Gamma(k + 0.5, m) for the incident rate. Estimates are reported
//! inverted, in exposure units per incident (miles per incident), which
//! is why the low bound comes from the upper tail quantile and vice
//! versa.

use serde::{Deserialize, Serialize};

use super::quantile::gamma_quantile;
use super::MathError;

/// A credible interval in exposure units per incident.
///
/// Derived on demand, never persisted; `lo <= median <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    /// Posterior median, exposure units per incident.
    pub median: f64,

    /// Lower credible bound.
    pub lo: f64,

    /// Upper credible bound.
    pub hi: f64,
}

impl RateEstimate {
    /// Scale all three fields by a constant factor.
    ///
    /// Lets a derived comparison series track a peer's uncertainty band
    /// exactly, scaled, without recomputing the posterior.
    pub fn scaled(&self, factor: f64) -> Result<RateEstimate, MathError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(MathError::InvalidScale(factor));
        }
        Ok(RateEstimate {
            median: self.median * factor,
            lo: self.lo * factor,
            hi: self.hi * factor,
        })
    }
}

/// Credible interval for exposure-per-incident from a count and an
/// exposure quantity, under the Jeffreys prior.
///
/// `count` may be fractional (fault-weighted tallies accumulate
/// fractions); `credible_mass` is the total probability inside the
/// interval, strictly inside (0, 1). Pure function of its inputs.
pub fn estimate_rate(count: f64, exposure: f64, credible_mass: f64) -> Result<RateEstimate, MathError> {
    if !count.is_finite() || count < 0.0 {
        return Err(MathError::InvalidCount(count));
    }
    if !exposure.is_finite() || exposure <= 0.0 {
        return Err(MathError::InvalidExposure(exposure));
    }
    if !credible_mass.is_finite() || credible_mass <= 0.0 || credible_mass >= 1.0 {
        return Err(MathError::InvalidCredibleMass(credible_mass));
    }

    let shape = count + 0.5;
    let tail = (1.0 - credible_mass) / 2.0;

    let median = 1.0 / gamma_quantile(shape, exposure, 0.5)?;
    let lo = 1.0 / gamma_quantile(shape, exposure, 1.0 - tail)?;
    let hi = 1.0 / gamma_quantile(shape, exposure, tail)?;

    Ok(RateEstimate { median, lo, hi })
}
