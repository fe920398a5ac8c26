//! Credible-interval assembly from reconciled totals and what-if
//! exposure models.

use std::collections::BTreeMap;

use serde::Serialize;

use sr_common::{Error, Operator, Result};
use sr_config::{AnalysisConfig, ExposureModel};
use sr_math::{estimate_rate, RateEstimate};

use crate::reconcile::{ExposureTriple, Reconciliation};

/// One reconciled estimate: per-(operator, metric) totals plus the
/// interval in miles per incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEstimate {
    pub operator: Operator,
    pub metric: &'static str,
    pub count: f64,
    pub exposure: ExposureTriple,
    pub estimate: RateEstimate,
}

/// Estimates for every (operator, metric) total in the reconciliation,
/// at the configured credible mass, from the best-estimate exposure.
pub fn reconciled_estimates(
    recon: &Reconciliation,
    config: &AnalysisConfig,
) -> Result<Vec<MetricEstimate>> {
    config.validate()?;
    let mass = config.credible_mass();
    let mut out = Vec::with_capacity(recon.totals().count());
    for (operator, metric, count, exposure) in recon.totals() {
        let estimate = estimate_rate(count, exposure.best, mass)?;
        out.push(MetricEstimate {
            operator,
            metric,
            count,
            exposure,
            estimate,
        });
    }
    Ok(out)
}

/// One what-if series estimate from the slider-driven exposure models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesEstimate {
    pub series: String,
    pub count: f64,
    pub exposure_miles: f64,

    /// Model evaluated at the primary slider's declared min and max.
    pub feasible_miles: (f64, f64),

    pub estimate: RateEstimate,
}

/// Slider-driven estimates for every configured series.
///
/// `counts` carries the observed incident count per non-derived series;
/// derived series inherit the peer's count and exposure and scale the
/// peer's interval by 1/divisor instead of recomputing the posterior.
pub fn model_estimates(
    config: &AnalysisConfig,
    counts: &BTreeMap<String, f64>,
) -> Result<Vec<SeriesEstimate>> {
    config.validate()?;
    let mass = config.credible_mass();

    let mut base: BTreeMap<String, SeriesEstimate> = BTreeMap::new();
    for (name, model) in &config.exposure.series {
        if matches!(model, ExposureModel::Derived { .. }) {
            continue;
        }
        let count = *counts.get(name).ok_or_else(|| Error::UnknownSeries {
            name: name.clone(),
            referrer: "series counts".to_string(),
        })?;
        let exposure_miles = config.exposure.miles(name)?;
        let feasible_miles = config.exposure.feasible_range(name)?;
        let estimate = estimate_rate(count, exposure_miles, mass)?;
        base.insert(
            name.clone(),
            SeriesEstimate {
                series: name.clone(),
                count,
                exposure_miles,
                feasible_miles,
                estimate,
            },
        );
    }

    let mut derived = Vec::new();
    for (name, model) in &config.exposure.series {
        if let ExposureModel::Derived { peer, divisor } = model {
            let peer_est = base.get(peer.as_str()).ok_or_else(|| Error::UnknownSeries {
                name: peer.clone(),
                referrer: name.clone(),
            })?;
            derived.push(SeriesEstimate {
                series: name.clone(),
                count: peer_est.count,
                exposure_miles: peer_est.exposure_miles,
                feasible_miles: peer_est.feasible_miles,
                estimate: peer_est.estimate.scaled(1.0 / divisor.value)?,
            });
        }
    }

    let mut out: Vec<SeriesEstimate> = base.into_values().chain(derived).collect();
    out.sort_by(|a, b| a.series.cmp(&b.series));
    Ok(out)
}
