//! Monthly reconciliation: join exposure rows with classified
//! incidents, pro-rate partial months, thin for incomplete reporting,
//! and count per metric.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use sr_common::{Month, Operator, Result};
use sr_config::AnalysisConfig;

use crate::classify::{classify, IncidentFacts};
use crate::fault::weighted_mean;
use crate::incident::IncidentRecord;
use crate::ledger::{ExposureLedger, ExposureRow};
use crate::metrics::{Weighting, METRICS};

/// Exposure miles as a min/best/max triple.
///
/// Every transformation scales the three fields pairwise with ordered
/// factors, so `min <= best <= max` survives pro-rating and thinning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposureTriple {
    pub min: f64,
    pub best: f64,
    pub max: f64,
}

impl ExposureTriple {
    pub const ZERO: ExposureTriple = ExposureTriple {
        min: 0.0,
        best: 0.0,
        max: 0.0,
    };

    pub fn add(self, other: ExposureTriple) -> ExposureTriple {
        ExposureTriple {
            min: self.min + other.min,
            best: self.best + other.best,
            max: self.max + other.max,
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.best && self.best <= self.max
    }
}

/// Effective exposure for one ledger row: the raw triple pro-rated by
/// `coverage`, then thinned by the incident-coverage factor.
///
/// Under-reporting of a Poisson count is equivalent to shrinking the
/// exposure denominator by the reporting probability, so thinning
/// multiplies exposure rather than inflating counts. `vmt_min` pairs
/// with `incident_coverage_min` and `vmt_max` with
/// `incident_coverage_max`: the triple stays the most
/// pessimistic/optimistic combination.
pub fn effective_exposure(row: &ExposureRow) -> ExposureTriple {
    ExposureTriple {
        min: row.vmt_min * row.coverage * row.incident_coverage_min,
        best: row.vmt * row.coverage * row.incident_coverage,
        max: row.vmt_max * row.coverage * row.incident_coverage_max,
    }
}

/// One derived count/exposure pair, per (operator, month, metric).
///
/// Always rebuilt by [`reconcile`], never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMetricCell {
    pub operator: Operator,
    pub month: Month,
    pub metric: &'static str,
    pub count: f64,
    pub exposure: ExposureTriple,
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    cells: Vec<MonthlyMetricCell>,
    totals: BTreeMap<(Operator, &'static str), (f64, ExposureTriple)>,

    /// False when the weighted fault fraction was undefined (zero total
    /// weight); fault-weighted metrics are then absent from the output.
    fault_defined: bool,
}

impl Reconciliation {
    /// Per-(operator, month, metric) cells in deterministic order.
    pub fn cells(&self) -> &[MonthlyMetricCell] {
        &self.cells
    }

    /// Summed count and exposure for one (operator, metric) across all
    /// covered months.
    pub fn total(&self, operator: Operator, metric: &str) -> Option<(f64, ExposureTriple)> {
        self.totals
            .iter()
            .find(|((op, key), _)| *op == operator && *key == metric)
            .map(|(_, v)| *v)
    }

    /// All (operator, metric) totals in deterministic order.
    pub fn totals(&self) -> impl Iterator<Item = (Operator, &'static str, f64, ExposureTriple)> + '_ {
        self.totals
            .iter()
            .map(|((op, key), (count, exp))| (*op, *key, *count, *exp))
    }

    pub fn fault_defined(&self) -> bool {
        self.fault_defined
    }
}

/// Join the ledger with the incident feed under one configuration.
///
/// Every (operator, month) in the ledger produces a cell for every
/// metric, including zero-incident months (the Jeffreys posterior is
/// well-defined at count zero). An incident whose (operator, month) the
/// ledger does not cover is a validation error, never a silent drop.
pub fn reconcile(
    ledger: &ExposureLedger,
    incidents: &[IncidentRecord],
    config: &AnalysisConfig,
) -> Result<Reconciliation> {
    config.validate()?;

    // Classify and bucket incidents; fail on anything outside the
    // ledger's covered window.
    let mut by_cell: BTreeMap<(Operator, Month), Vec<(&IncidentRecord, IncidentFacts)>> =
        BTreeMap::new();
    for record in incidents {
        if !ledger.covers(record.operator, record.month) {
            return Err(sr_common::Error::OutsideCoverage {
                report_id: record.report_id.clone(),
                operator: record.operator,
                month: record.month,
            });
        }
        by_cell
            .entry((record.operator, record.month))
            .or_default()
            .push((record, classify(record)));
    }

    // Weighted fault means, computed once per incident. Any undefined
    // mean (zero total weight) makes the fault-weighted metrics
    // undefined for the whole pass.
    let mut fault_means: BTreeMap<&str, f64> = BTreeMap::new();
    let mut fault_defined = true;
    for record in incidents {
        match weighted_mean(&record.fault, &config.fault_weights)? {
            Some(mean) => {
                fault_means.insert(record.report_id.as_str(), mean);
            }
            None => fault_defined = false,
        }
    }
    if !fault_defined {
        debug!("weighted fault undefined; skipping fault-weighted metrics");
    }

    let mut cells = Vec::new();
    let mut totals: BTreeMap<(Operator, &'static str), (f64, ExposureTriple)> = BTreeMap::new();

    for row in ledger.rows() {
        let exposure = effective_exposure(row);
        debug_assert!(exposure.is_ordered());
        let month_incidents = by_cell
            .get(&(row.operator, row.month))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        for metric in METRICS {
            if metric.weighting == Weighting::FaultMean && !fault_defined {
                continue;
            }
            let mut count = 0.0;
            for (record, facts) in month_incidents {
                if !(metric.predicate)(facts) {
                    continue;
                }
                count += match metric.weighting {
                    Weighting::Unit => 1.0,
                    Weighting::PerVehicle => facts.vehicle_share,
                    Weighting::FaultMean => fault_means[record.report_id.as_str()],
                };
            }

            let entry = totals
                .entry((row.operator, metric.key))
                .or_insert((0.0, ExposureTriple::ZERO));
            entry.0 += count;
            entry.1 = entry.1.add(exposure);

            cells.push(MonthlyMetricCell {
                operator: row.operator,
                month: row.month,
                metric: metric.key,
                count,
                exposure,
            });
        }
    }

    info!(
        cells = cells.len(),
        incidents = incidents.len(),
        rows = ledger.len(),
        "reconciled exposure and incidents"
    );
    Ok(Reconciliation {
        cells,
        totals,
        fault_defined,
    })
}
