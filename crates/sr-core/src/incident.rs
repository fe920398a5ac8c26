//! Incident records and their JSON ingestion.
//!
//! Records arrive as one JSON array per snapshot, already filtered to
//! fully-unsupervised operation. The loader enforces the snapshot
//! contract: version-based deduplication, conflicting duplicates
//! rejected, a consistent rater set across the whole feed, and fault
//! fractions validated before anything downstream sees them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use sr_common::{Error, Month, Operator, Result, Severity};

/// One rater's fault judgment for one incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultJudgment {
    /// Fraction of fault attributed to the AV, in [0, 1].
    pub fraction: f64,

    /// Free-text justification.
    #[serde(default)]
    pub rationale: String,
}

/// One deduplicated, operator-attributed safety event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRecord {
    pub report_id: String,
    pub version: u32,
    pub operator: Operator,
    pub month: Month,

    /// Pre-crash speed in mph; None when the report omits it.
    pub speed_mph: Option<f64>,

    pub road_type: String,
    pub severity: Severity,
    pub vehicles_involved: u32,
    pub airbag_deployed: bool,

    /// Rater name -> judgment.
    pub fault: BTreeMap<String, FaultJudgment>,
}

// Wire form of one incident, field names as the snapshot writes them.
// Presentation-only fields (narrative, city, weather flags) are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIncident {
    report_id: String,

    #[serde(default = "default_version")]
    version: u32,

    /// Groups re-filings of the same event; defaults to the report id.
    #[serde(default)]
    incident_id: Option<String>,

    company: String,

    /// MMM-YYYY month label.
    date: String,

    #[serde(default)]
    speed: Option<f64>,

    road: String,
    severity: String,

    #[serde(default = "default_vehicles")]
    vehicles_involved: u32,

    #[serde(default)]
    airbag_deployed: bool,

    fault: BTreeMap<String, FaultJudgment>,
}

fn default_version() -> u32 {
    1
}

fn default_vehicles() -> u32 {
    1
}

/// Load and validate the incident feed from its JSON text.
///
/// Returns records sorted by (operator, month, report id).
pub fn load_incidents(text: &str) -> Result<Vec<IncidentRecord>> {
    let raw: Vec<RawIncident> = serde_json::from_str(text)?;

    // Dedup by incident id, keeping the highest report version; equal
    // versions must agree exactly.
    let mut by_incident: BTreeMap<String, IncidentRecord> = BTreeMap::new();
    for entry in raw {
        let incident_id = entry
            .incident_id
            .clone()
            .unwrap_or_else(|| entry.report_id.clone());
        let record = convert(entry)?;
        match by_incident.get(&incident_id) {
            Some(existing) if existing.version > record.version => {}
            Some(existing) if existing.version == record.version => {
                if *existing != record {
                    return Err(Error::ConflictingDuplicate {
                        report_id: record.report_id,
                    });
                }
            }
            _ => {
                by_incident.insert(incident_id, record);
            }
        }
    }

    let mut records: Vec<IncidentRecord> = by_incident.into_values().collect();

    // The fault models were produced over the same report set; a rater
    // missing from one incident means the feeds diverged.
    if let Some(first) = records.first() {
        let expected: Vec<String> = first.fault.keys().cloned().collect();
        for record in &records {
            let actual: Vec<String> = record.fault.keys().cloned().collect();
            if actual != expected {
                return Err(Error::RaterSetMismatch {
                    report_id: record.report_id.clone(),
                    expected,
                    actual,
                });
            }
        }
    }

    records.sort_by(|a, b| {
        (a.operator, a.month, &a.report_id).cmp(&(b.operator, b.month, &b.report_id))
    });
    debug!(incidents = records.len(), "loaded incident feed");
    Ok(records)
}

fn convert(raw: RawIncident) -> Result<IncidentRecord> {
    let operator: Operator = raw.company.parse()?;
    let month = Month::parse_label(raw.date.trim())?;
    if raw.road.trim().is_empty() {
        return Err(Error::EmptyField {
            report_id: raw.report_id,
            field: "road",
        });
    }
    let severity = Severity::parse(&raw.severity)?;
    if raw.vehicles_involved < 1 {
        return Err(Error::OutOfRange {
            field: format!("{}: vehiclesInvolved", raw.report_id),
            value: raw.vehicles_involved as f64,
            expected: ">= 1",
        });
    }
    if let Some(speed) = raw.speed {
        if !speed.is_finite() || speed < 0.0 {
            return Err(Error::OutOfRange {
                field: format!("{}: speed", raw.report_id),
                value: speed,
                expected: "a finite speed >= 0",
            });
        }
    }
    for (rater, judgment) in &raw.fault {
        if !judgment.fraction.is_finite() || !(0.0..=1.0).contains(&judgment.fraction) {
            return Err(Error::OutOfRange {
                field: format!("{}: fault.{rater}", raw.report_id),
                value: judgment.fraction,
                expected: "within [0, 1]",
            });
        }
    }

    Ok(IncidentRecord {
        report_id: raw.report_id,
        version: raw.version,
        operator,
        month,
        speed_mph: raw.speed,
        road_type: raw.road.trim().to_string(),
        severity,
        vehicles_involved: raw.vehicles_involved,
        airbag_deployed: raw.airbag_deployed,
        fault: raw.fault,
    })
}
