//! Pure classification of one incident record into named facts.
//!
//! The facts are the vocabulary the metric catalog's predicates speak;
//! classification itself has no notion of metrics, weights, or months.

use serde::{Deserialize, Serialize};

use crate::incident::IncidentRecord;

/// Pre-crash speed bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBin {
    /// Report omits the speed. Treated as moving for the nonstationary
    /// facts: an unreported speed is evidence of motion, not of parking.
    Unknown,
    Stationary,
    /// (0, 10] mph.
    Low,
    /// (10, 30] mph.
    Medium,
    /// Above 30 mph.
    High,
}

impl SpeedBin {
    pub fn from_speed(speed_mph: Option<f64>) -> SpeedBin {
        match speed_mph {
            None => SpeedBin::Unknown,
            Some(s) if s == 0.0 => SpeedBin::Stationary,
            Some(s) if s <= 10.0 => SpeedBin::Low,
            Some(s) if s <= 30.0 => SpeedBin::Medium,
            Some(_) => SpeedBin::High,
        }
    }
}

/// Classifier output for one incident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncidentFacts {
    pub speed_bin: SpeedBin,

    /// Anything but a confirmed stationary vehicle.
    pub nonstationary: bool,

    /// Nonstationary and not in a parking lot.
    pub roadway_nonstationary: bool,

    pub injury: bool,
    pub hospitalization: bool,
    pub serious_injury: bool,
    pub fatality: bool,

    pub airbag: bool,

    /// Fatal incidents are split across the vehicles involved so a
    /// multi-vehicle fatal crash is not double-counted across tallies.
    pub fatality_weight: f64,

    /// 1 / vehicles_involved, the per-vehicle share for weighted tallies.
    pub vehicle_share: f64,
}

fn is_parking_lot(road_type: &str) -> bool {
    let road = road_type.trim();
    road.eq_ignore_ascii_case("parking lot") || road.eq_ignore_ascii_case("parking-lot")
}

/// Deterministic, pure mapping from a record to its facts.
pub fn classify(record: &IncidentRecord) -> IncidentFacts {
    let speed_bin = SpeedBin::from_speed(record.speed_mph);
    let nonstationary = speed_bin != SpeedBin::Stationary;
    let vehicle_share = 1.0 / record.vehicles_involved as f64;
    let fatality = record.severity.is_fatal();

    IncidentFacts {
        speed_bin,
        nonstationary,
        roadway_nonstationary: nonstationary && !is_parking_lot(&record.road_type),
        injury: record.severity.is_injury(),
        hospitalization: record.severity.is_hospitalized(),
        serious_injury: record.severity.is_serious(),
        fatality,
        airbag: record.airbag_deployed,
        fatality_weight: if fatality { vehicle_share } else { 0.0 },
        vehicle_share,
    }
}
