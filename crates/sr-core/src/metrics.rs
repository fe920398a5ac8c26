//! The metric catalog.
//!
//! Metric definitions are data, not code: each entry names a predicate
//! over classifier facts, a weighting mode, whether the metric is shown
//! by default, and an approximate human-driver benchmark in miles per
//! incident. Adding a metric means adding one entry here (plus, if
//! genuinely new, a classifier fact).

use serde::Serialize;

use crate::classify::IncidentFacts;

/// How a matching incident contributes to a metric's count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// One per matching incident.
    Unit,

    /// 1 / vehicles_involved per matching incident.
    PerVehicle,

    /// The incident's weighted mean fault fraction.
    FaultMean,
}

/// One declarative metric definition.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub key: &'static str,
    pub label: &'static str,
    pub predicate: fn(&IncidentFacts) -> bool,
    pub weighting: Weighting,
    pub default_enabled: bool,

    /// Approximate human-driver range, miles per incident (lo, hi).
    pub human_benchmark_mpi: Option<(f64, f64)>,
}

/// Every metric the reconciler produces cells for.
pub const METRICS: &[MetricDef] = &[
    MetricDef {
        key: "any-incident",
        label: "Any reported incident",
        predicate: |_| true,
        weighting: Weighting::Unit,
        default_enabled: true,
        human_benchmark_mpi: Some((4.0e5, 6.0e5)),
    },
    MetricDef {
        key: "nonstationary",
        label: "AV moving at impact",
        predicate: |f| f.nonstationary,
        weighting: Weighting::Unit,
        default_enabled: true,
        human_benchmark_mpi: None,
    },
    MetricDef {
        key: "roadway-nonstationary",
        label: "AV moving, on roadway",
        predicate: |f| f.roadway_nonstationary,
        weighting: Weighting::Unit,
        default_enabled: true,
        human_benchmark_mpi: Some((5.0e5, 7.5e5)),
    },
    MetricDef {
        key: "injury",
        label: "Any injury",
        predicate: |f| f.injury,
        weighting: Weighting::Unit,
        default_enabled: true,
        human_benchmark_mpi: Some((1.2e6, 2.0e6)),
    },
    MetricDef {
        key: "hospitalization",
        label: "Injury with hospitalization",
        predicate: |f| f.hospitalization,
        weighting: Weighting::Unit,
        default_enabled: false,
        human_benchmark_mpi: None,
    },
    MetricDef {
        key: "serious-injury",
        label: "Serious injury (KABCO A+K)",
        predicate: |f| f.serious_injury,
        weighting: Weighting::Unit,
        default_enabled: true,
        human_benchmark_mpi: Some((2.0e7, 4.0e7)),
    },
    MetricDef {
        key: "fatality",
        label: "Fatality (per vehicle involved)",
        predicate: |f| f.fatality,
        weighting: Weighting::PerVehicle,
        default_enabled: true,
        human_benchmark_mpi: Some((7.0e7, 1.0e8)),
    },
    MetricDef {
        key: "at-fault",
        label: "At fault (rater weighted)",
        predicate: |_| true,
        weighting: Weighting::FaultMean,
        default_enabled: true,
        human_benchmark_mpi: None,
    },
    MetricDef {
        key: "airbag",
        label: "Airbag deployment",
        predicate: |f| f.airbag,
        weighting: Weighting::Unit,
        default_enabled: false,
        human_benchmark_mpi: None,
    },
];

/// Look up one metric by key.
pub fn metric(key: &str) -> Option<&'static MetricDef> {
    METRICS.iter().find(|m| m.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SpeedBin;

    fn facts() -> IncidentFacts {
        IncidentFacts {
            speed_bin: SpeedBin::Low,
            nonstationary: true,
            roadway_nonstationary: false,
            injury: true,
            hospitalization: false,
            serious_injury: false,
            fatality: false,
            airbag: true,
            fatality_weight: 0.0,
            vehicle_share: 1.0,
        }
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in METRICS.iter().enumerate() {
            for b in &METRICS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn benchmarks_are_ordered_ranges() {
        for m in METRICS {
            if let Some((lo, hi)) = m.human_benchmark_mpi {
                assert!(lo > 0.0 && lo <= hi, "{} benchmark {lo}..{hi}", m.key);
            }
        }
    }

    #[test]
    fn predicates_read_the_expected_facts() {
        let f = facts();
        assert!((metric("any-incident").unwrap().predicate)(&f));
        assert!((metric("nonstationary").unwrap().predicate)(&f));
        assert!(!(metric("roadway-nonstationary").unwrap().predicate)(&f));
        assert!((metric("injury").unwrap().predicate)(&f));
        assert!(!(metric("fatality").unwrap().predicate)(&f));
        assert!((metric("airbag").unwrap().predicate)(&f));
    }

    #[test]
    fn lookup_misses_cleanly() {
        assert!(metric("nope").is_none());
    }
}
