//! Ordered injury-severity taxonomy for incident records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Highest injury severity alleged for one incident.
///
/// The taxonomy is closed and ordered; the derive order gives the
/// domain ordering (no injury lowest, fatal highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    NoInjury,
    Minor,
    MinorHospitalized,
    Moderate,
    ModerateHospitalized,
    Fatal,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::NoInjury,
        Severity::Minor,
        Severity::MinorHospitalized,
        Severity::Moderate,
        Severity::ModerateHospitalized,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::NoInjury => "no-injury",
            Severity::Minor => "minor",
            Severity::MinorHospitalized => "minor-hospitalized",
            Severity::Moderate => "moderate",
            Severity::ModerateHospitalized => "moderate-hospitalized",
            Severity::Fatal => "fatal",
        }
    }

    /// Parse a severity label; anything outside the closed taxonomy is
    /// rejected.
    pub fn parse(label: &str) -> Result<Severity, Error> {
        let value = label.trim();
        Severity::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::UnknownSeverity {
                value: value.to_string(),
            })
    }

    /// Any injury at all.
    pub fn is_injury(&self) -> bool {
        *self > Severity::NoInjury
    }

    /// Injury that led to hospitalization (or worse).
    pub fn is_hospitalized(&self) -> bool {
        matches!(
            self,
            Severity::MinorHospitalized | Severity::ModerateHospitalized | Severity::Fatal
        )
    }

    /// Serious injury in the KABCO A+K sense.
    pub fn is_serious(&self) -> bool {
        matches!(self, Severity::ModerateHospitalized | Severity::Fatal)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
