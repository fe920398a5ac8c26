//! Calendar months, the join key between exposure and incident data.
//!
//! The exposure dataset writes months as `YYYY-MM`; the incident feed
//! labels them `MMM-YYYY` (e.g. `JUN-2025`). Both parse into the same
//! ordered value.

use std::fmt;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// One calendar month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Smallest representable month; useful as a range endpoint.
    pub const MIN: Month = Month {
        year: i32::MIN,
        month: 1,
    };

    /// Largest representable month.
    pub const MAX: Month = Month {
        year: i32::MAX,
        month: 12,
    };

    pub fn new(year: i32, month: u32) -> Result<Month, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth {
                value: format!("{year}-{month:02}"),
            });
        }
        Ok(Month { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        self.month
    }

    /// Parse the exposure dataset form, `YYYY-MM`.
    pub fn parse_iso(s: &str) -> Result<Month, Error> {
        let bad = || Error::InvalidMonth {
            value: s.to_string(),
        };
        let (year, month) = s.split_once('-').ok_or_else(bad)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(bad());
        }
        let year: i32 = year.parse().map_err(|_| bad())?;
        let month: u32 = month.parse().map_err(|_| bad())?;
        Month::new(year, month)
    }

    /// Parse the incident feed form, `MMM-YYYY` (month name abbreviated
    /// to three letters, any case).
    pub fn parse_label(s: &str) -> Result<Month, Error> {
        let bad = || Error::InvalidMonth {
            value: s.to_string(),
        };
        let (name, year) = s.split_once('-').ok_or_else(bad)?;
        if name.len() != 3 || year.len() != 4 {
            return Err(bad());
        }
        let month = (1..=12u8)
            .filter_map(|n| chrono::Month::try_from(n).ok())
            .find(|m| m.name()[..3].eq_ignore_ascii_case(name))
            .ok_or_else(bad)?;
        let year: i32 = year.parse().map_err(|_| bad())?;
        Month::new(year, month.number_from_month())
    }

    /// The incident feed label, `MMM-YYYY`.
    pub fn label(&self) -> String {
        let name = chrono::Month::try_from(self.month as u8)
            .map(|m| m.name()[..3].to_ascii_uppercase())
            .unwrap_or_else(|_| "???".to_string());
        format!("{name}-{}", self.year)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Month::parse_iso(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_round_trip() {
        let m = Month::parse_iso("2025-06").unwrap();
        assert_eq!(m.year(), 2025);
        assert_eq!(m.number(), 6);
        assert_eq!(m.to_string(), "2025-06");
    }

    #[test]
    fn label_round_trip() {
        let m = Month::parse_label("JUN-2025").unwrap();
        assert_eq!(m, Month::parse_iso("2025-06").unwrap());
        assert_eq!(m.label(), "JUN-2025");

        // Any case is accepted on input.
        assert_eq!(Month::parse_label("jan-2026").unwrap().label(), "JAN-2026");
    }

    #[test]
    fn ordering_is_chronological() {
        let jun = Month::parse_iso("2025-06").unwrap();
        let dec = Month::parse_iso("2025-12").unwrap();
        let jan = Month::parse_iso("2026-01").unwrap();
        assert!(jun < dec && dec < jan);
    }

    #[test]
    fn rejects_malformed() {
        for s in ["2025-13", "2025-00", "2025-6", "202506", "2025-JU", "junk"] {
            assert!(Month::parse_iso(s).is_err(), "accepted {s:?}");
        }
        for s in ["JUNE-2025", "XX-2025", "JUN-25", "JUN2025"] {
            assert!(Month::parse_label(s).is_err(), "accepted {s:?}");
        }
    }

    #[test]
    fn serde_uses_iso_form() {
        let m = Month::parse_iso("2025-09").unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "\"2025-09\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
