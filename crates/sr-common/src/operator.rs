//! The closed set of AV fleet operators covered by the datasets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One AV fleet operator being compared.
///
/// The set is closed on purpose: an exposure or incident row naming
/// anything else is a data-quality defect, not a new operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Waymo,
    Tesla,
    Zoox,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::Waymo, Operator::Tesla, Operator::Zoox];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Waymo => "Waymo",
            Operator::Tesla => "Tesla",
            Operator::Zoox => "Zoox",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownOperator {
                name: name.to_string(),
            })
    }
}
