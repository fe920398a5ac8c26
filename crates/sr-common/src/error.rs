//! Unified error type for saferate.
//!
//! Every failure is fail-fast: the operation that detects a violation
//! returns immediately with the offending values and performs no
//! partial work. There is no retry policy anywhere in the core; each
//! variant is a programming or data-quality defect to fix upstream.
//!
//! Errors expose a stable numeric `code()` grouped by `category()` and
//! serialize to a structured JSON form for machine consumers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::month::Month;
use crate::operator::Operator;

/// Result type alias for saferate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input: headers, field counts, unparseable values.
    Input,
    /// Domain invariant violations in otherwise well-formed data.
    Domain,
    /// Invalid numerical parameters reaching the estimation engine.
    Numeric,
    /// File I/O and serialization (CLI collaborator only).
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Domain => write!(f, "domain"),
            ErrorCategory::Numeric => write!(f, "numeric"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for saferate.
#[derive(Error, Debug)]
pub enum Error {
    // Malformed input (10-19)
    #[error("exposure header mismatch: expected {expected:?}, got {actual:?}")]
    HeaderMismatch { expected: String, actual: String },

    #[error("legacy exposure header without incident-coverage columns; re-export the dataset")]
    LegacyHeader,

    #[error("line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: {field} is not a non-negative decimal: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("unparseable month: {value:?}")]
    InvalidMonth { value: String },

    #[error("unknown operator: {name:?}")]
    UnknownOperator { name: String },

    #[error("unknown severity: {value:?}")]
    UnknownSeverity { value: String },

    #[error("exposure dataset has a header but no data rows")]
    EmptyLedger,

    #[error("incident {report_id}: {field} must be non-empty")]
    EmptyField {
        report_id: String,
        field: &'static str,
    },

    #[error("line {line}: unterminated quoted rationale")]
    UnterminatedQuote { line: usize },

    // Domain invariant violations (20-29)
    #[error("line {line}: {what} ordering violated: {lo} > {hi}")]
    OrderingViolation {
        line: usize,
        what: &'static str,
        lo: f64,
        hi: f64,
    },

    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: String,
        value: f64,
        expected: &'static str,
    },

    #[error("duplicate exposure row for {operator} {month}")]
    DuplicateRow { operator: Operator, month: Month },

    #[error("incident {report_id} ({operator}, {month}) falls outside the exposure ledger's covered months")]
    OutsideCoverage {
        report_id: String,
        operator: Operator,
        month: Month,
    },

    #[error("incident {report_id}: rater set {actual:?} does not match the dataset's {expected:?}")]
    RaterSetMismatch {
        report_id: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("no fault weight configured for rater {rater:?}")]
    UnknownRater { rater: String },

    #[error("duplicate report {report_id} with conflicting content")]
    ConflictingDuplicate { report_id: String },

    #[error("unknown series {name:?} referenced by {referrer:?}")]
    UnknownSeries { name: String, referrer: String },

    // Invalid numerical parameters (30-39)
    #[error(transparent)]
    Math(#[from] sr_math::MathError),

    // I/O and serialization (40-49)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code, grouped by category:
    /// 10-19 input, 20-29 domain, 30-39 numeric, 40-49 I/O.
    pub fn code(&self) -> u32 {
        match self {
            Error::HeaderMismatch { .. } => 10,
            Error::LegacyHeader => 11,
            Error::FieldCount { .. } => 12,
            Error::InvalidNumber { .. } => 13,
            Error::InvalidMonth { .. } => 14,
            Error::UnknownOperator { .. } => 15,
            Error::UnknownSeverity { .. } => 16,
            Error::EmptyLedger => 17,
            Error::EmptyField { .. } => 18,
            Error::UnterminatedQuote { .. } => 19,
            Error::OrderingViolation { .. } => 20,
            Error::OutOfRange { .. } => 21,
            Error::DuplicateRow { .. } => 22,
            Error::OutsideCoverage { .. } => 23,
            Error::RaterSetMismatch { .. } => 24,
            Error::UnknownRater { .. } => 25,
            Error::ConflictingDuplicate { .. } => 26,
            Error::UnknownSeries { .. } => 27,
            Error::Math(_) => 30,
            Error::Io(_) => 40,
            Error::Json(_) => 41,
        }
    }

    /// The error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::HeaderMismatch { .. }
            | Error::LegacyHeader
            | Error::FieldCount { .. }
            | Error::InvalidNumber { .. }
            | Error::InvalidMonth { .. }
            | Error::UnknownOperator { .. }
            | Error::UnknownSeverity { .. }
            | Error::EmptyLedger
            | Error::EmptyField { .. }
            | Error::UnterminatedQuote { .. } => ErrorCategory::Input,

            Error::OrderingViolation { .. }
            | Error::OutOfRange { .. }
            | Error::DuplicateRow { .. }
            | Error::OutsideCoverage { .. }
            | Error::RaterSetMismatch { .. }
            | Error::UnknownRater { .. }
            | Error::ConflictingDuplicate { .. }
            | Error::UnknownSeries { .. } => ErrorCategory::Domain,

            Error::Math(_) => ErrorCategory::Numeric,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }
}

/// Machine-parseable error form, used by the CLI for robot output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category.
    pub category: ErrorCategory,

    /// Human-readable message.
    pub message: String,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
        }
    }
}

impl StructuredError {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_by_category() {
        let cases: Vec<Error> = vec![
            Error::LegacyHeader,
            Error::EmptyLedger,
            Error::UnknownOperator {
                name: "Cruise".into(),
            },
            Error::OutOfRange {
                field: "coverage".into(),
                value: 1.5,
                expected: "(0, 1]",
            },
            Error::Math(sr_math::MathError::InvalidProbability(1.0)),
        ];
        for err in &cases {
            let range = match err.category() {
                ErrorCategory::Input => 10..20,
                ErrorCategory::Domain => 20..30,
                ErrorCategory::Numeric => 30..40,
                ErrorCategory::Io => 40..50,
            };
            assert!(range.contains(&err.code()), "{err} code {}", err.code());
        }
    }

    #[test]
    fn structured_form_serializes() {
        let err = Error::InvalidNumber {
            line: 3,
            field: "vmt",
            value: "-12".into(),
        };
        let json = StructuredError::from(&err).to_json();
        assert!(json.contains(r#""code":13"#));
        assert!(json.contains(r#""category":"input""#));
        assert!(json.contains("vmt"));
    }

    #[test]
    fn math_errors_convert() {
        let err: Error = sr_math::MathError::InvalidShape(-1.0).into();
        assert_eq!(err.category(), ErrorCategory::Numeric);
        assert_eq!(err.code(), 30);
    }
}
