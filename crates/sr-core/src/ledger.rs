//! Exposure ledger: strict parser and validator for the monthly
//! vehicle-miles-traveled dataset.
//!
//! One row per (operator, month). Validation is deliberately
//! anti-Postel: a single malformed or invariant-violating row rejects
//! the whole parse. No coercion, no defaults, no partial acceptance.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sr_common::{Error, Month, Operator, Result};

/// Expected header columns, in order.
pub const EXPECTED_COLUMNS: [&str; 11] = [
    "company",
    "month",
    "vmt",
    "company_cumulative_vmt",
    "vmt_min",
    "vmt_max",
    "coverage",
    "incident_coverage",
    "incident_coverage_min",
    "incident_coverage_max",
    "rationale",
];

// The pre-incident-coverage export; recognized only to reject it with a
// pointed message instead of a generic mismatch.
const LEGACY_COLUMNS: [&str; 7] = [
    "company",
    "month",
    "vmt",
    "company_cumulative_vmt",
    "vmt_min",
    "vmt_max",
    "rationale",
];

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("static pattern"))
}

/// One validated exposure row: one operator, one calendar month.
///
/// Immutable once parsed; `vmt_min <= vmt <= vmt_max`, coverage fields
/// inside (0, 1] with `incident_coverage_min <= incident_coverage <=
/// incident_coverage_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    pub operator: Operator,
    pub month: Month,

    /// Best-estimate vehicle miles traveled in the month.
    pub vmt: f64,

    /// Running total across months; informational only, not validated
    /// against neighboring rows.
    pub cumulative_vmt: f64,

    pub vmt_min: f64,
    pub vmt_max: f64,

    /// Fraction of the calendar month inside the observation window.
    pub coverage: f64,

    /// Estimated probability an incident in this month made it into the
    /// dataset by snapshot time (the Poisson thinning factor).
    pub incident_coverage: f64,
    pub incident_coverage_min: f64,
    pub incident_coverage_max: f64,

    /// Free-text justification for the estimates.
    pub rationale: String,
}

/// The parsed, validated exposure dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureLedger {
    rows: BTreeMap<(Operator, Month), ExposureRow>,
}

impl ExposureLedger {
    /// Parse the tabular text format. Any defect anywhere fails the
    /// whole parse.
    pub fn parse(text: &str) -> Result<ExposureLedger> {
        let mut lines = text.lines().enumerate();
        let (_, header) = lines.next().ok_or(Error::EmptyLedger)?;
        check_header(header)?;

        let mut rows = BTreeMap::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let row = parse_row(idx + 1, line)?;
            let key = (row.operator, row.month);
            if rows.contains_key(&key) {
                return Err(Error::DuplicateRow {
                    operator: row.operator,
                    month: row.month,
                });
            }
            rows.insert(key, row);
        }

        if rows.is_empty() {
            return Err(Error::EmptyLedger);
        }
        debug!(rows = rows.len(), "parsed exposure ledger");
        Ok(ExposureLedger { rows })
    }

    pub fn get(&self, operator: Operator, month: Month) -> Option<&ExposureRow> {
        self.rows.get(&(operator, month))
    }

    /// Whether (operator, month) is inside the ledger's covered window.
    pub fn covers(&self, operator: Operator, month: Month) -> bool {
        self.rows.contains_key(&(operator, month))
    }

    /// Rows in (operator, month) order.
    pub fn rows(&self) -> impl Iterator<Item = &ExposureRow> {
        self.rows.values()
    }

    /// Covered months for one operator, ascending.
    pub fn months_for(&self, operator: Operator) -> impl Iterator<Item = Month> + '_ {
        self.rows
            .range((operator, Month::MIN)..=(operator, Month::MAX))
            .map(|((_, month), _)| *month)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn check_header(header: &str) -> Result<()> {
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns == EXPECTED_COLUMNS {
        return Ok(());
    }
    if columns == LEGACY_COLUMNS {
        return Err(Error::LegacyHeader);
    }
    Err(Error::HeaderMismatch {
        expected: EXPECTED_COLUMNS.join(","),
        actual: header.to_string(),
    })
}

fn parse_row(line_no: usize, line: &str) -> Result<ExposureRow> {
    let fields: Vec<&str> = line.splitn(EXPECTED_COLUMNS.len(), ',').collect();
    if fields.len() != EXPECTED_COLUMNS.len() {
        return Err(Error::FieldCount {
            line: line_no,
            expected: EXPECTED_COLUMNS.len(),
            actual: fields.len(),
        });
    }

    let operator = Operator::from_str(fields[0])?;
    let month = Month::parse_iso(fields[1].trim())?;
    let vmt = parse_decimal(line_no, "vmt", fields[2])?;
    let cumulative_vmt = parse_decimal(line_no, "company_cumulative_vmt", fields[3])?;
    let vmt_min = parse_decimal(line_no, "vmt_min", fields[4])?;
    let vmt_max = parse_decimal(line_no, "vmt_max", fields[5])?;
    let coverage = parse_decimal(line_no, "coverage", fields[6])?;
    let incident_coverage = parse_decimal(line_no, "incident_coverage", fields[7])?;
    let incident_coverage_min = parse_decimal(line_no, "incident_coverage_min", fields[8])?;
    let incident_coverage_max = parse_decimal(line_no, "incident_coverage_max", fields[9])?;
    let rationale = parse_rationale(line_no, fields[10])?;

    check_ordering(line_no, "vmt_min/vmt", vmt_min, vmt)?;
    check_ordering(line_no, "vmt/vmt_max", vmt, vmt_max)?;
    check_unit_interval(line_no, "coverage", coverage)?;
    check_unit_interval(line_no, "incident_coverage", incident_coverage)?;
    check_unit_interval(line_no, "incident_coverage_min", incident_coverage_min)?;
    check_ordering(
        line_no,
        "incident_coverage_min/incident_coverage",
        incident_coverage_min,
        incident_coverage,
    )?;
    check_ordering(
        line_no,
        "incident_coverage/incident_coverage_max",
        incident_coverage,
        incident_coverage_max,
    )?;
    if incident_coverage_max > 1.0 {
        return Err(Error::OutOfRange {
            field: format!("line {line_no}: incident_coverage_max"),
            value: incident_coverage_max,
            expected: "within (0, 1]",
        });
    }

    Ok(ExposureRow {
        operator,
        month,
        vmt,
        cumulative_vmt,
        vmt_min,
        vmt_max,
        coverage,
        incident_coverage,
        incident_coverage_min,
        incident_coverage_max,
        rationale,
    })
}

fn parse_decimal(line: usize, field: &'static str, raw: &str) -> Result<f64> {
    let value = raw.trim();
    if !decimal_re().is_match(value) {
        return Err(Error::InvalidNumber {
            line,
            field,
            value: value.to_string(),
        });
    }
    value.parse::<f64>().map_err(|_| Error::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}

/// The trailing rationale field: free text, optionally double-quote
/// wrapped with doubled-quote escaping.
fn parse_rationale(line: usize, raw: &str) -> Result<String> {
    let value = raw.trim();
    if let Some(stripped) = value.strip_prefix('"') {
        let inner = stripped
            .strip_suffix('"')
            .ok_or(Error::UnterminatedQuote { line })?;
        // A lone interior quote means the writer did not escape; the
        // doubled form is the only one accepted.
        let unescaped = inner.replace("\"\"", "\u{0}");
        if unescaped.contains('"') {
            return Err(Error::UnterminatedQuote { line });
        }
        return Ok(unescaped.replace('\u{0}', "\""));
    }
    Ok(value.to_string())
}

fn check_ordering(line: usize, what: &'static str, lo: f64, hi: f64) -> Result<()> {
    if lo > hi {
        return Err(Error::OrderingViolation { line, what, lo, hi });
    }
    Ok(())
}

fn check_unit_interval(line: usize, field: &'static str, value: f64) -> Result<()> {
    if value <= 0.0 || value > 1.0 {
        return Err(Error::OutOfRange {
            field: format!("line {line}: {field}"),
            value,
            expected: "within (0, 1]",
        });
    }
    Ok(())
}
