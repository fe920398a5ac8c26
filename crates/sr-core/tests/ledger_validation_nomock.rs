//! Exposure ledger validation against real (non-mocked) text inputs.
//!
//! The parser is anti-Postel: every case here must reject the whole
//! parse, with the matching structured error.

use sr_common::Error;
use sr_core::ledger::ExposureLedger;

const HEADER: &str = "company,month,vmt,company_cumulative_vmt,vmt_min,vmt_max,coverage,incident_coverage,incident_coverage_min,incident_coverage_max,rationale";

const LEGACY_HEADER: &str = "company,month,vmt,company_cumulative_vmt,vmt_min,vmt_max,rationale";

/// A fully valid data row; individual tests patch single fields.
fn row(patch: &[(usize, &str)]) -> String {
    let mut fields = vec![
        "Waymo", "2025-06", "1000000", "5000000", "900000", "1100000", "1.0", "0.95", "0.9",
        "1.0", "estimate from fleet telemetry",
    ];
    for (idx, value) in patch {
        fields[*idx] = value;
    }
    fields.join(",")
}

fn parse_with(patch: &[(usize, &str)]) -> Result<ExposureLedger, Error> {
    ExposureLedger::parse(&format!("{HEADER}\n{}\n", row(patch)))
}

#[test]
fn valid_row_parses() {
    let ledger = parse_with(&[]).unwrap();
    assert_eq!(ledger.len(), 1);
}

#[test]
fn wrong_header_rejected() {
    let text = format!("company,month,vmt\n{}\n", row(&[]));
    assert!(matches!(
        ExposureLedger::parse(&text).unwrap_err(),
        Error::HeaderMismatch { .. }
    ));

    // Reordered columns are a mismatch too.
    let reordered = HEADER.replace("vmt_min,vmt_max", "vmt_max,vmt_min");
    let text = format!("{reordered}\n{}\n", row(&[]));
    assert!(matches!(
        ExposureLedger::parse(&text).unwrap_err(),
        Error::HeaderMismatch { .. }
    ));
}

#[test]
fn legacy_header_rejected_not_defaulted() {
    let text = format!(
        "{LEGACY_HEADER}\nWaymo,2025-06,1000000,5000000,900000,1100000,old export\n"
    );
    assert!(matches!(
        ExposureLedger::parse(&text).unwrap_err(),
        Error::LegacyHeader
    ));
}

#[test]
fn header_only_rejected() {
    assert!(matches!(
        ExposureLedger::parse(&format!("{HEADER}\n")).unwrap_err(),
        Error::EmptyLedger
    ));
    assert!(matches!(
        ExposureLedger::parse("").unwrap_err(),
        Error::EmptyLedger
    ));
}

#[test]
fn vmt_ordering_violations_rejected() {
    // vmt_min > vmt
    let err = parse_with(&[(4, "1200000")]).unwrap_err();
    assert!(matches!(err, Error::OrderingViolation { line: 2, .. }));

    // vmt > vmt_max
    let err = parse_with(&[(5, "900000")]).unwrap_err();
    assert!(matches!(err, Error::OrderingViolation { .. }));
}

#[test]
fn coverage_bounds_rejected() {
    assert!(matches!(
        parse_with(&[(6, "0.0")]).unwrap_err(),
        Error::OutOfRange { .. }
    ));
    assert!(matches!(
        parse_with(&[(6, "1.5")]).unwrap_err(),
        Error::OutOfRange { .. }
    ));
}

#[test]
fn incident_coverage_bounds_rejected() {
    // incident_coverage = 0
    assert!(matches!(
        parse_with(&[(7, "0.0"), (8, "0.0")]).unwrap_err(),
        Error::OutOfRange { .. }
    ));

    // incident_coverage_min > incident_coverage
    assert!(matches!(
        parse_with(&[(8, "0.99")]).unwrap_err(),
        Error::OrderingViolation { .. }
    ));

    // incident_coverage_max < incident_coverage
    assert!(matches!(
        parse_with(&[(9, "0.9")]).unwrap_err(),
        Error::OrderingViolation { .. }
    ));

    // incident_coverage_max > 1
    assert!(matches!(
        parse_with(&[(9, "1.2")]).unwrap_err(),
        Error::OutOfRange { .. }
    ));
}

#[test]
fn negative_vmt_rejected() {
    // The decimal pattern admits no sign, so this fails as an
    // unparseable number rather than a range violation.
    let err = parse_with(&[(2, "-1000000")]).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidNumber {
            line: 2,
            field: "vmt",
            ..
        }
    ));
}

#[test]
fn non_numeric_fields_rejected() {
    assert!(matches!(
        parse_with(&[(2, "abc")]).unwrap_err(),
        Error::InvalidNumber { field: "vmt", .. }
    ));
    assert!(matches!(
        parse_with(&[(6, "50%")]).unwrap_err(),
        Error::InvalidNumber {
            field: "coverage",
            ..
        }
    ));
    // Exponent notation is outside the contract's decimal pattern.
    assert!(matches!(
        parse_with(&[(2, "1e6")]).unwrap_err(),
        Error::InvalidNumber { field: "vmt", .. }
    ));
}

#[test]
fn unknown_operator_rejected() {
    assert!(matches!(
        parse_with(&[(0, "Cruise")]).unwrap_err(),
        Error::UnknownOperator { .. }
    ));
}

#[test]
fn malformed_month_rejected() {
    for month in ["2025/06", "JUN-2025", "2025-13", "06-2025"] {
        assert!(
            matches!(
                parse_with(&[(1, month)]).unwrap_err(),
                Error::InvalidMonth { .. }
            ),
            "accepted month {month:?}"
        );
    }
}

#[test]
fn short_row_rejected_with_count() {
    let text = format!("{HEADER}\nWaymo,2025-06,1000000\n");
    assert!(matches!(
        ExposureLedger::parse(&text).unwrap_err(),
        Error::FieldCount {
            line: 2,
            expected: 11,
            actual: 3
        }
    ));
}
