//! End-to-end tests for the `saferate` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

const HEADER: &str = "company,month,vmt,company_cumulative_vmt,vmt_min,vmt_max,coverage,incident_coverage,incident_coverage_min,incident_coverage_max,rationale";

fn write_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

fn valid_exposure() -> NamedTempFile {
    write_file(&format!(
        "{HEADER}\n\
         Waymo,2025-06,1000000,1000000,900000,1100000,1.0,0.95,0.9,1.0,fleet telemetry\n\
         Waymo,2025-07,1200000,2200000,1000000,1400000,1.0,0.9,0.8,1.0,fleet telemetry\n"
    ))
}

fn valid_incidents() -> NamedTempFile {
    write_file(
        r#"[{
            "reportId": "W-100",
            "company": "Waymo",
            "date": "JUN-2025",
            "speed": 12,
            "road": "Street",
            "severity": "minor",
            "fault": {
                "claude": {"fraction": 0.5, "rationale": "split"},
                "codex": {"fraction": 0.5, "rationale": "split"},
                "gemini": {"fraction": 0.5, "rationale": "split"}
            }
        }]"#,
    )
}

#[test]
fn estimate_prints_json_report() {
    let exposure = valid_exposure();
    let incidents = valid_incidents();

    Command::cargo_bin("saferate")
        .unwrap()
        .args(["estimate", "--mass", "90"])
        .arg("--exposure")
        .arg(exposure.path())
        .arg("--incidents")
        .arg(incidents.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"credible_mass_pct\": 90.0"))
        .stdout(predicate::str::contains("any-incident"))
        .stdout(predicate::str::contains("\"median\""));
}

#[test]
fn check_reports_row_and_incident_counts() {
    let exposure = valid_exposure();
    let incidents = valid_incidents();

    Command::cargo_bin("saferate")
        .unwrap()
        .arg("check")
        .arg("--exposure")
        .arg(exposure.path())
        .arg("--incidents")
        .arg(incidents.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exposure_rows\": 2"))
        .stdout(predicate::str::contains("\"incidents\": 1"))
        .stdout(predicate::str::contains("\"Waymo\": 1"));
}

#[test]
fn malformed_exposure_fails_with_structured_error() {
    let exposure = write_file("company,month,vmt\nWaymo,2025-06,10\n");
    let incidents = valid_incidents();

    Command::cargo_bin("saferate")
        .unwrap()
        .arg("estimate")
        .arg("--exposure")
        .arg(exposure.path())
        .arg("--incidents")
        .arg(incidents.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"code\":10"))
        .stderr(predicate::str::contains("\"category\":\"input\""));
}

#[test]
fn out_of_window_incident_fails_with_domain_error() {
    let exposure = valid_exposure();
    let incidents = write_file(
        r#"[{
            "reportId": "W-200",
            "company": "Waymo",
            "date": "DEC-2025",
            "road": "Street",
            "severity": "no-injury",
            "fault": {
                "claude": {"fraction": 0.0},
                "codex": {"fraction": 0.0},
                "gemini": {"fraction": 0.0}
            }
        }]"#,
    );

    Command::cargo_bin("saferate")
        .unwrap()
        .arg("estimate")
        .arg("--exposure")
        .arg(exposure.path())
        .arg("--incidents")
        .arg(incidents.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"category\":\"domain\""))
        .stderr(predicate::str::contains("W-200"));
}

#[test]
fn invalid_mass_rejected() {
    let exposure = valid_exposure();
    let incidents = valid_incidents();

    Command::cargo_bin("saferate")
        .unwrap()
        .args(["estimate", "--mass", "45"])
        .arg("--exposure")
        .arg(exposure.path())
        .arg("--incidents")
        .arg(incidents.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("credible_mass_pct"));
}
