//! Smoke tests for the `folio` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn folio() -> Command {
    let mut cmd = Command::cargo_bin("folio").unwrap();
    cmd.env_remove("FOLIO_PAGE_SIZE")
        .env_remove("FOLIO_CACHE_CAPACITY")
        .env_remove("FOLIO_CACHE_NAME")
        .env_remove("FOLIO_CACHE_VERBOSE");
    cmd
}

#[test]
fn test_version() {
    folio()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_scan_prints_report() {
    folio()
        .args(["scan", "--items", "40", "--page-size", "4", "--load-delay-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schema_version\": \"folio-scan-v1\""))
        .stdout(predicate::str::contains("\"pages_loaded\": 10"))
        .stdout(predicate::str::contains("\"all_unloaded\": true"));
}

#[test]
fn test_scan_writes_report_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.json");
    folio()
        .args(["scan", "--items", "30", "--page-size", "5", "--pattern", "random"])
        .args(["--accesses", "60", "--load-delay-ms", "0", "--out"])
        .arg(&out)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["pattern"], "random");
    assert_eq!(report["accesses"], 60);
}

#[test]
fn test_scan_env_page_size() {
    folio()
        .env("FOLIO_PAGE_SIZE", "10")
        .args(["scan", "--items", "30", "--load-delay-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"page_size\": 10"))
        .stdout(predicate::str::contains("\"pages\": 3"));
}

#[test]
fn test_scan_rejects_zero_page_size() {
    folio()
        .args(["scan", "--page-size", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("page_size must be greater than zero"));
}

#[test]
fn test_scan_rejects_tiny_capacity() {
    folio()
        .args(["scan", "--capacity", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("capacity must be at least 2"));
}
