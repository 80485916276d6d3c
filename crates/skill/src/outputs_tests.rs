// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::contract::Contract;
use std::fs;

fn contract(outputs: &str) -> Contract {
    let raw = format!(
        "name: t\nversion: \"1.0\"\nentry: run.tcl\nscripts: [run.tcl]\nrequired_outputs:\n{outputs}"
    );
    Contract::parse(&raw).unwrap()
}

fn run_dir_with_reports() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("reports")).unwrap();
    dir
}

#[test]
fn all_outputs_present_passes() {
    let dir = run_dir_with_reports();
    fs::write(dir.path().join("reports/summary_health.txt"), "ok\n").unwrap();

    let contract = contract("  - path: reports/summary_health.txt\n");
    let report = validate_outputs(dir.path(), &contract);
    assert!(report.passed());
    assert_eq!(report.checks[0].matches.len(), 1);
}

#[test]
fn missing_output_classifies_output_missing() {
    let dir = run_dir_with_reports();
    let contract = contract("  - path: reports/summary_health.txt\n");

    let report = validate_outputs(dir.path(), &contract);
    assert_eq!(report.first_failure(), Some(sp_core::ErrorClass::OutputMissing));
    assert!(report.checks[0].matches.is_empty());
}

#[test]
fn empty_output_classifies_output_empty() {
    let dir = run_dir_with_reports();
    fs::write(dir.path().join("reports/summary_health.txt"), "").unwrap();

    let contract = contract("  - path: reports/summary_health.txt\n");
    let report = validate_outputs(dir.path(), &contract);
    assert_eq!(report.first_failure(), Some(sp_core::ErrorClass::OutputEmpty));
}

#[test]
fn empty_output_allowed_when_non_empty_false() {
    let dir = run_dir_with_reports();
    fs::write(dir.path().join("reports/marker.txt"), "").unwrap();

    let contract = contract("  - path: reports/marker.txt\n    non_empty: false\n");
    let report = validate_outputs(dir.path(), &contract);
    assert!(report.passed());
}

#[test]
fn first_failure_wins_and_all_mismatches_recorded() {
    let dir = run_dir_with_reports();
    fs::write(dir.path().join("reports/second.txt"), "").unwrap();

    let contract = contract(
        "  - path: reports/first.txt\n  - path: reports/second.txt\n",
    );
    let report = validate_outputs(dir.path(), &contract);
    // Missing (entry 1) outranks Empty (entry 2) by declaration order.
    assert_eq!(report.first_failure(), Some(sp_core::ErrorClass::OutputMissing));
    assert_eq!(
        report.checks.iter().filter(|c| c.failure.is_some()).count(),
        2
    );
}

#[test]
fn glob_pattern_matches_multiple_files() {
    let dir = run_dir_with_reports();
    fs::write(dir.path().join("reports/drc_a.rpt"), "x").unwrap();
    fs::write(dir.path().join("reports/drc_b.rpt"), "y").unwrap();

    let contract = contract("  - path: reports/drc.rpt\n    glob: \"reports/drc*.rpt\"\n");
    let report = validate_outputs(dir.path(), &contract);
    assert!(report.passed());
    assert_eq!(report.checks[0].matches.len(), 2);
    // Deterministic, path-sorted order.
    assert!(report.checks[0].matches[0] < report.checks[0].matches[1]);
}

#[cfg(unix)]
#[test]
fn symlink_escaping_reports_does_not_satisfy_the_contract() {
    let dir = run_dir_with_reports();
    let outside = dir.path().join("outside.txt");
    fs::write(&outside, "secret").unwrap();
    std::os::unix::fs::symlink(&outside, dir.path().join("reports/leak.txt")).unwrap();

    let contract = contract("  - path: reports/leak.txt\n");
    let report = validate_outputs(dir.path(), &contract);
    assert_eq!(report.first_failure(), Some(sp_core::ErrorClass::OutputMissing));
}

#[test]
fn directories_do_not_count_as_outputs() {
    let dir = run_dir_with_reports();
    fs::create_dir_all(dir.path().join("reports/summary_health.txt")).unwrap();

    let contract = contract("  - path: reports/summary_health.txt\n");
    let report = validate_outputs(dir.path(), &contract);
    assert_eq!(report.first_failure(), Some(sp_core::ErrorClass::OutputMissing));
}
