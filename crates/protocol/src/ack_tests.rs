// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::atomic::load_json;
use sp_core::ErrorClass;

#[test]
fn parses_an_ack_written_by_the_queue_processor() {
    // Byte-for-byte the shape the Tcl side emits.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job-1_0001_restore.json");
    std::fs::write(
        &path,
        r#"{
  "schema_version": "1.0",
  "request_id": "job-1_0001_restore",
  "job_id": "job-1",
  "status": "FAIL",
  "error_type": "RESTORE_FAIL",
  "message": "source failed: design.enc: no such file",
  "started_at": "2026-01-01T00:00:01Z",
  "finished_at": "2026-01-01T00:00:02Z",
  "duration_ms": 1000,
  "evidence_paths": ["session/innovus.stdout.log"]
}"#,
    )
    .unwrap();

    let ack: Ack = load_json(&path).unwrap();
    assert!(!ack.passed());
    assert_eq!(ack.status, AckStatus::Fail);
    assert_eq!(ack.error_type, ErrorClass::RestoreFail);
    assert_eq!(ack.evidence_paths, vec!["session/innovus.stdout.log"]);
}

#[test]
fn status_wire_form() {
    assert_eq!(serde_json::to_string(&AckStatus::Pass).unwrap(), "\"PASS\"");
    assert_eq!(serde_json::to_string(&AckStatus::Fail).unwrap(), "\"FAIL\"");
}

#[test]
fn minimal_ack_parses_without_optional_fields() {
    let raw = r#"{
        "schema_version": "1.0",
        "request_id": "job-1_0002_skill",
        "job_id": "job-1",
        "status": "PASS",
        "error_type": "OK",
        "message": "ok"
    }"#;
    let ack: Ack = serde_json::from_str(raw).unwrap();
    assert!(ack.passed());
    assert!(ack.started_at.is_none());
    assert!(ack.evidence_paths.is_empty());
}
