// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::atomic::{atomic_write_json, load_json};
use sp_core::{ErrorClass, JobId};
use std::path::Path;

fn stub() -> Manifest {
    Manifest::running(
        JobId::new("job-1"),
        "2026-01-01T00:00:00Z".to_string(),
        RuntimeContext {
            cwd: "/work".into(),
            run_dir: "/work/.skillpilot/runs/job-1".into(),
            launcher: "local".to_string(),
        },
        "top_chip",
    )
}

#[test]
fn stub_starts_running_ok() {
    let manifest = stub();
    assert_eq!(manifest.status, RunStatus::Running);
    assert_eq!(manifest.error_type, ErrorClass::Ok);
    assert!(manifest.skill.is_none());
    assert!(manifest.design.candidates.is_empty());
}

#[test]
fn finalize_fail_points_at_bundle() {
    let mut manifest = stub();
    manifest.finalize(RunStatus::Fail, ErrorClass::RestoreFail);
    assert_eq!(manifest.status, RunStatus::Fail);
    assert_eq!(manifest.error_type, ErrorClass::RestoreFail);
    assert_eq!(manifest.artifacts.debug_bundle.as_deref(), Some("debug_bundle"));
}

#[test]
fn finalize_pass_has_no_bundle_pointer() {
    let mut manifest = stub();
    manifest.finalize(RunStatus::Pass, ErrorClass::Ok);
    assert!(manifest.artifacts.debug_bundle.is_none());
}

#[test]
fn round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job_manifest.json");

    let mut manifest = stub();
    manifest.design.mode = Some(LocatorMode::NameScan);
    manifest.design.candidates = vec![Candidate {
        enc_path: Path::new("/work/b1/a.enc").into(),
        enc_dat_path: Path::new("/work/b1/a.enc.dat").into(),
        mtime_ms: 1_000,
        size_bytes: 42,
    }];
    atomic_write_json(&path, &manifest).unwrap();

    let loaded: Manifest = load_json(&path).unwrap();
    assert_eq!(loaded.design.candidates.len(), 1);
    assert_eq!(loaded.design.mode, Some(LocatorMode::NameScan));
    assert_eq!(loaded.job_id, manifest.job_id);
}

#[test]
fn selection_reason_wire_form_is_snake_case() {
    let json = serde_json::to_string(&SelectionReason::UniqueScanResult).unwrap();
    assert_eq!(json, "\"unique_scan_result\"");
    let json = serde_json::to_string(&SelectionReason::UserSelected).unwrap();
    assert_eq!(json, "\"user_selected\"");
}
