// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sp_core::FakeClock;
use sp_protocol::timeline::read_events;
use sp_protocol::{load_json, EventKind, RunStatus};

#[test]
fn creates_tree_manifest_and_init_event() {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::new();
    let job_id = JobId::new("job-1");

    let run = create(dir.path(), &job_id, "top", &JobConfig::default(), &clock).unwrap();

    for sub in run.paths.subdirs() {
        assert!(sub.is_dir(), "{} missing", sub.display());
    }

    let manifest: Manifest = load_json(&run.paths.manifest()).unwrap();
    assert_eq!(manifest.status, RunStatus::Running);
    assert_eq!(manifest.design.query, "top");
    assert_eq!(manifest.context.launcher, "local");

    let events = read_events(&run.paths.timeline()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, EventKind::StateEnter);
    assert_eq!(events[0].state, Some(JobState::Init));
}

#[test]
fn refuses_duplicate_job_id() {
    let dir = tempfile::tempdir().unwrap();
    let clock = FakeClock::new();
    let job_id = JobId::new("job-1");
    let config = JobConfig::default();

    create(dir.path(), &job_id, "top", &config, &clock).unwrap();
    let err = create(dir.path(), &job_id, "top", &config, &clock).unwrap_err();
    assert!(matches!(err, EngineError::RunDirExists(_)));
}
