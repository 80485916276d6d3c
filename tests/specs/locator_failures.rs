//! Scenario: missing companion data.

use crate::prelude::*;
use sp_adapters::FakeLauncher;
use sp_protocol::BundleIndex;

#[tokio::test]
async fn missing_companion_fails_without_starting_a_session() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("c.enc"), "restoreDesign\n").unwrap();
    make_skill(dir.path());

    let launcher = FakeLauncher::new();
    let orch = orchestrator(launcher.clone());
    let outcome = orch.run_job(request(dir.path(), "c.enc")).await.unwrap();
    let (_, run_dir, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Fail);
    assert_eq!(error_type, ErrorClass::LocatorFail);

    // Session never started.
    assert!(launcher.calls().is_empty());

    // The bundle exists and explains itself even with no session evidence.
    let paths = RunPaths::from_run_dir(&run_dir);
    let index: BundleIndex = load_json(&paths.bundle_index()).unwrap();
    assert_eq!(index.error_type, ErrorClass::LocatorFail);
    for entry in &index.included {
        assert!(paths.bundle_dir().join(&entry.path).is_file());
    }
    // Manifest and timeline made it into the bundle; session logs could not.
    let kinds: Vec<&str> = index.included.iter().map(|e| e.kind.as_str()).collect();
    assert!(kinds.contains(&"manifest"));
    assert!(kinds.contains(&"timeline_tail"));
    assert!(index.missing.contains(&"tool_stdout_tail".to_string()));
}

#[tokio::test]
async fn scan_with_no_match_fails_the_same_way() {
    let dir = tempfile::tempdir().unwrap();
    make_skill(dir.path());

    let orch = orchestrator(FakeLauncher::new());
    let outcome = orch.run_job(request(dir.path(), "nothing")).await.unwrap();
    let (_, _, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Fail);
    assert_eq!(error_type, ErrorClass::LocatorFail);
}
