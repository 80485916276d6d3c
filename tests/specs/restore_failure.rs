//! Scenario: the database restore raises inside the tool.

use crate::prelude::*;
use sp_adapters::ScriptBehavior;
use sp_protocol::{Ack, BundleIndex};

#[tokio::test]
async fn restore_failure_is_classified_and_bundled_with_the_ack() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "a");
    make_skill(dir.path());

    let launcher = passing_launcher();
    launcher.on_script(
        "scripts/restore_wrapper.tcl",
        ScriptBehavior::fail(
            ErrorClass::RestoreFail,
            "source failed: a.enc.dat/top.v: no such file",
        ),
    );

    let orch = orchestrator(launcher);
    let outcome = orch.run_job(request(dir.path(), "a")).await.unwrap();
    let (_, run_dir, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Fail);
    assert_eq!(error_type, ErrorClass::RestoreFail);

    let paths = RunPaths::from_run_dir(&run_dir);
    let index: BundleIndex = load_json(&paths.bundle_index()).unwrap();
    let kinds: Vec<&str> = index.included.iter().map(|e| e.kind.as_str()).collect();
    assert!(kinds.contains(&"last_failing_ack"));
    assert!(kinds.contains(&"tool_stdout_tail"));

    let ack: Ack = load_json(&paths.bundle_dir().join("last_failing_ack.json")).unwrap();
    assert_eq!(ack.error_type, ErrorClass::RestoreFail);
    assert!(ack.message.contains("no such file"));

    // The skill's debug hint rides along in the suggested actions.
    assert!(index
        .next_actions
        .iter()
        .any(|a| a.contains("report_timing")));
}
