//! Scenario: the skill runs but leaves the contract unsatisfied.

use crate::prelude::*;
use sp_adapters::{FakeLauncher, ScriptBehavior};
use sp_protocol::BundleIndex;

#[tokio::test]
async fn deleted_reports_classify_output_missing_with_empty_inventory() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "a");
    make_skill(dir.path());

    // The skill script wipes reports/ before returning success.
    let launcher = passing_launcher();
    launcher.on_script("scripts/run.tcl", ScriptBehavior::pass().remove("reports"));

    let orch = orchestrator(launcher);
    let outcome = orch.run_job(request(dir.path(), "a")).await.unwrap();
    let (_, run_dir, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Fail);
    assert_eq!(error_type, ErrorClass::OutputMissing);

    let paths = RunPaths::from_run_dir(&run_dir);
    let raw = std::fs::read(paths.bundle_dir().join("reports_inventory.json")).unwrap();
    let inventory: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(inventory.as_array().unwrap().len(), 0);

    let index: BundleIndex = load_json(&paths.bundle_index()).unwrap();
    assert_eq!(index.error_type, ErrorClass::OutputMissing);
}

#[tokio::test]
async fn empty_required_output_classifies_output_empty() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "a");
    make_skill(dir.path());

    let launcher = FakeLauncher::new();
    launcher.on_script(
        "scripts/run.tcl",
        ScriptBehavior::pass()
            .write("reports/summary_health.txt", "clean\n")
            .write("reports/timing_health.txt", ""),
    );

    let orch = orchestrator(launcher);
    let outcome = orch.run_job(request(dir.path(), "a")).await.unwrap();
    let (_, _, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Fail);
    assert_eq!(error_type, ErrorClass::OutputEmpty);
}
