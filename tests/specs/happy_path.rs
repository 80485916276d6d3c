//! Scenario: a clean run end to end.

use crate::prelude::*;

#[tokio::test]
async fn happy_path_produces_pass_evidence() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "a");
    make_skill(dir.path());

    let orch = orchestrator(passing_launcher());
    let outcome = orch.run_job(request(dir.path(), "a")).await.unwrap();
    let (job_id, run_dir, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Pass);
    assert_eq!(error_type, ErrorClass::Ok);

    let paths = RunPaths::from_run_dir(&run_dir);

    // Both declared outputs exist and are non-empty.
    for report in ["summary_health.txt", "timing_health.txt"] {
        let meta = std::fs::metadata(paths.reports_dir().join(report)).unwrap();
        assert!(meta.len() > 0, "{report} is empty");
    }

    // Manifest agrees with the timeline's single terminal event.
    let manifest: Manifest = load_json(&paths.manifest()).unwrap();
    assert_eq!(manifest.status, RunStatus::Pass);
    assert_eq!(manifest.job_id, job_id);

    let events = read_events(&paths.timeline()).unwrap();
    let terminal: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].event, EventKind::Done);
    assert!(events.iter().any(|e| e.event == EventKind::StateExit
        && e.state.map(|s| s.as_str() == "SUMMARIZE").unwrap_or(false)));

    // The summary is readable and carries the evidence pointers.
    let summary: Summary = load_json(&paths.summary_json()).unwrap();
    assert_eq!(summary.status, RunStatus::Pass);
    assert!(summary
        .evidence
        .contains(&"reports/summary_health.txt".to_string()));

    // No bundle on a pass.
    assert!(!paths.bundle_index().exists());
}

#[tokio::test]
async fn repeated_pass_runs_produce_identical_report_inventories() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "a");
    make_skill(dir.path());

    let orch = orchestrator(passing_launcher());
    let (_, first_dir, ..) = completed(orch.run_job(request(dir.path(), "a")).await.unwrap());
    let (_, second_dir, ..) = completed(orch.run_job(request(dir.path(), "a")).await.unwrap());

    let inventory = |run_dir: &std::path::Path| -> Vec<(String, Vec<u8>)> {
        let reports = RunPaths::from_run_dir(run_dir).reports_dir();
        let mut files: Vec<_> = std::fs::read_dir(reports)
            .unwrap()
            .flatten()
            .map(|e| {
                (
                    e.file_name().to_string_lossy().into_owned(),
                    std::fs::read(e.path()).unwrap(),
                )
            })
            .collect();
        files.sort();
        files
    };

    assert_eq!(inventory(&first_dir), inventory(&second_dir));
}
