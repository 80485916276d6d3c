//! Scenario: multi-candidate pause and resume.

use crate::prelude::*;

#[tokio::test]
async fn two_candidates_pause_then_resume_selects_the_chosen_one() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "b1/a");
    make_db(dir.path(), "b2/a");
    make_skill(dir.path());

    let orch = orchestrator(passing_launcher());
    let outcome = orch.run_job(request(dir.path(), "a")).await.unwrap();

    let JobOutcome::AwaitingSelection {
        job_id,
        candidates,
        run_dir,
    } = outcome
    else {
        panic!("expected needs-selection");
    };

    // Sorted by path, nothing selected yet.
    assert_eq!(candidates.len(), 2);
    assert!(candidates[0].enc_path.ends_with("b1/a.enc"));
    assert!(candidates[1].enc_path.ends_with("b2/a.enc"));

    let paths = RunPaths::from_run_dir(&run_dir);
    let manifest: Manifest = load_json(&paths.manifest()).unwrap();
    assert_eq!(manifest.status, RunStatus::Running);
    assert!(manifest.design.selected.is_none());
    assert_eq!(manifest.design.candidates.len(), 2);

    // Resume with index 1 proceeds to PASS on b2.
    let outcome = orch.resume_job(dir.path(), &job_id, 1).await.unwrap();
    let (_, _, status, error_type) = completed(outcome);
    assert_eq!(status, RunStatus::Pass);
    assert_eq!(error_type, ErrorClass::Ok);

    let manifest: Manifest = load_json(&paths.manifest()).unwrap();
    assert_eq!(
        manifest.design.selection_reason,
        Some(SelectionReason::UserSelected)
    );
    assert!(manifest
        .design
        .selected
        .unwrap()
        .enc_path
        .ends_with("b2/a.enc"));
}

#[tokio::test]
async fn resuming_twice_with_the_same_choice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "b1/a");
    make_db(dir.path(), "b2/a");
    make_skill(dir.path());

    let orch = orchestrator(passing_launcher());
    let JobOutcome::AwaitingSelection { job_id, .. } =
        orch.run_job(request(dir.path(), "a")).await.unwrap()
    else {
        panic!("expected needs-selection");
    };

    let (_, run_dir, s1, e1) = completed(orch.resume_job(dir.path(), &job_id, 0).await.unwrap());
    let (_, _, s2, e2) = completed(orch.resume_job(dir.path(), &job_id, 0).await.unwrap());

    assert_eq!((s1, e1), (s2, e2));

    // The second resume re-ran nothing: still exactly one terminal event.
    let paths = RunPaths::from_run_dir(&run_dir);
    let events = read_events(&paths.timeline()).unwrap();
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}
