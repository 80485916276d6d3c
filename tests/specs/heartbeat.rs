//! Scenario: the session goes quiet mid-skill.

use crate::prelude::*;
use sp_adapters::Health;

#[tokio::test]
async fn heartbeat_loss_interrupts_the_skill_wait() {
    let dir = tempfile::tempdir().unwrap();
    make_db(dir.path(), "a");
    make_skill(dir.path());

    // One ack (the restore) then silence with a stale heartbeat. The ack
    // waiter must observe the watcher's interrupt, not its own timeout.
    let launcher = passing_launcher();
    launcher.fail_after_acks(1, Health::HeartbeatLost);

    let orch = orchestrator(launcher);
    let outcome = orch.run_job(request(dir.path(), "a")).await.unwrap();
    let (_, run_dir, status, error_type) = completed(outcome);

    assert_eq!(status, RunStatus::Fail);
    assert_eq!(error_type, ErrorClass::HeartbeatLost);

    // The restore was acknowledged; the skill request never was.
    let paths = RunPaths::from_run_dir(&run_dir);
    let acks = std::fs::read_dir(paths.ack_dir()).unwrap().count();
    assert_eq!(acks, 1);

    let events = read_events(&paths.timeline()).unwrap();
    let terminal: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminal.len(), 1);
    assert_eq!(terminal[0].event, EventKind::Fail);
}
