//! Shared fixtures for the behavioral specs.

use sp_adapters::{FakeLauncher, ScriptBehavior};
use sp_core::{SequentialIdGen, SystemClock};
use sp_engine::{JobRequest, Orchestrator};
use std::fs;
use std::path::Path;

pub use sp_core::{ErrorClass, JobId, RunPaths};
pub use sp_engine::JobOutcome;
pub use sp_protocol::timeline::read_events;
pub use sp_protocol::{load_json, EventKind, Manifest, RunStatus, SelectionReason, Summary};

/// A `.enc` descriptor with its `.enc.dat` companion directory.
pub fn make_db(cwd: &Path, rel: &str) {
    let enc = cwd.join(format!("{rel}.enc"));
    if let Some(parent) = enc.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&enc, "restoreDesign -dir .\n").unwrap();
    fs::create_dir_all(cwd.join(format!("{rel}.enc.dat"))).unwrap();
}

/// The mock health skill: two required report files, one debug hint.
pub fn make_skill(cwd: &Path) {
    let root = cwd.join(".skillpilot/skills/summary_health_mock");
    fs::create_dir_all(&root).unwrap();
    fs::write(
        root.join("contract.yaml"),
        r#"
name: summary_health_mock
version: "1.0"
entry: run.tcl
scripts: [run.tcl]
required_outputs:
  - path: reports/summary_health.txt
  - path: reports/timing_health.txt
debug_hints:
  - rerun report_timing interactively if timing_health.txt looks wrong
"#,
    )
    .unwrap();
    fs::write(
        root.join("run.tcl"),
        "# health reports into ${SP_REPORTS_DIR}\n",
    )
    .unwrap();
}

/// A fake session whose skill entry writes both required reports.
pub fn passing_launcher() -> FakeLauncher {
    let launcher = FakeLauncher::new();
    launcher.on_script(
        "scripts/run.tcl",
        ScriptBehavior::pass()
            .write("reports/summary_health.txt", "design health: clean\n")
            .write("reports/timing_health.txt", "wns: met\n"),
    );
    launcher
}

pub fn orchestrator(
    launcher: FakeLauncher,
) -> Orchestrator<FakeLauncher, SystemClock, SequentialIdGen> {
    Orchestrator::new(launcher, SystemClock, SequentialIdGen::new("job"))
}

pub fn request(cwd: &Path, query: &str) -> JobRequest {
    JobRequest {
        cwd: cwd.to_owned(),
        query: query.to_string(),
        skill: "summary_health_mock".to_string(),
    }
}

/// Unpack a completed outcome or panic with context.
pub fn completed(outcome: JobOutcome) -> (JobId, std::path::PathBuf, RunStatus, ErrorClass) {
    match outcome {
        JobOutcome::Completed {
            job_id,
            run_dir,
            status,
            error_type,
        } => (job_id, run_dir, status, error_type),
        other => panic!("expected completion, got {other:?}"),
    }
}
