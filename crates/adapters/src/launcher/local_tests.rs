// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sp_core::{JobId, SystemClock};
use sp_protocol::SessionState;
use std::time::Duration;

fn spec(dir: &std::path::Path, command_template: &str) -> StartSpec {
    let paths = RunPaths::from_run_dir(dir);
    std::fs::create_dir_all(paths.scripts_dir()).unwrap();
    std::fs::create_dir_all(paths.session_dir()).unwrap();
    StartSpec {
        job_id: JobId::new("job-1"),
        paths,
        env: vec![("SP_TEST".to_string(), "1".to_string())],
        command_template: command_template.to_string(),
        batch_template: "bsub -I ${command}".to_string(),
        heartbeat_timeout: Duration::from_secs(30),
        stop_grace: Duration::from_millis(200),
    }
}

#[test]
fn render_argv_substitutes_init_script() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::from_run_dir(dir.path());
    let argv = LocalLauncher::<SystemClock>::render_argv(
        "innovus -no_gui -files ${init_script}",
        &paths,
    )
    .unwrap();
    assert_eq!(argv[0], "innovus");
    assert_eq!(argv[3], paths.bootstrap_script().display().to_string());
}

#[test]
fn empty_template_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::from_run_dir(dir.path());
    let err = LocalLauncher::<SystemClock>::render_argv("   ", &paths).unwrap_err();
    assert!(matches!(err, LaunchError::CommandTemplate(_)));
}

#[tokio::test]
async fn start_writes_session_state_and_captures_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let handle = launcher
        .start(spec(dir.path(), "echo session-banner"))
        .await
        .unwrap();

    let state: SessionState =
        sp_protocol::load_json(&handle.paths.session_state()).unwrap();
    assert!(state.pid.is_some());
    assert!(state.exit_code.is_none());

    // The copy task drains stdout shortly after the process exits.
    for _ in 0..50 {
        if std::fs::read_to_string(handle.paths.tool_stdout_log())
            .map(|s| s.contains("session-banner"))
            .unwrap_or(false)
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("stdout was not captured");
}

#[tokio::test]
async fn missing_program_fails_spawn() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let err = launcher
        .start(spec(dir.path(), "definitely-not-a-real-tool-9f3a"))
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::SpawnFailed(_)));
}

#[tokio::test]
async fn wait_ready_sees_heartbeat() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let handle = launcher.start(spec(dir.path(), "sleep 30")).await.unwrap();

    std::fs::write(handle.paths.heartbeat(), "1").unwrap();
    launcher
        .wait_ready(&handle, Duration::from_secs(1))
        .await
        .unwrap();

    launcher.stop(&handle, "test done").await.unwrap();
}

#[tokio::test]
async fn exit_before_ready_is_a_start_failure() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let handle = launcher.start(spec(dir.path(), "true")).await.unwrap();

    let err = launcher
        .wait_ready(&handle, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, LaunchError::SpawnFailed(_)));
}

#[tokio::test]
async fn clean_exit_without_stop_is_a_crash() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let handle = launcher.start(spec(dir.path(), "true")).await.unwrap();

    // Wait for the process to finish, then poll.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(launcher.poll_health(&handle).await, Health::Crashed);

    let state: SessionState =
        sp_protocol::load_json(&handle.paths.session_state()).unwrap();
    assert_eq!(state.exit_code, Some(0));
}

#[tokio::test]
async fn stale_heartbeat_reports_heartbeat_lost() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let mut s = spec(dir.path(), "sleep 30");
    s.heartbeat_timeout = Duration::from_secs(1);
    let handle = launcher.start(s).await.unwrap();

    // Heartbeat from the distant past.
    std::fs::write(handle.paths.heartbeat(), "1000").unwrap();
    assert_eq!(launcher.poll_health(&handle).await, Health::HeartbeatLost);

    // The observation was recorded in the session state. Allow a little
    // slack: the probe and the recorder read the clock separately.
    let state: SessionState =
        sp_protocol::load_json(&handle.paths.session_state()).unwrap();
    let observed = state.last_heartbeat_ms.unwrap();
    assert!((1000..1100).contains(&observed), "observed {observed}");

    launcher.stop(&handle, "test done").await.unwrap();
}

#[tokio::test]
async fn stop_kills_after_grace_and_finalizes_state() {
    let dir = tempfile::tempdir().unwrap();
    let launcher = LocalLauncher::new(SystemClock);
    let handle = launcher.start(spec(dir.path(), "sleep 30")).await.unwrap();

    launcher.stop(&handle, "operator request").await.unwrap();

    assert!(handle.paths.stop_marker().exists());
    let state: SessionState =
        sp_protocol::load_json(&handle.paths.session_state()).unwrap();
    // Killed by signal: no exit code, but the state is finalized.
    assert!(state.exit_code.is_none() || state.exit_code == Some(0));
    let log = std::fs::read_to_string(handle.paths.supervisor_log()).unwrap();
    assert!(log.contains("stop requested: operator request"));
}
