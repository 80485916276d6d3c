// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local subprocess launcher.

use async_trait::async_trait;
use parking_lot::Mutex;
use sp_core::{Clock, RunPaths};
use sp_protocol::{atomic_write_json, format_ts, SessionState};
use std::io::Write;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::process::{Child, Command};

use super::{Health, LaunchError, Launcher, StartSpec};
use crate::heartbeat::{heartbeat_age, is_stale};

/// Runs the tool as a direct child process.
#[derive(Clone)]
pub struct LocalLauncher<C: Clock> {
    clock: C,
}

/// Handle to a launched local session.
#[derive(Debug)]
pub struct LocalHandle {
    child: tokio::sync::Mutex<Child>,
    pid: Option<u32>,
    pub(super) paths: RunPaths,
    heartbeat_timeout: Duration,
    stop_grace: Duration,
    state: Mutex<SessionState>,
    finalized: AtomicBool,
    /// Set by `stop`; an exit without it is a crash even with code 0.
    stop_requested: AtomicBool,
}

impl<C: Clock> LocalLauncher<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Substitute `${init_script}` and split into argv. The template comes
    /// from configuration, not from user input; no shell is involved.
    fn render_argv(template: &str, paths: &RunPaths) -> Result<Vec<String>, LaunchError> {
        let init = paths.bootstrap_script();
        let rendered = template.replace("${init_script}", &init.display().to_string());
        let argv: Vec<String> = rendered.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            return Err(LaunchError::CommandTemplate(template.to_string()));
        }
        Ok(argv)
    }

    /// Append a timestamped line to `session/supervisor.log`.
    fn log_line(&self, paths: &RunPaths, message: &str) {
        let path = paths.supervisor_log();
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| {
                writeln!(file, "{} {}", format_ts(self.clock.epoch_ms()), message)
            });
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "supervisor log write failed");
        }
    }

    pub(super) async fn start_command(
        &self,
        spec: StartSpec,
        argv: Vec<String>,
    ) -> Result<LocalHandle, LaunchError> {
        let paths = spec.paths.clone();
        std::fs::create_dir_all(paths.session_dir())?;

        let (program, args) = argv
            .split_first()
            .ok_or_else(|| LaunchError::CommandTemplate(String::new()))?;

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(paths.run_dir())
            .envs(spec.env.iter().cloned())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command
            .spawn()
            .map_err(|e| LaunchError::SpawnFailed(format!("{program}: {e}")))?;
        let pid = child.id();

        tracing::info!(job_id = %spec.job_id, program, pid, "tool session started");
        self.log_line(&paths, &format!("started pid={} cmd={}", pid.unwrap_or(0), program));

        // One copy task per stream; each file has a single writer.
        if let Some(stdout) = child.stdout.take() {
            spawn_stream_copy(stdout, paths.tool_stdout_log());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_stream_copy(stderr, paths.tool_stderr_log());
        }

        let state = SessionState::started(
            spec.job_id.clone(),
            pid,
            format_ts(self.clock.epoch_ms()),
        );
        atomic_write_json(&paths.session_state(), &state)?;

        Ok(LocalHandle {
            child: tokio::sync::Mutex::new(child),
            pid,
            paths,
            heartbeat_timeout: spec.heartbeat_timeout,
            stop_grace: spec.stop_grace,
            state: Mutex::new(state),
            finalized: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
        })
    }

    /// Record the exit code in `session/state.json` exactly once.
    fn finalize_state(&self, handle: &LocalHandle, exit_code: Option<i32>) {
        if handle.finalized.swap(true, Ordering::SeqCst) {
            return;
        }
        let state = {
            let mut state = handle.state.lock();
            state.finalize(exit_code);
            state.clone()
        };
        if let Err(e) = atomic_write_json(&handle.paths.session_state(), &state) {
            tracing::warn!(error = %e, "failed to finalize session state");
        }
        self.log_line(&handle.paths, &format!("exited code={:?}", exit_code));
    }
}

fn spawn_stream_copy(
    stream: impl tokio::io::AsyncRead + Unpin + Send + 'static,
    path: std::path::PathBuf,
) {
    tokio::spawn(async move {
        let mut stream = stream;
        match tokio::fs::File::create(&path).await {
            Ok(mut file) => {
                if let Err(e) = tokio::io::copy(&mut stream, &mut file).await {
                    tracing::warn!(path = %path.display(), error = %e, "stream capture ended");
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open capture log");
            }
        }
    });
}

#[async_trait]
impl<C: Clock> Launcher for LocalLauncher<C> {
    type Handle = LocalHandle;

    fn name(&self) -> &'static str {
        "local"
    }

    async fn start(&self, spec: StartSpec) -> Result<Self::Handle, LaunchError> {
        let argv = Self::render_argv(&spec.command_template, &spec.paths)?;
        self.start_command(spec, argv).await
    }

    async fn wait_ready(
        &self,
        handle: &Self::Handle,
        timeout: Duration,
    ) -> Result<(), LaunchError> {
        let deadline = self.clock.now() + timeout;
        loop {
            if handle.paths.ready_marker().exists() || handle.paths.heartbeat().exists() {
                return Ok(());
            }
            // A tool that dies before signalling ready will never become so.
            let exited = {
                let mut child = handle.child.lock().await;
                child.try_wait().ok().flatten()
            };
            if let Some(status) = exited {
                self.finalize_state(handle, status.code());
                return Err(LaunchError::SpawnFailed(format!(
                    "tool exited before ready (status {status})"
                )));
            }
            if self.clock.now() >= deadline {
                return Err(LaunchError::ReadyTimeout {
                    waited_s: timeout.as_secs(),
                });
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    async fn poll_health(&self, handle: &Self::Handle) -> Health {
        let exited = {
            let mut child = handle.child.lock().await;
            match child.try_wait() {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(pid = handle.pid, error = %e, "try_wait failed");
                    return Health::Crashed;
                }
            }
        };

        if let Some(status) = exited {
            self.finalize_state(handle, status.code());
            let graceful = handle.stop_requested.load(Ordering::SeqCst);
            return if graceful && status.success() {
                Health::Alive
            } else {
                Health::Crashed
            };
        }

        let age = heartbeat_age(&handle.paths.heartbeat(), &self.clock);
        if let Some(age) = age {
            // Record the observation; the state file stays ours until exit.
            let snapshot = {
                let mut state = handle.state.lock();
                state.last_heartbeat_ms =
                    Some(self.clock.epoch_ms().saturating_sub(age.as_millis() as u64));
                state.clone()
            };
            if !handle.finalized.load(Ordering::SeqCst) {
                if let Err(e) = atomic_write_json(&handle.paths.session_state(), &snapshot) {
                    tracing::warn!(error = %e, "session state update failed");
                }
            }
        }
        if is_stale(age, handle.heartbeat_timeout) {
            Health::HeartbeatLost
        } else {
            Health::Alive
        }
    }

    async fn stop(&self, handle: &Self::Handle, reason: &str) -> Result<(), LaunchError> {
        handle.stop_requested.store(true, Ordering::SeqCst);
        std::fs::write(handle.paths.stop_marker(), reason)?;
        self.log_line(&handle.paths, &format!("stop requested: {reason}"));

        let deadline = self.clock.now() + handle.stop_grace;
        loop {
            let exited = {
                let mut child = handle.child.lock().await;
                child.try_wait().ok().flatten()
            };
            if let Some(status) = exited {
                self.finalize_state(handle, status.code());
                return Ok(());
            }
            if self.clock.now() >= deadline {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let mut child = handle.child.lock().await;
        if let Err(e) = child.kill().await {
            tracing::warn!(pid = handle.pid, error = %e, "kill after grace period failed");
        }
        let code = child.try_wait().ok().flatten().and_then(|s| s.code());
        drop(child);
        self.finalize_state(handle, code);
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
