// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake launcher for testing.
//!
//! Plays both sides of the control plane: it pretends to be the supervisor
//! (recording calls, reporting scripted health) and runs an in-process
//! stand-in for the tool-side queue processor that answers requests with
//! scripted acks, writes synthetic outputs, and maintains the heartbeat.
#![cfg_attr(coverage_nightly, coverage(off))]

use async_trait::async_trait;
use parking_lot::Mutex;
use sp_core::{ErrorClass, RunPaths, SystemClock, Clock};
use sp_protocol::{atomic_write_json, format_ts, load_json, Ack, AckStatus, Request};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::{Health, LaunchError, Launcher, StartSpec};

/// Recorded launcher call
#[derive(Debug, Clone)]
pub enum LaunchCall {
    Start { job_id: String },
    WaitReady,
    Stop { reason: String },
}

/// How the fake queue processor answers one script.
#[derive(Debug, Clone)]
pub enum ScriptOutcome {
    Pass,
    Fail { class: ErrorClass, message: String },
    /// Never write an ack; the waiter must time out.
    NoAck,
}

/// Scripted behavior for one script path (e.g. `scripts/restore_wrapper.tcl`).
#[derive(Debug, Clone)]
pub struct ScriptBehavior {
    pub outcome: ScriptOutcome,
    /// Run-dir-relative files written before the ack.
    pub writes: Vec<(String, String)>,
    /// Run-dir-relative paths removed before the ack.
    pub removes: Vec<String>,
}

impl ScriptBehavior {
    pub fn pass() -> Self {
        Self {
            outcome: ScriptOutcome::Pass,
            writes: Vec::new(),
            removes: Vec::new(),
        }
    }

    pub fn fail(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            outcome: ScriptOutcome::Fail {
                class,
                message: message.into(),
            },
            writes: Vec::new(),
            removes: Vec::new(),
        }
    }

    pub fn no_ack() -> Self {
        Self {
            outcome: ScriptOutcome::NoAck,
            writes: Vec::new(),
            removes: Vec::new(),
        }
    }

    pub fn write(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.writes.push((path.into(), content.into()));
        self
    }

    pub fn remove(mut self, path: impl Into<String>) -> Self {
        self.removes.push(path.into());
        self
    }
}

struct FakeState {
    calls: Vec<LaunchCall>,
    behaviors: HashMap<String, ScriptBehavior>,
    health: Health,
    ready: bool,
    /// After this many acks, flip health and stop answering.
    fail_after_acks: Option<(u32, Health)>,
    acked: u32,
    start_error: Option<String>,
}

/// Fake launcher for testing
#[derive(Clone)]
pub struct FakeLauncher {
    inner: Arc<Mutex<FakeState>>,
}

/// Handle for a fake session: just the path map plus the pump task.
pub struct FakeHandle {
    paths: RunPaths,
    pump: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                calls: Vec::new(),
                behaviors: HashMap::new(),
                health: Health::Alive,
                ready: true,
                fail_after_acks: None,
                acked: 0,
                start_error: None,
            })),
        }
    }
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LaunchCall> {
        self.inner.lock().calls.clone()
    }

    /// Script a behavior for a request script path.
    pub fn on_script(&self, script: impl Into<String>, behavior: ScriptBehavior) {
        self.inner.lock().behaviors.insert(script.into(), behavior);
    }

    /// Force the health the watcher will observe.
    pub fn set_health(&self, health: Health) {
        self.inner.lock().health = health;
    }

    /// Never become ready; `wait_ready` fails.
    pub fn set_never_ready(&self) {
        self.inner.lock().ready = false;
    }

    /// Fail `start` itself with the given message.
    pub fn set_start_error(&self, message: impl Into<String>) {
        self.inner.lock().start_error = Some(message.into());
    }

    /// After `n` acks, report `health` and stop answering requests.
    pub fn fail_after_acks(&self, n: u32, health: Health) {
        self.inner.lock().fail_after_acks = Some((n, health));
    }

    pub fn ack_count(&self) -> u32 {
        self.inner.lock().acked
    }

    fn pump_once(inner: &Arc<Mutex<FakeState>>, paths: &RunPaths) {
        let clock = SystemClock;
        let queue = paths.queue_dir();
        let Ok(entries) = std::fs::read_dir(&queue) else {
            return;
        };
        let mut pending: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        pending.sort();

        for path in pending {
            let Ok(request) = load_json::<Request>(&path) else {
                continue;
            };
            let ack_path = paths.ack(&request.request_id);
            if ack_path.exists() {
                continue;
            }

            let behavior = {
                let mut state = inner.lock();
                if let Some((limit, health)) = state.fail_after_acks {
                    if state.acked >= limit {
                        state.health = health;
                        return;
                    }
                }
                state
                    .behaviors
                    .get(&request.script)
                    .cloned()
                    .unwrap_or_else(ScriptBehavior::pass)
            };

            for (rel, content) in &behavior.writes {
                let target = paths.run_dir().join(rel);
                if let Some(parent) = target.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }
                let _ = std::fs::write(&target, content);
            }
            for rel in &behavior.removes {
                let target = paths.run_dir().join(rel);
                if target.is_dir() {
                    let _ = std::fs::remove_dir_all(&target);
                } else {
                    let _ = std::fs::remove_file(&target);
                }
            }

            let ts = format_ts(clock.epoch_ms());
            let ack = match &behavior.outcome {
                ScriptOutcome::NoAck => continue,
                ScriptOutcome::Pass => Ack {
                    schema_version: sp_protocol::SCHEMA_VERSION.to_string(),
                    request_id: request.request_id.clone(),
                    job_id: request.job_id.clone(),
                    status: AckStatus::Pass,
                    error_type: ErrorClass::Ok,
                    message: "ok".to_string(),
                    started_at: Some(ts.clone()),
                    finished_at: Some(ts),
                    duration_ms: Some(1),
                    evidence_paths: Vec::new(),
                },
                ScriptOutcome::Fail { class, message } => Ack {
                    schema_version: sp_protocol::SCHEMA_VERSION.to_string(),
                    request_id: request.request_id.clone(),
                    job_id: request.job_id.clone(),
                    status: AckStatus::Fail,
                    error_type: *class,
                    message: message.clone(),
                    started_at: Some(ts.clone()),
                    finished_at: Some(ts),
                    duration_ms: Some(1),
                    evidence_paths: vec!["session/innovus.stdout.log".to_string()],
                },
            };

            if atomic_write_json(&ack_path, &ack).is_ok() {
                inner.lock().acked += 1;
            }
        }
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Handle = FakeHandle;

    fn name(&self) -> &'static str {
        "fake"
    }

    async fn start(&self, spec: StartSpec) -> Result<Self::Handle, LaunchError> {
        {
            let mut state = self.inner.lock();
            state.calls.push(LaunchCall::Start {
                job_id: spec.job_id.to_string(),
            });
            if let Some(message) = state.start_error.clone() {
                return Err(LaunchError::SpawnFailed(message));
            }
        }

        let paths = spec.paths.clone();
        std::fs::create_dir_all(paths.session_dir())?;

        // Synthetic session artifacts so bundles look like real runs.
        let clock = SystemClock;
        std::fs::write(paths.ready_marker(), "")?;
        std::fs::write(paths.heartbeat(), clock.epoch_ms().to_string())?;
        std::fs::write(paths.tool_stdout_log(), "fake tool session\n")?;

        let inner = Arc::clone(&self.inner);
        let pump_paths = paths.clone();
        let pump = tokio::spawn(async move {
            loop {
                if pump_paths.stop_marker().exists() {
                    break;
                }
                Self::pump_once(&inner, &pump_paths);
                let _ = std::fs::write(pump_paths.heartbeat(), SystemClock.epoch_ms().to_string());
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        Ok(FakeHandle {
            paths,
            pump: Mutex::new(Some(pump)),
        })
    }

    async fn wait_ready(
        &self,
        _handle: &Self::Handle,
        timeout: Duration,
    ) -> Result<(), LaunchError> {
        {
            let mut state = self.inner.lock();
            state.calls.push(LaunchCall::WaitReady);
            if state.ready {
                return Ok(());
            }
        }
        Err(LaunchError::ReadyTimeout {
            waited_s: timeout.as_secs(),
        })
    }

    async fn poll_health(&self, _handle: &Self::Handle) -> Health {
        self.inner.lock().health
    }

    async fn stop(&self, handle: &Self::Handle, reason: &str) -> Result<(), LaunchError> {
        self.inner.lock().calls.push(LaunchCall::Stop {
            reason: reason.to_string(),
        });
        let _ = std::fs::write(handle.paths.stop_marker(), reason);
        if let Some(pump) = handle.pump.lock().take() {
            pump.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
