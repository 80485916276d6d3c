// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launcher plug points.
//!
//! A launcher owns the four supervisor operations: start the tool process,
//! wait for it to become ready, report its health, and stop it. Everything
//! above this trait is launcher-agnostic; in-memory test doubles replace
//! the real launchers without code changes elsewhere.

mod batch;
mod local;

pub use batch::BatchLauncher;
pub use local::LocalLauncher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncher, LaunchCall, ScriptBehavior, ScriptOutcome};

use async_trait::async_trait;
use sp_core::{JobId, RunPaths};
use std::time::Duration;
use thiserror::Error;

/// Errors from launcher operations
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("session not ready after {waited_s}s")]
    ReadyTimeout { waited_s: u64 },
    #[error("unusable command template: {0}")]
    CommandTemplate(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] sp_protocol::ProtocolError),
}

/// Session health as seen by the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Alive,
    /// Process lives but the heartbeat is older than the configured timeout.
    HeartbeatLost,
    /// Process exited with a non-zero code or without a prior graceful stop.
    Crashed,
}

/// Everything a launcher needs to start one session.
#[derive(Debug, Clone)]
pub struct StartSpec {
    pub job_id: JobId,
    pub paths: RunPaths,
    pub env: Vec<(String, String)>,
    /// Tool invocation; `${init_script}` expands to the bootstrap script.
    pub command_template: String,
    /// Batch submission wrapper; `${command}` expands to the rendered tool
    /// command. Ignored by the local launcher.
    pub batch_template: String,
    pub heartbeat_timeout: Duration,
    pub stop_grace: Duration,
}

/// Adapter for starting and supervising one tool session.
#[async_trait]
pub trait Launcher: Send + Sync + 'static {
    type Handle: Send + Sync + 'static;

    /// Short name recorded in the manifest ("local", "batch", …).
    fn name(&self) -> &'static str;

    /// Launch the tool with the init script from `scripts/`. Standard
    /// streams are captured under `session/`.
    async fn start(&self, spec: StartSpec) -> Result<Self::Handle, LaunchError>;

    /// Block until `session/ready` exists or the first heartbeat arrives.
    async fn wait_ready(&self, handle: &Self::Handle, timeout: Duration)
        -> Result<(), LaunchError>;

    /// Combined process-liveness and heartbeat-age check.
    async fn poll_health(&self, handle: &Self::Handle) -> Health;

    /// Write `session/stop`, allow a grace period, then terminate.
    async fn stop(&self, handle: &Self::Handle, reason: &str) -> Result<(), LaunchError>;
}
