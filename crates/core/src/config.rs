// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job configuration.
//!
//! All tunables flow in through an explicit `JobConfig` value; nothing reads
//! process-global state. Configuration is resolved once at job start from
//! built-in defaults plus an optional `.skillpilot/config.toml` overlay in
//! the working directory. Changes to the file mid-job have no effect.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors resolving the configuration overlay
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolved per-job configuration.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Heartbeat older than this is a lost session.
    pub heartbeat_timeout: Duration,
    /// Default wait for an ack; per-request overrides are allowed.
    pub ack_timeout: Duration,
    /// Wait for `session/ready` or the first heartbeat after launch.
    pub ready_timeout: Duration,
    /// Name-scan recursion depth (cwd itself is depth 0).
    pub scan_max_depth: usize,
    /// Line bound for log and timeline tails in the debug bundle.
    pub bundle_tail_lines: usize,
    /// Health watcher poll interval.
    pub health_poll_interval: Duration,
    /// Ack waiter poll interval.
    pub ack_poll_interval: Duration,
    /// Grace period between `session/stop` and hard termination.
    pub stop_grace: Duration,
    /// Launcher plug point: "local" or "batch".
    pub launcher: String,
    /// Tool invocation template; `${init_script}` expands to the bootstrap
    /// script path inside the run directory.
    pub command_template: String,
    /// Batch submission wrapper; `${command}` expands to the rendered tool
    /// command. Only consulted by the batch launcher.
    pub batch_template: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(30),
            ack_timeout: Duration::from_secs(120),
            ready_timeout: Duration::from_secs(120),
            scan_max_depth: 3,
            bundle_tail_lines: 2000,
            health_poll_interval: Duration::from_secs(1),
            ack_poll_interval: Duration::from_millis(100),
            stop_grace: Duration::from_secs(5),
            launcher: "local".to_string(),
            command_template: "innovus -no_gui -files ${init_script}".to_string(),
            batch_template: "bsub -I ${command}".to_string(),
        }
    }
}

/// Overlay file shape; every field optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    heartbeat_timeout_s: Option<u64>,
    ack_timeout_s: Option<u64>,
    ready_timeout_s: Option<u64>,
    scan_max_depth: Option<usize>,
    bundle_tail_lines: Option<usize>,
    health_poll_interval_ms: Option<u64>,
    ack_poll_interval_ms: Option<u64>,
    stop_grace_s: Option<u64>,
    launcher: Option<String>,
    command_template: Option<String>,
    batch_template: Option<String>,
}

impl JobConfig {
    /// Resolve configuration for a job rooted at `cwd`.
    ///
    /// Reads `<cwd>/.skillpilot/config.toml` when present; a missing file is
    /// not an error, a malformed one is.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let path = cwd.join(".skillpilot").join("config.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let overlay: ConfigOverlay =
            toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: display,
                source,
            })?;
        Ok(Self::default().apply(overlay))
    }

    fn apply(mut self, overlay: ConfigOverlay) -> Self {
        if let Some(s) = overlay.heartbeat_timeout_s {
            self.heartbeat_timeout = Duration::from_secs(s);
        }
        if let Some(s) = overlay.ack_timeout_s {
            self.ack_timeout = Duration::from_secs(s);
        }
        if let Some(s) = overlay.ready_timeout_s {
            self.ready_timeout = Duration::from_secs(s);
        }
        if let Some(d) = overlay.scan_max_depth {
            self.scan_max_depth = d;
        }
        if let Some(n) = overlay.bundle_tail_lines {
            self.bundle_tail_lines = n;
        }
        if let Some(ms) = overlay.health_poll_interval_ms {
            self.health_poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = overlay.ack_poll_interval_ms {
            self.ack_poll_interval = Duration::from_millis(ms);
        }
        if let Some(s) = overlay.stop_grace_s {
            self.stop_grace = Duration::from_secs(s);
        }
        if let Some(l) = overlay.launcher {
            self.launcher = l;
        }
        if let Some(t) = overlay.command_template {
            self.command_template = t;
        }
        if let Some(t) = overlay.batch_template {
            self.batch_template = t;
        }
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
