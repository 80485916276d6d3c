// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-directory layout.
//!
//! Every path under a run directory is produced here; the layout is part of
//! the external contract (bundlers, UIs, dashboards read these paths).

use crate::id::{JobId, RequestId};
use std::path::{Path, PathBuf};

/// Relative path of the scripts directory, the only whitelisted source
/// location for the tool.
pub const SCRIPTS_DIR: &str = "scripts";

/// Path map for one job's run directory.
#[derive(Debug, Clone)]
pub struct RunPaths {
    run_dir: PathBuf,
}

impl RunPaths {
    /// Root for all runs under a working directory.
    pub fn runs_root(cwd: &Path) -> PathBuf {
        cwd.join(".skillpilot").join("runs")
    }

    /// Path map for job `job_id` under `cwd`.
    pub fn new(cwd: &Path, job_id: &JobId) -> Self {
        Self {
            run_dir: Self::runs_root(cwd).join(job_id.as_str()),
        }
    }

    /// Path map for an already-known run directory.
    pub fn from_run_dir(run_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_dir: run_dir.into(),
        }
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    // --- fixed subdirectories ---

    pub fn scripts_dir(&self) -> PathBuf {
        self.run_dir.join(SCRIPTS_DIR)
    }

    pub fn queue_dir(&self) -> PathBuf {
        self.run_dir.join("queue")
    }

    pub fn ack_dir(&self) -> PathBuf {
        self.run_dir.join("ack")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.run_dir.join("reports")
    }

    pub fn session_dir(&self) -> PathBuf {
        self.run_dir.join("session")
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.run_dir.join("debug_bundle")
    }

    /// All subdirectories created by the run-directory builder.
    pub fn subdirs(&self) -> [PathBuf; 6] {
        [
            self.scripts_dir(),
            self.queue_dir(),
            self.ack_dir(),
            self.reports_dir(),
            self.session_dir(),
            self.bundle_dir(),
        ]
    }

    // --- orchestrator-owned files ---

    pub fn manifest(&self) -> PathBuf {
        self.run_dir.join("job_manifest.json")
    }

    pub fn timeline(&self) -> PathBuf {
        self.run_dir.join("job_timeline.jsonl")
    }

    pub fn summary_json(&self) -> PathBuf {
        self.run_dir.join("summary.json")
    }

    pub fn summary_md(&self) -> PathBuf {
        self.run_dir.join("summary.md")
    }

    // --- control plane ---

    pub fn request(&self, id: &RequestId) -> PathBuf {
        self.queue_dir().join(format!("{}.json", id))
    }

    pub fn ack(&self, id: &RequestId) -> PathBuf {
        self.ack_dir().join(format!("{}.json", id))
    }

    // --- session files ---

    pub fn heartbeat(&self) -> PathBuf {
        self.session_dir().join("heartbeat")
    }

    pub fn session_state(&self) -> PathBuf {
        self.session_dir().join("state.json")
    }

    pub fn ready_marker(&self) -> PathBuf {
        self.session_dir().join("ready")
    }

    pub fn stop_marker(&self) -> PathBuf {
        self.session_dir().join("stop")
    }

    pub fn tool_stdout_log(&self) -> PathBuf {
        self.session_dir().join("innovus.stdout.log")
    }

    pub fn tool_stderr_log(&self) -> PathBuf {
        self.session_dir().join("innovus.stderr.log")
    }

    pub fn supervisor_log(&self) -> PathBuf {
        self.session_dir().join("supervisor.log")
    }

    // --- scripts ---

    pub fn bootstrap_script(&self) -> PathBuf {
        self.scripts_dir().join("bootstrap.tcl")
    }

    pub fn restore_wrapper(&self) -> PathBuf {
        self.scripts_dir().join("restore_wrapper.tcl")
    }

    // --- bundle ---

    pub fn bundle_index(&self) -> PathBuf {
        self.bundle_dir().join("index.json")
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
