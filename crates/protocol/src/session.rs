// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor-owned session state, `session/state.json`.
//!
//! Rewritten atomically by the supervisor while the session lives and
//! finalized once the exit code is known; read-only afterwards.

use serde::{Deserialize, Serialize};
use sp_core::JobId;

use crate::SCHEMA_VERSION;

/// `session/state.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub schema_version: String,
    pub job_id: JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Last heartbeat the supervisor observed, epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_ms: Option<u64>,
}

impl SessionState {
    pub fn started(job_id: JobId, pid: Option<u32>, started_at: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            job_id,
            pid,
            started_at,
            exit_code: None,
            last_heartbeat_ms: None,
        }
    }

    /// Record the exit code; the state is final after this.
    pub fn finalize(&mut self, exit_code: Option<i32>) {
        self.exit_code = exit_code;
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
