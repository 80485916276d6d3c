// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Acknowledgements written by the queue processor, `ack/<request_id>.json`.
//!
//! Write-once, atomic. At most one ack exists per request id, and it
//! appears only after the request file.

use serde::{Deserialize, Serialize};
use sp_core::{ErrorClass, JobId, RequestId};

/// Outcome of one executed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AckStatus {
    Pass,
    Fail,
}

/// `ack/<request_id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub schema_version: String,
    pub request_id: RequestId,
    pub job_id: JobId,
    pub status: AckStatus,
    pub error_type: ErrorClass,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Run-dir-relative pointers to evidence (logs, partial reports).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence_paths: Vec<String>,
}

impl Ack {
    pub fn passed(&self) -> bool {
        self.status == AckStatus::Pass
    }
}

#[cfg(test)]
#[path = "ack_tests.rs"]
mod tests;
