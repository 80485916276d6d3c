// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests submitted into the tool session, `queue/<request_id>.json`.
//!
//! Write-once, atomic, kernel-owned. The `action` field is an enumeration
//! with a single member today; new actions extend the enum rather than the
//! file layout.

use serde::{Deserialize, Serialize};
use sp_core::{JobId, RequestId};

use crate::SCHEMA_VERSION;

/// What the queue processor should do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Source a Tcl script from the whitelisted `scripts/` directory.
    #[serde(rename = "SOURCE_TCL")]
    SourceTcl,
}

/// `queue/<request_id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub schema_version: String,
    pub request_id: RequestId,
    pub job_id: JobId,
    pub action: Action,
    /// Run-dir-relative script path; must begin with `scripts/`.
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_s: Option<u64>,
    pub created_at: String,
}

impl Request {
    pub fn source_tcl(
        request_id: RequestId,
        job_id: JobId,
        script: impl Into<String>,
        timeout_s: Option<u64>,
        created_at: String,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            request_id,
            job_id,
            action: Action::SourceTcl,
            script: script.into(),
            timeout_s,
            created_at,
        }
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
