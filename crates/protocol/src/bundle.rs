// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debug bundle index, `debug_bundle/index.json`.

use serde::{Deserialize, Serialize};
use sp_core::{ErrorClass, JobId};

use crate::SCHEMA_VERSION;

/// One artifact included in the bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleEntry {
    /// What the artifact is ("manifest", "timeline_tail", "last_failing_ack", …).
    pub kind: String,
    /// Path relative to `debug_bundle/`; always resolves to a file.
    pub path: String,
}

/// `debug_bundle/index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleIndex {
    pub schema_version: String,
    pub job_id: JobId,
    pub error_type: ErrorClass,
    /// 1-3 line human summary of the failure.
    pub summary: String,
    pub created_at: String,
    pub included: Vec<BundleEntry>,
    /// Artifacts the bundler looked for but could not include.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    pub next_actions: Vec<String>,
}

impl BundleIndex {
    pub fn new(job_id: JobId, error_type: ErrorClass, summary: String, created_at: String) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            job_id,
            error_type,
            summary,
            created_at,
            included: Vec::new(),
            missing: Vec::new(),
            next_actions: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
