// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal summary records, `summary.json`.

use serde::{Deserialize, Serialize};
use sp_core::{ErrorClass, JobId};

use crate::manifest::RunStatus;
use crate::SCHEMA_VERSION;

/// `summary.json`: the machine-readable terminal result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub schema_version: String,
    pub job_id: JobId,
    pub status: RunStatus,
    pub error_type: ErrorClass,
    pub created_at: String,
    /// Metrics the Skill chose to publish (`reports/metrics.json`), verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Value>,
    /// Run-dir-relative evidence pointers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

impl Summary {
    pub fn new(
        job_id: JobId,
        status: RunStatus,
        error_type: ErrorClass,
        created_at: String,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            job_id,
            status,
            error_type,
            created_at,
            metrics: None,
            evidence: Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
