// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-job manifest, `job_manifest.json`.
//!
//! Created early with `RUNNING`/`OK`, enriched as the locator and skill
//! loader learn things, rewritten atomically exactly once at termination.

use serde::{Deserialize, Serialize};
use sp_core::{ErrorClass, JobId};
use std::path::PathBuf;

use crate::SCHEMA_VERSION;

/// Terminal status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Running,
    Pass,
    Fail,
}

/// How the locator interpreted the user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorMode {
    ExplicitPath,
    NameScan,
}

/// Why a candidate was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionReason {
    DirectMatch,
    UniqueScanResult,
    UserSelected,
}

/// One locatable design database: descriptor plus companion data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Absolute path of the `.enc` descriptor.
    pub enc_path: PathBuf,
    /// Absolute path of the `.enc.dat` companion (file or directory).
    pub enc_dat_path: PathBuf,
    /// Descriptor modification time, epoch milliseconds.
    pub mtime_ms: u64,
    /// Descriptor size in bytes.
    pub size_bytes: u64,
}

/// Locator evidence recorded in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignDescriptor {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<LocatorMode>,
    /// Sorted candidate list, written as soon as known.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_reason: Option<SelectionReason>,
}

/// Identity of the Skill a job executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillIdentity {
    pub name: String,
    pub version: String,
    pub source_path: PathBuf,
    /// sha256 of the contract file.
    pub source_hash: String,
}

/// Runtime context for the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeContext {
    pub cwd: PathBuf,
    pub run_dir: PathBuf,
    pub launcher: String,
}

/// Pointers to the job's other artifacts, relative to the run directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactPointers {
    pub timeline: String,
    pub summary_json: String,
    pub summary_md: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_bundle: Option<String>,
}

impl Default for ArtifactPointers {
    fn default() -> Self {
        Self {
            timeline: "job_timeline.jsonl".to_string(),
            summary_json: "summary.json".to_string(),
            summary_md: "summary.md".to_string(),
            debug_bundle: None,
        }
    }
}

/// `job_manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: String,
    pub job_id: JobId,
    pub created_at: String,
    pub status: RunStatus,
    pub error_type: ErrorClass,
    pub context: RuntimeContext,
    pub design: DesignDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillIdentity>,
    #[serde(default)]
    pub artifacts: ArtifactPointers,
}

impl Manifest {
    /// A fresh `RUNNING`/`OK` manifest stub.
    pub fn running(
        job_id: JobId,
        created_at: String,
        context: RuntimeContext,
        query: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            job_id,
            created_at,
            status: RunStatus::Running,
            error_type: ErrorClass::Ok,
            context,
            design: DesignDescriptor {
                query: query.into(),
                ..DesignDescriptor::default()
            },
            skill: None,
            artifacts: ArtifactPointers::default(),
        }
    }

    /// Apply the terminal outcome. The bundle pointer is set only on failure.
    pub fn finalize(&mut self, status: RunStatus, error_type: ErrorClass) {
        self.status = status;
        self.error_type = error_type;
        if status == RunStatus::Fail {
            self.artifacts.debug_bundle = Some("debug_bundle".to_string());
        }
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
