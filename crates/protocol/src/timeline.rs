// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only JSONL job timeline.
//!
//! One writer per job (the orchestrator). Each line is a complete JSON
//! record; a line is durable before `append` returns.

use serde::{Deserialize, Serialize};
use sp_core::{JobId, JobState};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::atomic::ProtocolError;

/// Severity of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// Kind of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    StateEnter,
    StateExit,
    Action,
    Done,
    Fail,
}

/// One timeline line: `{ts, job_id, level, event, state?, message?, data?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub ts: String,
    pub job_id: JobId,
    pub level: EventLevel,
    pub event: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TimelineEvent {
    pub fn state_enter(ts: String, job_id: JobId, state: JobState) -> Self {
        Self {
            ts,
            job_id,
            level: EventLevel::Info,
            event: EventKind::StateEnter,
            state: Some(state),
            message: None,
            data: None,
        }
    }

    pub fn state_exit(ts: String, job_id: JobId, state: JobState) -> Self {
        Self {
            ts,
            job_id,
            level: EventLevel::Info,
            event: EventKind::StateExit,
            state: Some(state),
            message: None,
            data: None,
        }
    }

    /// An `ACTION` line for one external step (`locate_db`, `submit_request`, …).
    pub fn action(
        ts: String,
        job_id: JobId,
        state: JobState,
        action: &str,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            ts,
            job_id,
            level: EventLevel::Info,
            event: EventKind::Action,
            state: Some(state),
            message: Some(action.to_string()),
            data,
        }
    }

    pub fn done(ts: String, job_id: JobId) -> Self {
        Self {
            ts,
            job_id,
            level: EventLevel::Info,
            event: EventKind::Done,
            state: Some(JobState::Done),
            message: None,
            data: None,
        }
    }

    pub fn fail(ts: String, job_id: JobId, message: String, data: Option<serde_json::Value>) -> Self {
        Self {
            ts,
            job_id,
            level: EventLevel::Error,
            event: EventKind::Fail,
            state: Some(JobState::Fail),
            message: Some(message),
            data,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.event, EventKind::Done | EventKind::Fail)
    }
}

/// Single-writer append handle for `job_timeline.jsonl`.
#[derive(Debug)]
pub struct Timeline {
    file: File,
    path: PathBuf,
}

impl Timeline {
    /// Open (or create) the timeline for appending.
    pub fn open(path: &Path) -> Result<Self, ProtocolError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_owned(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event as a single JSON line and sync it.
    pub fn append(&mut self, event: &TimelineEvent) -> Result<(), ProtocolError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_all()?;
        Ok(())
    }
}

/// Read every parseable event from a timeline file.
///
/// Corrupt lines are skipped with a warning so a torn tail never hides the
/// events before it.
pub fn read_events(path: &Path) -> Result<Vec<TimelineEvent>, ProtocolError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => warn!(
                path = %path.display(),
                line = idx + 1,
                error = %e,
                "skipping corrupt timeline line",
            ),
        }
    }

    Ok(events)
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
