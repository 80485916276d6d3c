// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// States a job moves through, in order. Any state may transition to `Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Init,
    PrepareRundir,
    LocateDb,
    StartSession,
    RestoreDb,
    RunSkill,
    ValidateOutputs,
    Summarize,
    Done,
    Fail,
}

impl JobState {
    /// The next state on the happy path. `None` for terminal states.
    pub fn next(&self) -> Option<JobState> {
        match self {
            JobState::Init => Some(JobState::PrepareRundir),
            JobState::PrepareRundir => Some(JobState::LocateDb),
            JobState::LocateDb => Some(JobState::StartSession),
            JobState::StartSession => Some(JobState::RestoreDb),
            JobState::RestoreDb => Some(JobState::RunSkill),
            JobState::RunSkill => Some(JobState::ValidateOutputs),
            JobState::ValidateOutputs => Some(JobState::Summarize),
            JobState::Summarize => Some(JobState::Done),
            JobState::Done | JobState::Fail => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Fail)
    }

    /// Whether a transition from `self` to `to` is legal: one step forward
    /// on the happy path, or a fall to `Fail` from any non-terminal state.
    pub fn can_transition(&self, to: JobState) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == JobState::Fail {
            return true;
        }
        self.next() == Some(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Init => "INIT",
            JobState::PrepareRundir => "PREPARE_RUNDIR",
            JobState::LocateDb => "LOCATE_DB",
            JobState::StartSession => "START_SESSION",
            JobState::RestoreDb => "RESTORE_DB",
            JobState::RunSkill => "RUN_SKILL",
            JobState::ValidateOutputs => "VALIDATE_OUTPUTS",
            JobState::Summarize => "SUMMARIZE",
            JobState::Done => "DONE",
            JobState::Fail => "FAIL",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
