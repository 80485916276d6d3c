// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Closed failure-classification taxonomy.
//!
//! Every terminal job carries exactly one of these values. When more than
//! one condition could apply, the highest-priority class wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification assigned to a job at termination.
///
/// `Ok` is carried by running and passed jobs; every other variant marks a
/// failed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    Ok,
    LocatorFail,
    SessionStartFail,
    InnovusCrash,
    HeartbeatLost,
    QueueTimeout,
    RestoreFail,
    CmdFail,
    ContractInvalid,
    OutputMissing,
    OutputEmpty,
    InternalError,
}

impl ErrorClass {
    pub fn is_ok(&self) -> bool {
        matches!(self, ErrorClass::Ok)
    }

    /// Priority rank used when multiple conditions could apply.
    ///
    /// Lower rank wins. `Ok` never competes and sorts last.
    pub fn priority(&self) -> u8 {
        match self {
            ErrorClass::ContractInvalid => 0,
            ErrorClass::LocatorFail => 1,
            ErrorClass::SessionStartFail => 2,
            ErrorClass::InnovusCrash => 3,
            ErrorClass::HeartbeatLost => 4,
            ErrorClass::QueueTimeout => 5,
            ErrorClass::RestoreFail => 6,
            ErrorClass::CmdFail => 7,
            ErrorClass::OutputMissing => 8,
            ErrorClass::OutputEmpty => 9,
            ErrorClass::InternalError => 10,
            ErrorClass::Ok => u8::MAX,
        }
    }

    /// Pick the class that takes precedence between two candidates.
    pub fn prioritize(self, other: ErrorClass) -> ErrorClass {
        if other.priority() < self.priority() {
            other
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Ok => "OK",
            ErrorClass::LocatorFail => "LOCATOR_FAIL",
            ErrorClass::SessionStartFail => "SESSION_START_FAIL",
            ErrorClass::InnovusCrash => "INNOVUS_CRASH",
            ErrorClass::HeartbeatLost => "HEARTBEAT_LOST",
            ErrorClass::QueueTimeout => "QUEUE_TIMEOUT",
            ErrorClass::RestoreFail => "RESTORE_FAIL",
            ErrorClass::CmdFail => "CMD_FAIL",
            ErrorClass::ContractInvalid => "CONTRACT_INVALID",
            ErrorClass::OutputMissing => "OUTPUT_MISSING",
            ErrorClass::OutputEmpty => "OUTPUT_EMPTY",
            ErrorClass::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Parse the wire form produced by `as_str`.
    pub fn parse(s: &str) -> Option<ErrorClass> {
        match s {
            "OK" => Some(ErrorClass::Ok),
            "LOCATOR_FAIL" => Some(ErrorClass::LocatorFail),
            "SESSION_START_FAIL" => Some(ErrorClass::SessionStartFail),
            "INNOVUS_CRASH" => Some(ErrorClass::InnovusCrash),
            "HEARTBEAT_LOST" => Some(ErrorClass::HeartbeatLost),
            "QUEUE_TIMEOUT" => Some(ErrorClass::QueueTimeout),
            "RESTORE_FAIL" => Some(ErrorClass::RestoreFail),
            "CMD_FAIL" => Some(ErrorClass::CmdFail),
            "CONTRACT_INVALID" => Some(ErrorClass::ContractInvalid),
            "OUTPUT_MISSING" => Some(ErrorClass::OutputMissing),
            "OUTPUT_EMPTY" => Some(ErrorClass::OutputEmpty),
            "INTERNAL_ERROR" => Some(ErrorClass::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "error_class_tests.rs"]
mod tests;
