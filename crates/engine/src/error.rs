// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types and their failure classification.

use sp_adapters::{Health, LaunchError};
use sp_core::{ConfigError, ErrorClass, JobId, RequestId};
use sp_protocol::ProtocolError;
use sp_skill::ContractError;
use thiserror::Error;

use crate::locator::LocatorError;

/// Errors that can occur while driving a job
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("locator error: {0}")]
    Locator(#[from] LocatorError),
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
    #[error("launch error: {0}")]
    Launch(#[from] LaunchError),
    #[error("script rendering error: {0}")]
    Script(#[from] crate::scripts::ScriptError),
    #[error("no ack for {request_id} within {timeout_s}s")]
    AckTimeout {
        request_id: RequestId,
        timeout_s: u64,
    },
    #[error("session failed while waiting: {health:?}")]
    SessionFailed { health: Health },
    #[error("script {script} failed: {message}")]
    ScriptFailed {
        script: String,
        class: ErrorClass,
        message: String,
    },
    #[error("required outputs not satisfied ({class}): {detail}")]
    Outputs { class: ErrorClass, detail: String },
    #[error("run directory for job {0} already exists")]
    RunDirExists(JobId),
    #[error("request id {0} was already submitted")]
    DuplicateRequest(RequestId),
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Map to the closed classification taxonomy. Anything that matches
    /// nothing else is `INTERNAL_ERROR`.
    pub fn classify(&self) -> ErrorClass {
        match self {
            EngineError::Locator(_) => ErrorClass::LocatorFail,
            EngineError::Contract(_) => ErrorClass::ContractInvalid,
            EngineError::Launch(_) => ErrorClass::SessionStartFail,
            EngineError::AckTimeout { .. } => ErrorClass::QueueTimeout,
            EngineError::SessionFailed { health } => match health {
                Health::Crashed => ErrorClass::InnovusCrash,
                Health::HeartbeatLost => ErrorClass::HeartbeatLost,
                Health::Alive => ErrorClass::InternalError,
            },
            EngineError::ScriptFailed { class, .. } => {
                // The queue processor only ever reports these three; anything
                // else in an ack is a protocol breach.
                match class {
                    ErrorClass::RestoreFail | ErrorClass::CmdFail => *class,
                    _ => ErrorClass::InternalError,
                }
            }
            EngineError::Outputs { class, .. } => *class,
            EngineError::Config(_)
            | EngineError::Protocol(_)
            | EngineError::Script(_)
            | EngineError::RunDirExists(_)
            | EngineError::DuplicateRequest(_)
            | EngineError::Internal(_) => ErrorClass::InternalError,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
