// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution kernel: request submission and ack collection.
//!
//! Submits requests by writing `queue/<request_id>.json` atomically with a
//! monotonic sequence, then waits for the matching ack by polling, bounded
//! by the per-request timeout and interruptible by the health watcher.
//! The kernel never retries and refuses to reuse a request id.

use sp_adapters::Health;
use sp_core::{Clock, JobConfig, JobId, JobState, RequestId, RunPaths};
use sp_protocol::{atomic_write_json, format_ts, load_json, Ack, Request, Timeline, TimelineEvent};
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

use crate::error::EngineError;

/// Per-job request submitter and ack waiter.
pub struct Kernel<C: Clock> {
    job_id: JobId,
    paths: RunPaths,
    clock: C,
    ack_poll_interval: Duration,
    seq: u32,
}

impl<C: Clock> Kernel<C> {
    pub fn new(job_id: JobId, paths: RunPaths, clock: C, config: &JobConfig) -> Self {
        Self {
            job_id,
            paths,
            clock,
            ack_poll_interval: config.ack_poll_interval,
            seq: 0,
        }
    }

    /// Write the next request into `queue/` and record the submission.
    pub fn submit(
        &mut self,
        timeline: &mut Timeline,
        state: JobState,
        tag: &str,
        script: &str,
        timeout: Duration,
    ) -> Result<RequestId, EngineError> {
        // Mirror of the queue processor's whitelist; a request that would be
        // refused in-session never leaves this side. The `..` check is
        // lexical on purpose.
        if !script.starts_with("scripts/") || script.contains("..") {
            return Err(EngineError::Internal(format!(
                "script path outside scripts/: {script}"
            )));
        }

        self.seq += 1;
        let request_id = RequestId::compose(&self.job_id, self.seq, tag);

        let path = self.paths.request(&request_id);
        if path.exists() {
            return Err(EngineError::DuplicateRequest(request_id));
        }

        let request = Request::source_tcl(
            request_id.clone(),
            self.job_id.clone(),
            script,
            Some(timeout.as_secs()),
            format_ts(self.clock.epoch_ms()),
        );
        atomic_write_json(&path, &request)?;

        info!(job_id = %self.job_id, request_id = %request_id, script, "request submitted");
        timeline.append(&TimelineEvent::action(
            format_ts(self.clock.epoch_ms()),
            self.job_id.clone(),
            state,
            "submit_request",
            Some(serde_json::json!({ "request_id": request_id, "script": script })),
        ))?;

        Ok(request_id)
    }

    /// Wait for `ack/<request_id>.json`, aborting on session failure.
    pub async fn wait_ack(
        &self,
        timeline: &mut Timeline,
        state: JobState,
        request_id: &RequestId,
        timeout: Duration,
        mut session_failure: watch::Receiver<Option<Health>>,
    ) -> Result<Ack, EngineError> {
        let deadline = self.clock.now() + timeout;
        let ack_path = self.paths.ack(request_id);

        loop {
            if ack_path.exists() {
                let ack: Ack = load_json(&ack_path)?;
                info!(
                    job_id = %self.job_id,
                    request_id = %request_id,
                    status = ?ack.status,
                    "ack received"
                );
                timeline.append(&TimelineEvent::action(
                    format_ts(self.clock.epoch_ms()),
                    self.job_id.clone(),
                    state,
                    "receive_ack",
                    Some(serde_json::json!({
                        "request_id": request_id,
                        "status": ack.status,
                        "error_type": ack.error_type,
                    })),
                ))?;
                return Ok(ack);
            }

            if let Some(health) = *session_failure.borrow() {
                return Err(EngineError::SessionFailed { health });
            }

            if self.clock.now() >= deadline {
                return Err(EngineError::AckTimeout {
                    request_id: request_id.clone(),
                    timeout_s: timeout.as_secs(),
                });
            }

            tokio::select! {
                _ = tokio::time::sleep(self.ack_poll_interval) => {}
                _ = session_failure.changed() => {}
            }
        }
    }

    /// Submit a script and wait for its ack; a failing ack becomes a
    /// classified error.
    pub async fn run_script(
        &mut self,
        timeline: &mut Timeline,
        state: JobState,
        tag: &str,
        script: &str,
        timeout: Duration,
        session_failure: watch::Receiver<Option<Health>>,
    ) -> Result<Ack, EngineError> {
        let request_id = self.submit(timeline, state, tag, script, timeout)?;
        let ack = self
            .wait_ack(timeline, state, &request_id, timeout, session_failure)
            .await?;

        if !ack.passed() {
            return Err(EngineError::ScriptFailed {
                script: script.to_string(),
                class: ack.error_type,
                message: ack.message.clone(),
            });
        }
        Ok(ack)
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
