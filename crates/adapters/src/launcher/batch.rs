// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive batch-submission launcher.
//!
//! Renders the tool command, wraps it in the configured submission template
//! (e.g. `bsub -I ${command}`), and otherwise supervises the submission
//! process exactly like the local launcher. The control plane still flows
//! through the run directory, so the tool may execute on another host as
//! long as the filesystem is shared.

use async_trait::async_trait;
use sp_core::Clock;
use std::time::Duration;

use super::local::{LocalHandle, LocalLauncher};
use super::{Health, LaunchError, Launcher, StartSpec};

/// Submits the tool through a cluster front-end command.
#[derive(Clone)]
pub struct BatchLauncher<C: Clock> {
    inner: LocalLauncher<C>,
}

impl<C: Clock> BatchLauncher<C> {
    pub fn new(clock: C) -> Self {
        Self {
            inner: LocalLauncher::new(clock),
        }
    }
}

#[async_trait]
impl<C: Clock> Launcher for BatchLauncher<C> {
    type Handle = LocalHandle;

    fn name(&self) -> &'static str {
        "batch"
    }

    async fn start(&self, spec: StartSpec) -> Result<Self::Handle, LaunchError> {
        let init = spec.paths.bootstrap_script();
        let command = spec
            .command_template
            .replace("${init_script}", &init.display().to_string());
        let submission = spec.batch_template.replace("${command}", &command);
        let argv: Vec<String> = submission.split_whitespace().map(str::to_string).collect();
        if argv.is_empty() {
            return Err(LaunchError::CommandTemplate(spec.batch_template.clone()));
        }
        self.inner.start_command(spec, argv).await
    }

    async fn wait_ready(
        &self,
        handle: &Self::Handle,
        timeout: Duration,
    ) -> Result<(), LaunchError> {
        self.inner.wait_ready(handle, timeout).await
    }

    async fn poll_health(&self, handle: &Self::Handle) -> Health {
        self.inner.poll_health(handle).await
    }

    async fn stop(&self, handle: &Self::Handle, reason: &str) -> Result<(), LaunchError> {
        self.inner.stop(handle, reason).await
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
