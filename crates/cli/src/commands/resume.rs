// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sp resume <job_id> <index>` - resume a paused job

use anyhow::Result;
use clap::Args;
use sp_adapters::{BatchLauncher, LocalLauncher, Launcher};
use sp_core::{JobConfig, JobId, SystemClock, TimestampIdGen};
use sp_engine::Orchestrator;
use std::path::Path;

use crate::output::render_outcome;

#[derive(Args)]
pub struct ResumeArgs {
    /// Job to resume
    pub job_id: String,

    /// Zero-based index into the candidate list the run printed
    pub index: usize,
}

pub async fn exec(cwd: &Path, args: ResumeArgs) -> Result<i32> {
    let job_id = JobId::new(args.job_id);

    let config = JobConfig::load(cwd)?;
    let outcome = match config.launcher.as_str() {
        "batch" => {
            let orch = orchestrator(BatchLauncher::new(SystemClock));
            orch.resume_job(cwd, &job_id, args.index).await?
        }
        _ => {
            let orch = orchestrator(LocalLauncher::new(SystemClock));
            orch.resume_job(cwd, &job_id, args.index).await?
        }
    };

    Ok(render_outcome(&outcome))
}

fn orchestrator<L: Launcher>(
    launcher: L,
) -> Orchestrator<L, SystemClock, TimestampIdGen<SystemClock>> {
    Orchestrator::new(launcher, SystemClock, TimestampIdGen::new(SystemClock))
}
