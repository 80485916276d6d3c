// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sp run <skill> --db <query>` - start a job

use anyhow::Result;
use clap::Args;
use sp_adapters::{BatchLauncher, LocalLauncher, Launcher};
use sp_core::{JobConfig, SystemClock, TimestampIdGen};
use sp_engine::{JobRequest, Orchestrator};
use std::path::Path;

use crate::output::render_outcome;

#[derive(Args)]
pub struct RunArgs {
    /// Skill to execute (directory name under .skillpilot/skills/)
    pub skill: String,

    /// Design database: explicit .enc path or a name to scan for
    #[arg(long = "db")]
    pub db: String,
}

pub async fn exec(cwd: &Path, args: RunArgs) -> Result<i32> {
    let request = JobRequest {
        cwd: cwd.to_owned(),
        query: args.db,
        skill: args.skill,
    };

    // The launcher plug point is configuration, not a flag: jobs must be
    // reproducible from the directory alone.
    let config = JobConfig::load(cwd)?;
    let outcome = match config.launcher.as_str() {
        "batch" => {
            let orch = orchestrator(BatchLauncher::new(SystemClock));
            orch.run_job(request).await?
        }
        _ => {
            let orch = orchestrator(LocalLauncher::new(SystemClock));
            orch.run_job(request).await?
        }
    };

    Ok(render_outcome(&outcome))
}

fn orchestrator<L: Launcher>(
    launcher: L,
) -> Orchestrator<L, SystemClock, TimestampIdGen<SystemClock>> {
    Orchestrator::new(launcher, SystemClock, TimestampIdGen::new(SystemClock))
}
