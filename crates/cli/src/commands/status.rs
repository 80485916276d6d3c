// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sp status <job_id>` - print the recorded result of a job

use anyhow::{bail, Result};
use clap::Args;
use sp_core::{JobId, RunPaths};
use sp_protocol::{load_json, Manifest, RunStatus, Summary};
use std::path::Path;

#[derive(Args)]
pub struct StatusArgs {
    /// Job to inspect
    pub job_id: String,
}

pub fn exec(cwd: &Path, args: StatusArgs) -> Result<i32> {
    let paths = RunPaths::new(cwd, &JobId::new(args.job_id.clone()));
    if !paths.manifest().is_file() {
        bail!("no such job: {}", args.job_id);
    }

    // The summary is terminal-only; fall back to the manifest while the
    // job is running or paused.
    if let Ok(summary) = load_json::<Summary>(&paths.summary_json()) {
        println!(
            "{}: {} ({})",
            summary.job_id,
            status_str(summary.status),
            summary.error_type
        );
        if let Some(metrics) = &summary.metrics {
            println!("  metrics: {metrics}");
        }
        for path in &summary.evidence {
            println!("  evidence: {path}");
        }
        return Ok(if summary.status == RunStatus::Pass { 0 } else { 1 });
    }

    let manifest: Manifest = load_json(&paths.manifest())?;
    println!(
        "{}: {} ({})",
        manifest.job_id,
        status_str(manifest.status),
        manifest.error_type
    );
    if manifest.design.candidates.len() > 1 && manifest.design.selected.is_none() {
        println!(
            "  awaiting selection among {} candidates",
            manifest.design.candidates.len()
        );
        return Ok(2);
    }
    Ok(0)
}

fn status_str(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Running => "RUNNING",
        RunStatus::Pass => "PASS",
        RunStatus::Fail => "FAIL",
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
