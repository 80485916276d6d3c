// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-directory builder.
//!
//! Creates the fixed on-disk layout exactly once per job, writes the
//! `RUNNING` manifest stub and the opening `STATE_ENTER(INIT)` timeline
//! line. Re-using a job id is refused.

use sp_core::{Clock, JobConfig, JobId, JobState, RunPaths};
use sp_protocol::{
    atomic_write_json, format_ts, manifest::RuntimeContext, Manifest, Timeline, TimelineEvent,
};
use std::path::Path;
use tracing::info;

use crate::error::EngineError;

/// Freshly provisioned run directory, ready for the orchestrator.
#[derive(Debug)]
pub struct RunDir {
    pub paths: RunPaths,
    pub manifest: Manifest,
    pub timeline: Timeline,
}

/// Create `<cwd>/.skillpilot/runs/<job_id>/` and its fixed subdirectories.
pub fn create<C: Clock>(
    cwd: &Path,
    job_id: &JobId,
    query: &str,
    config: &JobConfig,
    clock: &C,
) -> Result<RunDir, EngineError> {
    let paths = RunPaths::new(cwd, job_id);

    std::fs::create_dir_all(RunPaths::runs_root(cwd)).map_err(sp_protocol::ProtocolError::Io)?;
    // create_dir (not create_dir_all) so an existing id is refused.
    if let Err(e) = std::fs::create_dir(paths.run_dir()) {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            return Err(EngineError::RunDirExists(job_id.clone()));
        }
        return Err(sp_protocol::ProtocolError::Io(e).into());
    }
    for sub in paths.subdirs() {
        std::fs::create_dir(&sub).map_err(sp_protocol::ProtocolError::Io)?;
    }

    let manifest = Manifest::running(
        job_id.clone(),
        format_ts(clock.epoch_ms()),
        RuntimeContext {
            cwd: cwd.to_owned(),
            run_dir: paths.run_dir().to_owned(),
            launcher: config.launcher.clone(),
        },
        query,
    );
    atomic_write_json(&paths.manifest(), &manifest)?;

    let mut timeline = Timeline::open(&paths.timeline())?;
    timeline.append(&TimelineEvent::state_enter(
        format_ts(clock.epoch_ms()),
        job_id.clone(),
        JobState::Init,
    ))?;

    info!(job_id = %job_id, run_dir = %paths.run_dir().display(), "run directory created");

    Ok(RunDir {
        paths,
        manifest,
        timeline,
    })
}

#[cfg(test)]
#[path = "rundir_tests.rs"]
mod tests;
