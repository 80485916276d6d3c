// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sp list` - enumerate jobs under this directory

use anyhow::Result;
use clap::Args;
use sp_core::RunPaths;
use sp_protocol::{load_json, Manifest, RunStatus};
use std::path::Path;

#[derive(Args)]
pub struct ListArgs {
    /// Show at most this many jobs, newest first
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

pub fn exec(cwd: &Path, args: ListArgs) -> Result<i32> {
    for line in collect_lines(cwd, args.limit) {
        println!("{line}");
    }
    Ok(0)
}

/// One line per job, newest first. Job ids embed the creation timestamp,
/// so reverse name order is reverse creation order.
pub fn collect_lines(cwd: &Path, limit: usize) -> Vec<String> {
    let root = RunPaths::runs_root(cwd);
    let Ok(entries) = std::fs::read_dir(&root) else {
        return vec![format!("no runs under {}", root.display())];
    };

    let mut dirs: Vec<_> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs.reverse();

    let mut lines = Vec::new();
    for dir in dirs.into_iter().take(limit) {
        let paths = RunPaths::from_run_dir(&dir);
        match load_json::<Manifest>(&paths.manifest()) {
            Ok(manifest) => {
                let status = match manifest.status {
                    RunStatus::Running => "RUNNING",
                    RunStatus::Pass => "PASS",
                    RunStatus::Fail => "FAIL",
                };
                let skill = manifest
                    .skill
                    .as_ref()
                    .map(|s| s.name.as_str())
                    .unwrap_or("-");
                lines.push(format!(
                    "{}  {:7}  {:14}  {}",
                    manifest.job_id,
                    status,
                    manifest.error_type.as_str(),
                    skill
                ));
            }
            Err(_) => {
                lines.push(format!(
                    "{}  (unreadable manifest)",
                    dir.file_name().unwrap_or_default().to_string_lossy()
                ));
            }
        }
    }
    if lines.is_empty() {
        lines.push("no runs yet".to_string());
    }
    lines
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
