// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal summary emission: `summary.json` and `summary.md`.

use sp_core::{Clock, ErrorClass, JobId, RunPaths};
use sp_protocol::{atomic_write, atomic_write_json, format_ts, RunStatus, Summary};
use tracing::debug;

use crate::error::EngineError;

/// Compose and write both summaries for a terminal job.
pub fn write_summaries<C: Clock>(
    paths: &RunPaths,
    job_id: &JobId,
    status: RunStatus,
    error_type: ErrorClass,
    clock: &C,
) -> Result<Summary, EngineError> {
    let mut summary = Summary::new(
        job_id.clone(),
        status,
        error_type,
        format_ts(clock.epoch_ms()),
    );

    // Metrics are whatever the Skill chose to publish.
    let metrics_path = paths.reports_dir().join("metrics.json");
    if let Ok(raw) = std::fs::read(&metrics_path) {
        match serde_json::from_slice(&raw) {
            Ok(value) => summary.metrics = Some(value),
            Err(e) => debug!(error = %e, "reports/metrics.json is not valid JSON, skipped"),
        }
    }

    summary.evidence = report_files(paths);
    if status == RunStatus::Fail {
        summary.evidence.push("debug_bundle/index.json".to_string());
    }

    atomic_write_json(&paths.summary_json(), &summary)?;
    atomic_write(&paths.summary_md(), render_markdown(&summary).as_bytes())?;
    Ok(summary)
}

/// Run-dir-relative list of files under `reports/`, sorted.
fn report_files(paths: &RunPaths) -> Vec<String> {
    let mut files = Vec::new();
    let root = paths.reports_dir();
    if let Ok(entries) = std::fs::read_dir(&root) {
        for entry in entries.flatten() {
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                files.push(format!("reports/{}", entry.file_name().to_string_lossy()));
            }
        }
    }
    files.sort();
    files
}

fn render_markdown(summary: &Summary) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Job {}\n\n", summary.job_id));
    let status = match summary.status {
        RunStatus::Pass => "PASS",
        RunStatus::Fail => "FAIL",
        RunStatus::Running => "RUNNING",
    };
    md.push_str(&format!("**Status:** {status}\n\n"));
    md.push_str(&format!("**Classification:** {}\n\n", summary.error_type));

    if let Some(metrics) = summary.metrics.as_ref().and_then(|m| m.as_object()) {
        md.push_str("## Metrics\n\n");
        md.push_str("| metric | value |\n|---|---|\n");
        for (key, value) in metrics {
            md.push_str(&format!("| {key} | {value} |\n"));
        }
        md.push('\n');
    }

    if !summary.evidence.is_empty() {
        md.push_str("## Evidence\n\n");
        for path in &summary.evidence {
            md.push_str(&format!("- `{path}`\n"));
        }
        md.push('\n');
    }

    if summary.status == RunStatus::Fail {
        md.push_str("The `debug_bundle/` directory is self-contained evidence for off-site diagnosis.\n");
    }
    md
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
