// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared terminal rendering for job outcomes.

use sp_engine::JobOutcome;
use sp_protocol::{Candidate, RunStatus};

/// Render a terminal outcome and return the process exit code:
/// 0 = PASS, 1 = FAIL, 2 = needs selection.
pub fn render_outcome(outcome: &JobOutcome) -> i32 {
    match outcome {
        JobOutcome::Completed {
            job_id,
            run_dir,
            status,
            error_type,
        } => {
            let verdict = match status {
                RunStatus::Pass => "PASS",
                RunStatus::Fail => "FAIL",
                RunStatus::Running => "RUNNING",
            };
            println!("{job_id}: {verdict} ({error_type})");
            println!("  run dir: {}", run_dir.display());
            println!("  summary: {}", run_dir.join("summary.md").display());
            if *status == RunStatus::Fail {
                println!("  bundle:  {}", run_dir.join("debug_bundle").display());
                1
            } else {
                0
            }
        }
        JobOutcome::AwaitingSelection {
            job_id, candidates, ..
        } => {
            println!("{job_id}: several databases match; pick one and resume:");
            for (index, candidate) in candidates.iter().enumerate() {
                println!("  [{index}] {}", render_candidate(candidate));
            }
            println!("  resume with: sp resume {job_id} <index>");
            2
        }
    }
}

pub fn render_candidate(candidate: &Candidate) -> String {
    format!(
        "{} ({} bytes)",
        candidate.enc_path.display(),
        candidate.size_bytes
    )
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
