// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sp_core::{ErrorClass, JobId};
use std::path::PathBuf;

#[test]
fn exit_codes_follow_the_outcome() {
    let pass = JobOutcome::Completed {
        job_id: JobId::new("j"),
        run_dir: PathBuf::from("/tmp/run"),
        status: RunStatus::Pass,
        error_type: ErrorClass::Ok,
    };
    assert_eq!(render_outcome(&pass), 0);

    let fail = JobOutcome::Completed {
        job_id: JobId::new("j"),
        run_dir: PathBuf::from("/tmp/run"),
        status: RunStatus::Fail,
        error_type: ErrorClass::RestoreFail,
    };
    assert_eq!(render_outcome(&fail), 1);

    let pending = JobOutcome::AwaitingSelection {
        job_id: JobId::new("j"),
        run_dir: PathBuf::from("/tmp/run"),
        candidates: vec![],
    };
    assert_eq!(render_outcome(&pending), 2);
}

#[test]
fn candidate_line_shows_path_and_size() {
    let candidate = Candidate {
        enc_path: PathBuf::from("/work/b1/a.enc"),
        enc_dat_path: PathBuf::from("/work/b1/a.enc.dat"),
        mtime_ms: 0,
        size_bytes: 42,
    };
    assert_eq!(render_candidate(&candidate), "/work/b1/a.enc (42 bytes)");
}
