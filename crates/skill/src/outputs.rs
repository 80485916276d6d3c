// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-execution validation of a Skill's declared outputs.
//!
//! Expands each required pattern under the run directory, keeps only
//! matches whose canonical path stays under `reports/`, and classifies the
//! first mismatch. All mismatches are retained for the bundle inventory.

use sp_core::ErrorClass;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::contract::Contract;

/// Why one required entry failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFailure {
    /// The pattern matched nothing.
    Missing,
    /// A match exists but is zero bytes and the entry demands content.
    Empty { path: PathBuf },
}

impl OutputFailure {
    pub fn class(&self) -> ErrorClass {
        match self {
            OutputFailure::Missing => ErrorClass::OutputMissing,
            OutputFailure::Empty { .. } => ErrorClass::OutputEmpty,
        }
    }
}

/// Validation result for one required entry.
#[derive(Debug, Clone)]
pub struct OutputCheck {
    pub pattern: String,
    pub matches: Vec<PathBuf>,
    pub failure: Option<OutputFailure>,
}

/// Full validation report across the contract.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub checks: Vec<OutputCheck>,
}

impl OutputReport {
    /// The classification of the first failing entry, if any.
    pub fn first_failure(&self) -> Option<ErrorClass> {
        self.checks
            .iter()
            .find_map(|c| c.failure.as_ref().map(OutputFailure::class))
    }

    pub fn passed(&self) -> bool {
        self.first_failure().is_none()
    }
}

/// Validate every required output of `contract` against `run_dir`.
pub fn validate_outputs(run_dir: &Path, contract: &Contract) -> OutputReport {
    let reports_root = run_dir.join("reports");
    let canonical_root = reports_root.canonicalize().ok();

    let mut report = OutputReport::default();
    for output in &contract.required_outputs {
        let pattern = output.pattern();
        let matches = expand(run_dir, pattern, canonical_root.as_deref());

        let failure = if matches.is_empty() {
            Some(OutputFailure::Missing)
        } else if output.non_empty {
            matches
                .iter()
                .find(|path| {
                    std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true)
                })
                .map(|path| OutputFailure::Empty { path: path.clone() })
        } else {
            None
        };

        report.checks.push(OutputCheck {
            pattern: pattern.to_string(),
            matches,
            failure,
        });
    }
    report
}

/// Expand `pattern` relative to `run_dir`, keeping files whose canonical
/// path stays under the canonical `reports/` root. A symlink pointing out
/// of the sandbox does not count as a produced output.
fn expand(run_dir: &Path, pattern: &str, canonical_root: Option<&Path>) -> Vec<PathBuf> {
    let absolute = run_dir.join(pattern);
    let Some(pattern_str) = absolute.to_str() else {
        warn!(pattern, "non-utf8 output pattern, treating as no match");
        return Vec::new();
    };

    let entries = match glob::glob(pattern_str) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(pattern, error = %e, "invalid output pattern, treating as no match");
            return Vec::new();
        }
    };

    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!(pattern, error = %e, "unreadable match skipped");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        match (path.canonicalize(), canonical_root) {
            (Ok(real), Some(root)) if real.starts_with(root) => matches.push(path),
            (Ok(_), Some(_)) => {
                warn!(pattern, path = %path.display(), "match escapes reports/, ignored");
            }
            (Ok(_), None) | (Err(_), _) => {
                warn!(pattern, path = %path.display(), "match not resolvable, ignored");
            }
        }
    }
    matches.sort();
    matches
}

#[cfg(test)]
#[path = "outputs_tests.rs"]
mod tests;
