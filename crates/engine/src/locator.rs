// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Design-database locator.
//!
//! Resolves a user query to a `.enc` descriptor plus its `.enc.dat`
//! companion. A query containing a path separator or ending in `.enc` is
//! an explicit path; anything else is a bounded recursive name scan.
//! Results are deterministic: candidates are sorted by path and ties never
//! consult timestamps.

use sp_protocol::{Candidate, LocatorMode, SelectionReason};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from database location; all classify as `LOCATOR_FAIL`.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("descriptor not found: {0}")]
    DescriptorMissing(PathBuf),
    #[error("companion data missing for {0}")]
    CompanionMissing(PathBuf),
    #[error("no database named {query}.enc found within depth {depth}")]
    NoMatch { query: String, depth: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Locator result: either a selected pair or a list the caller must pick
/// from.
#[derive(Debug, Clone)]
pub enum Located {
    Selected {
        mode: LocatorMode,
        reason: SelectionReason,
        candidate: Candidate,
    },
    NeedsSelection {
        mode: LocatorMode,
        candidates: Vec<Candidate>,
    },
}

/// Resolve `query` against `cwd`, scanning at most `max_depth` directory
/// levels below it in name-scan mode.
pub fn locate(cwd: &Path, query: &str, max_depth: usize) -> Result<Located, LocatorError> {
    if query.contains('/') || query.contains(std::path::MAIN_SEPARATOR) || query.ends_with(".enc")
    {
        let relative = if query.ends_with(".enc") {
            PathBuf::from(query)
        } else {
            PathBuf::from(format!("{query}.enc"))
        };
        let enc_path = cwd.join(relative);
        let candidate = candidate_for(&enc_path)?;
        debug!(enc = %candidate.enc_path.display(), "explicit path resolved");
        return Ok(Located::Selected {
            mode: LocatorMode::ExplicitPath,
            reason: SelectionReason::DirectMatch,
            candidate,
        });
    }

    let target = format!("{query}.enc");
    let mut hits = Vec::new();
    scan(cwd, &target, max_depth, &mut hits)?;
    hits.sort();

    if hits.is_empty() {
        return Err(LocatorError::NoMatch {
            query: query.to_string(),
            depth: max_depth,
        });
    }

    let mut candidates = Vec::new();
    for hit in &hits {
        match candidate_for(hit) {
            Ok(candidate) => candidates.push(candidate),
            Err(LocatorError::CompanionMissing(path)) => {
                debug!(enc = %path.display(), "hit without companion data, skipped");
            }
            Err(e) => return Err(e),
        }
    }

    match candidates.len() {
        0 => Err(LocatorError::CompanionMissing(hits.remove(0))),
        1 => Ok(Located::Selected {
            mode: LocatorMode::NameScan,
            reason: SelectionReason::UniqueScanResult,
            candidate: candidates.remove(0),
        }),
        _ => Ok(Located::NeedsSelection {
            mode: LocatorMode::NameScan,
            candidates,
        }),
    }
}

/// Build a candidate for a descriptor path, verifying descriptor and
/// companion both exist.
fn candidate_for(enc_path: &Path) -> Result<Candidate, LocatorError> {
    let meta = std::fs::metadata(enc_path)
        .map_err(|_| LocatorError::DescriptorMissing(enc_path.to_owned()))?;
    if !meta.is_file() {
        return Err(LocatorError::DescriptorMissing(enc_path.to_owned()));
    }

    let mut dat = enc_path.as_os_str().to_owned();
    dat.push(".dat");
    let enc_dat_path = PathBuf::from(dat);
    // The companion may be a flat file or a data directory.
    if !enc_dat_path.exists() {
        return Err(LocatorError::CompanionMissing(enc_path.to_owned()));
    }

    let mtime_ms = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    Ok(Candidate {
        enc_path: enc_path.to_owned(),
        enc_dat_path,
        mtime_ms,
        size_bytes: meta.len(),
    })
}

/// Collect files named `target` under `dir`. `remaining` is the number of
/// directory levels still allowed below this one; hidden directories and
/// the `.skillpilot` state directory are never entered.
fn scan(
    dir: &Path,
    target: &str,
    remaining: usize,
    hits: &mut Vec<PathBuf>,
) -> Result<(), LocatorError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        // Unreadable directories are skipped, not fatal.
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "scan skipping unreadable dir");
            return Ok(());
        }
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        let file_type = entry.file_type()?;
        if file_type.is_file() && name == target {
            hits.push(path);
        } else if file_type.is_dir() && remaining > 0 && !name.starts_with('.') {
            scan(&path, target, remaining - 1, hits)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
