// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Debug bundler.
//!
//! Assembles `debug_bundle/` on any failure: enough evidence for off-site
//! diagnosis even if the rest of the run directory is discarded. Every
//! input may be absent; the bundler includes what exists and records what
//! it could not find.

use sp_core::{Clock, ErrorClass, JobId, RunPaths};
use sp_protocol::{atomic_write, atomic_write_json, format_ts, load_json, Ack, BundleEntry, BundleIndex};
use std::path::Path;
use tracing::info;

use crate::error::EngineError;

/// Assemble the bundle and write `index.json`. Returns the index.
pub fn pack<C: Clock>(
    paths: &RunPaths,
    job_id: &JobId,
    error_type: ErrorClass,
    failure_summary: &str,
    contract: Option<&Path>,
    debug_hints: &[String],
    tail_lines: usize,
    clock: &C,
) -> Result<BundleIndex, EngineError> {
    let bundle_dir = paths.bundle_dir();
    std::fs::create_dir_all(&bundle_dir).map_err(sp_protocol::ProtocolError::Io)?;

    let mut index = BundleIndex::new(
        job_id.clone(),
        error_type,
        failure_summary.to_string(),
        format_ts(clock.epoch_ms()),
    );

    copy_artifact(&mut index, &paths.manifest(), &bundle_dir, "manifest", "job_manifest.json");

    tail_artifact(
        &mut index,
        &paths.timeline(),
        &bundle_dir,
        "timeline_tail",
        "timeline_tail.jsonl",
        tail_lines,
    );

    match last_failing_ack(paths) {
        Some(ack_path) => {
            copy_artifact(&mut index, &ack_path, &bundle_dir, "last_failing_ack", "last_failing_ack.json");
        }
        None => index.missing.push("last_failing_ack".to_string()),
    }

    tail_artifact(
        &mut index,
        &paths.tool_stdout_log(),
        &bundle_dir,
        "tool_stdout_tail",
        "innovus.stdout.tail.log",
        tail_lines,
    );
    tail_artifact(
        &mut index,
        &paths.tool_stderr_log(),
        &bundle_dir,
        "tool_stderr_tail",
        "innovus.stderr.tail.log",
        tail_lines,
    );
    tail_artifact(
        &mut index,
        &paths.supervisor_log(),
        &bundle_dir,
        "supervisor_log_tail",
        "supervisor.tail.log",
        tail_lines,
    );

    write_reports_inventory(&mut index, paths, &bundle_dir);

    match contract {
        Some(contract_path) => {
            copy_artifact(&mut index, contract_path, &bundle_dir, "contract", "contract.yaml");
        }
        None => index.missing.push("contract".to_string()),
    }

    index.next_actions = next_actions(error_type);
    index
        .next_actions
        .extend(debug_hints.iter().cloned());

    atomic_write_json(&paths.bundle_index(), &index)?;
    info!(
        job_id = %job_id,
        error_type = %error_type,
        included = index.included.len(),
        "debug bundle packed"
    );
    Ok(index)
}

fn copy_artifact(
    index: &mut BundleIndex,
    source: &Path,
    bundle_dir: &Path,
    kind: &str,
    name: &str,
) {
    if !source.is_file() {
        index.missing.push(kind.to_string());
        return;
    }
    match std::fs::copy(source, bundle_dir.join(name)) {
        Ok(_) => index.included.push(BundleEntry {
            kind: kind.to_string(),
            path: name.to_string(),
        }),
        Err(e) => {
            tracing::warn!(kind, error = %e, "bundle copy failed");
            index.missing.push(kind.to_string());
        }
    }
}

fn tail_artifact(
    index: &mut BundleIndex,
    source: &Path,
    bundle_dir: &Path,
    kind: &str,
    name: &str,
    tail_lines: usize,
) {
    let Some(tail) = tail_of(source, tail_lines) else {
        index.missing.push(kind.to_string());
        return;
    };
    match atomic_write(&bundle_dir.join(name), tail.as_bytes()) {
        Ok(()) => index.included.push(BundleEntry {
            kind: kind.to_string(),
            path: name.to_string(),
        }),
        Err(e) => {
            tracing::warn!(kind, error = %e, "bundle tail write failed");
            index.missing.push(kind.to_string());
        }
    }
}

/// Last `limit` lines of a file, lossily decoded. `None` when unreadable.
fn tail_of(path: &Path, limit: usize) -> Option<String> {
    let data = std::fs::read(path).ok()?;
    let text = String::from_utf8_lossy(&data);
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(limit);
    let mut tail = lines[skip..].join("\n");
    tail.push('\n');
    Some(tail)
}

/// The failing ack with the highest request id; ids embed the submission
/// sequence, so string order is submission order.
fn last_failing_ack(paths: &RunPaths) -> Option<std::path::PathBuf> {
    let entries = std::fs::read_dir(paths.ack_dir()).ok()?;
    let mut failing: Vec<std::path::PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter(|p| {
            load_json::<Ack>(p)
                .map(|ack| !ack.passed())
                .unwrap_or(false)
        })
        .collect();
    failing.sort();
    failing.pop()
}

fn write_reports_inventory(index: &mut BundleIndex, paths: &RunPaths, bundle_dir: &Path) {
    let mut inventory = Vec::new();
    if let Ok(entries) = std::fs::read_dir(paths.reports_dir()) {
        for entry in entries.flatten() {
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_file() {
                continue;
            }
            let mtime_ms = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            inventory.push(serde_json::json!({
                "path": format!("reports/{}", entry.file_name().to_string_lossy()),
                "size_bytes": meta.len(),
                "mtime_ms": mtime_ms,
            }));
        }
    }
    inventory.sort_by(|a, b| a["path"].as_str().cmp(&b["path"].as_str()));

    let body = match serde_json::to_vec_pretty(&inventory) {
        Ok(body) => body,
        Err(_) => return,
    };
    match atomic_write(&bundle_dir.join("reports_inventory.json"), &body) {
        Ok(()) => index.included.push(BundleEntry {
            kind: "reports_inventory".to_string(),
            path: "reports_inventory.json".to_string(),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "bundle inventory write failed");
            index.missing.push("reports_inventory".to_string());
        }
    }
}

fn next_actions(error_type: ErrorClass) -> Vec<String> {
    let action = match error_type {
        ErrorClass::LocatorFail => {
            "verify the database query and that the .enc.dat companion sits next to the descriptor"
        }
        ErrorClass::SessionStartFail => {
            "inspect supervisor.tail.log; check the tool installation and license availability"
        }
        ErrorClass::InnovusCrash => {
            "read innovus.stdout.tail.log and innovus.stderr.tail.log for crash signatures"
        }
        ErrorClass::HeartbeatLost => {
            "the session hung; look for a blocking dialog or license wait in innovus.stdout.tail.log"
        }
        ErrorClass::QueueTimeout => {
            "the session never acknowledged the request; raise timeout_s or check the bootstrap loop"
        }
        ErrorClass::RestoreFail => {
            "source the descriptor manually in an interactive session from its own directory"
        }
        ErrorClass::CmdFail => "re-run the failing script interactively; see last_failing_ack.json",
        ErrorClass::ContractInvalid => "fix contract.yaml; required outputs must stay under reports/",
        ErrorClass::OutputMissing | ErrorClass::OutputEmpty => {
            "compare reports_inventory.json with the contract's required_outputs"
        }
        ErrorClass::InternalError | ErrorClass::Ok => "inspect timeline_tail.jsonl",
    };
    vec![action.to_string()]
}

#[cfg(test)]
#[path = "bundle_tests.rs"]
mod tests;
