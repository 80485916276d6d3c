// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file writes and schema-checked loads.
//!
//! Writes go to a temporary file in the destination directory, are synced,
//! then renamed into place. A crash mid-write leaves at worst a stale
//! `.tmp` file; readers see either the old content or the new, never a
//! partial record.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::SCHEMA_VERSION;

/// Errors from protocol I/O
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported schema version {found:?} in {path}")]
    SchemaVersion { path: String, found: String },
    #[error("record missing schema_version in {path}")]
    MissingSchemaVersion { path: String },
}

/// Write `bytes` to `path` atomically (same-directory tmp, sync, rename).
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), ProtocolError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");

    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Serialize `record` as pretty JSON and write it atomically.
pub fn atomic_write_json<T: Serialize>(path: &Path, record: &T) -> Result<(), ProtocolError> {
    let mut bytes = serde_json::to_vec_pretty(record)?;
    bytes.push(b'\n');
    atomic_write(path, &bytes)
}

/// Load a schema-versioned JSON record.
///
/// The raw document's `schema_version` field is checked before the typed
/// parse so an unknown version is reported as such rather than as a shape
/// mismatch.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ProtocolError> {
    let raw = fs::read(path)?;
    let value: serde_json::Value = serde_json::from_slice(&raw)?;

    match value.get("schema_version").and_then(|v| v.as_str()) {
        None => {
            return Err(ProtocolError::MissingSchemaVersion {
                path: path.display().to_string(),
            })
        }
        Some(found) if found != SCHEMA_VERSION => {
            return Err(ProtocolError::SchemaVersion {
                path: path.display().to_string(),
                found: found.to_string(),
            })
        }
        Some(_) => {}
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
