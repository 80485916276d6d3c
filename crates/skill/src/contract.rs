// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill output contract, `contract.yaml`.
//!
//! The declarative half of a Skill: identity, scripts, required outputs,
//! and debug hints. Static validation rejects anything that could write or
//! read outside the run directory's `reports/` sandbox.

use serde::{Deserialize, Serialize};
use std::path::Component;
use std::path::Path;
use thiserror::Error;

/// Errors from contract parsing and static validation
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid contract yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("contract declares no required outputs")]
    NoRequiredOutputs,
    #[error("required output path is absolute: {0}")]
    AbsolutePath(String),
    #[error("required output path escapes the sandbox: {0}")]
    ParentTraversal(String),
    #[error("required output path must live under reports/: {0}")]
    OutsideReports(String),
    #[error("contract has no script entries")]
    NoScripts,
    #[error("entry script {0} is not listed in scripts")]
    UnknownEntry(String),
    #[error("script name escapes the package: {0}")]
    BadScriptName(String),
}

fn default_true() -> bool {
    true
}

/// One declared output the Skill must produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredOutput {
    /// Run-dir-relative path, e.g. `reports/summary_health.txt`.
    pub path: String,
    /// Optional glob overriding `path` for expansion, same sandbox rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glob: Option<String>,
    /// Zero-byte matches fail validation when set (the default).
    #[serde(default = "default_true")]
    pub non_empty: bool,
}

impl RequiredOutput {
    /// The pattern expanded at validation time.
    pub fn pattern(&self) -> &str {
        self.glob.as_deref().unwrap_or(&self.path)
    }
}

/// `contract.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub name: String,
    pub version: String,
    /// Script executed to run the Skill; must appear in `scripts`.
    pub entry: String,
    /// Scripts shipped with the package, rendered into `scripts/`.
    pub scripts: Vec<String>,
    pub required_outputs: Vec<RequiredOutput>,
    /// Free-form suggestions surfaced in the debug bundle on failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debug_hints: Vec<String>,
}

impl Contract {
    /// Parse and statically validate a contract document.
    pub fn parse(raw: &str) -> Result<Self, ContractError> {
        let contract: Contract = serde_yaml::from_str(raw)?;
        contract.validate()?;
        Ok(contract)
    }

    /// Static checks; violations classify the job `CONTRACT_INVALID`.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.scripts.is_empty() {
            return Err(ContractError::NoScripts);
        }
        if !self.scripts.iter().any(|s| s == &self.entry) {
            return Err(ContractError::UnknownEntry(self.entry.clone()));
        }
        for script in &self.scripts {
            let path = Path::new(script);
            if path.is_absolute()
                || path.components().any(|c| matches!(c, Component::ParentDir))
            {
                return Err(ContractError::BadScriptName(script.clone()));
            }
        }
        if self.required_outputs.is_empty() {
            return Err(ContractError::NoRequiredOutputs);
        }
        for output in &self.required_outputs {
            check_sandboxed(&output.path)?;
            if let Some(glob) = &output.glob {
                check_sandboxed(glob)?;
            }
        }
        Ok(())
    }
}

/// Reject absolute paths, `..` components, and paths outside `reports/`.
///
/// The `..` check is purely lexical: a pattern containing `..` is refused
/// even when its normalized form would land back inside the sandbox.
fn check_sandboxed(pattern: &str) -> Result<(), ContractError> {
    let path = Path::new(pattern);
    if path.is_absolute() || pattern.starts_with('/') {
        return Err(ContractError::AbsolutePath(pattern.to_string()));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ContractError::ParentTraversal(pattern.to_string()));
    }
    if !pattern.starts_with("reports/") {
        return Err(ContractError::OutsideReports(pattern.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "contract_tests.rs"]
mod tests;
