// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill package loading.
//!
//! A package is a directory holding `contract.yaml` plus the Tcl scripts
//! the contract lists. Named skills live under `.skillpilot/skills/<name>/`
//! in the working directory.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::contract::{Contract, ContractError};

/// A loaded, statically valid Skill package.
#[derive(Debug, Clone)]
pub struct SkillPackage {
    pub contract: Contract,
    /// Package directory holding the contract and scripts.
    pub root: PathBuf,
    /// sha256 of the raw contract document.
    pub contract_hash: String,
}

impl SkillPackage {
    /// Load the named skill from `<cwd>/.skillpilot/skills/<name>/`.
    pub fn load_named(cwd: &Path, name: &str) -> Result<Self, ContractError> {
        Self::load_dir(&cwd.join(".skillpilot").join("skills").join(name))
    }

    /// Load a package from an explicit directory.
    pub fn load_dir(root: &Path) -> Result<Self, ContractError> {
        let contract_path = root.join("contract.yaml");
        let raw = std::fs::read_to_string(&contract_path).map_err(|source| ContractError::Io {
            path: contract_path.display().to_string(),
            source,
        })?;
        let contract = Contract::parse(&raw)?;

        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        let contract_hash = format!("{:x}", hasher.finalize());

        for script in &contract.scripts {
            let path = root.join(script);
            if !path.is_file() {
                return Err(ContractError::Io {
                    path: path.display().to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "script listed in contract not found in package",
                    ),
                });
            }
        }

        Ok(Self {
            contract,
            root: root.to_owned(),
            contract_hash,
        })
    }

    pub fn name(&self) -> &str {
        &self.contract.name
    }

    pub fn version(&self) -> &str {
        &self.contract.version
    }

    pub fn contract_path(&self) -> PathBuf {
        self.root.join("contract.yaml")
    }

    /// Absolute path of a packaged script.
    pub fn script_path(&self, script: &str) -> PathBuf {
        self.root.join(script)
    }

    pub fn entry_script(&self) -> &str {
        &self.contract.entry
    }
}

#[cfg(test)]
#[path = "package_tests.rs"]
mod tests;
