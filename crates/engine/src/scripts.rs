// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script rendering.
//!
//! Renders the queue-processor bootstrap, the restore wrapper, and a
//! Skill's packaged scripts into the run directory's `scripts/`, binding
//! the fixed `SP_*` variable surface. Substituted values are escaped for
//! Tcl double-quoted contexts.

use regex::Regex;
use sp_core::{JobId, RunPaths};
use sp_protocol::{atomic_write, Candidate, ProtocolError};
use sp_skill::SkillPackage;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

/// The queue processor shipped into every run directory.
const BOOTSTRAP_TEMPLATE: &str = include_str!("../templates/bootstrap.tcl");

/// Placeholder pattern: `${SP_NAME}`.
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
static VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(SP_[A-Z_]+)\}").expect("constant regex pattern is valid")
});

/// Errors rendering scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// The fixed variable surface injected into every rendered script.
#[derive(Debug, Clone)]
pub struct ScriptVars {
    pub run_dir: PathBuf,
    pub job_id: JobId,
    pub enc_path: PathBuf,
    pub enc_dat_path: PathBuf,
}

impl ScriptVars {
    pub fn new(paths: &RunPaths, job_id: &JobId, candidate: &Candidate) -> Self {
        Self {
            run_dir: paths.run_dir().to_owned(),
            job_id: job_id.clone(),
            enc_path: candidate.enc_path.clone(),
            enc_dat_path: candidate.enc_dat_path.clone(),
        }
    }

    fn to_map(&self, paths: &RunPaths) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("SP_RUN_DIR".into(), tcl_escape(&self.run_dir.display().to_string()));
        map.insert(
            "SP_SCRIPTS_DIR".into(),
            tcl_escape(&paths.scripts_dir().display().to_string()),
        );
        map.insert(
            "SP_REPORTS_DIR".into(),
            tcl_escape(&paths.reports_dir().display().to_string()),
        );
        map.insert("SP_JOB_ID".into(), tcl_escape(self.job_id.as_str()));
        map.insert("SP_ENC_PATH".into(), tcl_escape(&self.enc_path.display().to_string()));
        map.insert(
            "SP_ENC_DAT_PATH".into(),
            tcl_escape(&self.enc_dat_path.display().to_string()),
        );
        map
    }
}

/// Escape a value for substitution into a Tcl double-quoted string.
pub fn tcl_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '[' => out.push_str("\\["),
            ']' => out.push_str("\\]"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace `${SP_*}` placeholders from the map; unknown names are left
/// untouched so genuine Tcl `${...}` dereferences survive rendering.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    VAR_PATTERN
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Render `scripts/bootstrap.tcl`, the session init script.
pub fn render_bootstrap(paths: &RunPaths, vars: &ScriptVars) -> Result<(), ScriptError> {
    let rendered = interpolate(BOOTSTRAP_TEMPLATE, &vars.to_map(paths));
    atomic_write(&paths.bootstrap_script(), rendered.as_bytes())?;
    Ok(())
}

/// Render `scripts/restore_wrapper.tcl`.
///
/// The body is fixed across sites: change into the descriptor's own
/// directory, then source it. Many descriptors assume their directory as
/// the base for relative data references.
pub fn render_restore_wrapper(paths: &RunPaths, vars: &ScriptVars) -> Result<(), ScriptError> {
    let enc = tcl_escape(&vars.enc_path.display().to_string());
    let enc_dir = tcl_escape(
        &vars
            .enc_path
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .display()
            .to_string(),
    );
    let body = format!(
        "# Restore the design database. Descriptors resolve their data\n\
         # directory relative to their own location.\n\
         cd \"{enc_dir}\"\n\
         source \"{enc}\"\n"
    );
    atomic_write(&paths.restore_wrapper(), body.as_bytes())?;
    Ok(())
}

/// Render every script the Skill package ships, returning the run-dir
/// relative path of the entry script.
pub fn render_skill_scripts(
    paths: &RunPaths,
    package: &SkillPackage,
    vars: &ScriptVars,
) -> Result<String, ScriptError> {
    let map = vars.to_map(paths);
    for script in &package.contract.scripts {
        let source = package.script_path(script);
        let raw = std::fs::read_to_string(&source).map_err(|e| ScriptError::Io {
            path: source.display().to_string(),
            source: e,
        })?;
        let rendered = interpolate(&raw, &map);
        atomic_write(&paths.scripts_dir().join(script), rendered.as_bytes())?;
    }
    Ok(format!("scripts/{}", package.entry_script()))
}

#[cfg(test)]
#[path = "scripts_tests.rs"]
mod tests;
