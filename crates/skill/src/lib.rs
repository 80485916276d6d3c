// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sp-skill: Skill packages and their output contracts.
//!
//! A Skill is a directory of Tcl scripts plus a `contract.yaml` declaring
//! which files the scripts must leave under the run directory's `reports/`.
//! This crate parses and statically validates the declaration, loads
//! packages from `.skillpilot/skills/`, and checks produced outputs after
//! execution.

pub mod contract;
pub mod outputs;
pub mod package;

pub use contract::{Contract, ContractError, RequiredOutput};
pub use outputs::{validate_outputs, OutputCheck, OutputFailure, OutputReport};
pub use package::SkillPackage;
