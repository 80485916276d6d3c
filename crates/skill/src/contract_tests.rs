// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

const VALID: &str = r#"
name: summary_health
version: "1.0"
entry: run.tcl
scripts:
  - run.tcl
required_outputs:
  - path: reports/summary_health.txt
  - path: reports/timing_health.txt
    non_empty: false
debug_hints:
  - check the timing corner setup if timing_health.txt is empty
"#;

#[test]
fn parses_a_valid_contract() {
    let contract = Contract::parse(VALID).unwrap();
    assert_eq!(contract.name, "summary_health");
    assert_eq!(contract.required_outputs.len(), 2);
    assert!(contract.required_outputs[0].non_empty);
    assert!(!contract.required_outputs[1].non_empty);
    assert_eq!(contract.debug_hints.len(), 1);
}

#[test]
fn non_empty_defaults_to_true() {
    let contract = Contract::parse(VALID).unwrap();
    assert!(contract.required_outputs[0].non_empty);
}

#[test]
fn glob_overrides_path_as_pattern() {
    let raw = r#"
name: drc
version: "0.2"
entry: run.tcl
scripts: [run.tcl]
required_outputs:
  - path: reports/drc.rpt
    glob: "reports/drc*.rpt"
"#;
    let contract = Contract::parse(raw).unwrap();
    assert_eq!(contract.required_outputs[0].pattern(), "reports/drc*.rpt");
}

#[test]
fn zero_required_outputs_is_invalid() {
    let raw = r#"
name: empty
version: "1.0"
entry: run.tcl
scripts: [run.tcl]
required_outputs: []
"#;
    let err = Contract::parse(raw).unwrap_err();
    assert!(matches!(err, ContractError::NoRequiredOutputs));
}

#[parameterized(
    absolute = { "/etc/passwd", "absolute" },
    traversal = { "reports/../secrets.txt", "traversal" },
    outside = { "session/state.json", "outside" },
)]
fn sandbox_violations_are_rejected(path: &str, kind: &str) {
    let raw = format!(
        "name: bad\nversion: \"1.0\"\nentry: run.tcl\nscripts: [run.tcl]\nrequired_outputs:\n  - path: {path}\n"
    );
    let err = Contract::parse(&raw).unwrap_err();
    match kind {
        "absolute" => assert!(matches!(err, ContractError::AbsolutePath(_))),
        "traversal" => assert!(matches!(err, ContractError::ParentTraversal(_))),
        _ => assert!(matches!(err, ContractError::OutsideReports(_))),
    }
}

#[test]
fn traversal_is_rejected_even_when_it_normalizes_back_inside() {
    // reports/sub/../x.rpt normalizes to reports/x.rpt, still refused.
    let raw = r#"
name: sneaky
version: "1.0"
entry: run.tcl
scripts: [run.tcl]
required_outputs:
  - path: reports/sub/../x.rpt
"#;
    let err = Contract::parse(raw).unwrap_err();
    assert!(matches!(err, ContractError::ParentTraversal(_)));
}

#[test]
fn glob_patterns_get_the_same_sandbox_checks() {
    let raw = r#"
name: bad
version: "1.0"
entry: run.tcl
scripts: [run.tcl]
required_outputs:
  - path: reports/a.rpt
    glob: "../*.rpt"
"#;
    let err = Contract::parse(raw).unwrap_err();
    assert!(matches!(err, ContractError::ParentTraversal(_)));
}

#[test]
fn script_names_may_not_escape_the_package() {
    let raw = r#"
name: bad
version: "1.0"
entry: ../evil.tcl
scripts: ["../evil.tcl"]
required_outputs:
  - path: reports/a.rpt
"#;
    let err = Contract::parse(raw).unwrap_err();
    assert!(matches!(err, ContractError::BadScriptName(_)));
}

#[test]
fn entry_must_be_listed_in_scripts() {
    let raw = r#"
name: bad
version: "1.0"
entry: main.tcl
scripts: [run.tcl]
required_outputs:
  - path: reports/a.rpt
"#;
    let err = Contract::parse(raw).unwrap_err();
    assert!(matches!(err, ContractError::UnknownEntry(_)));
}
