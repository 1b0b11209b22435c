//! `pudd --help` / `pudd --version` / unexpected-argument handling, none of
//! which require binding the loopback HTTP port.

use crate::prelude::pudd_cmd;

#[test]
fn help_mentions_the_cli_companion() {
    let output = pudd_cmd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pud"));
}

#[test]
fn version_prints_something() {
    let output = pudd_cmd().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(!output.stdout.is_empty());
}

#[test]
fn unexpected_argument_is_rejected() {
    let output = pudd_cmd().arg("--bogus-flag").output().unwrap();
    assert!(!output.status.success());
}
