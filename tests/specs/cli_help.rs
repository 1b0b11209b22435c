//! `pud --help` / `pud --version` never touch the network.

use assert_cmd::prelude::*;

use crate::prelude::pud_cmd;

#[test]
fn help_lists_every_subcommand() {
    let output = pud_cmd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["serve", "status", "logs", "dry-run", "run", "inspect", "recover", "sync", "backup"] {
        assert!(stdout.contains(sub), "--help output missing '{sub}':\n{stdout}");
    }
}

#[test]
fn version_prints_something() {
    pud_cmd().arg("--version").assert().success();
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    pud_cmd().arg("not-a-real-command").assert().failure().code(2);
}

#[test]
fn backup_restore_requires_file_flag() {
    pud_cmd().args(["backup", "restore"]).assert().failure().code(2);
}
