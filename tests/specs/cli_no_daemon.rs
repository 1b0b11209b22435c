//! With no `pudd` listening, every control-plane subcommand should fail
//! cleanly (a connection error, not a panic) and exit non-zero.

use assert_cmd::prelude::*;

use crate::prelude::{pud_cmd, unreachable_port};

fn cmd_against_unreachable_daemon(args: &[&str]) -> assert_cmd::assert::Assert {
    pud_cmd().env("PUD_PORT", unreachable_port()).args(args).assert()
}

#[test]
fn status_fails_without_a_daemon() {
    cmd_against_unreachable_daemon(&["status"]).failure();
}

#[test]
fn inspect_fails_without_a_daemon() {
    cmd_against_unreachable_daemon(&["inspect"]).failure();
}

#[test]
fn dry_run_fails_without_a_daemon() {
    cmd_against_unreachable_daemon(&["dry-run", "--to", "1.2.3"]).failure();
}

#[test]
fn backup_list_fails_without_a_daemon() {
    cmd_against_unreachable_daemon(&["backup", "list"]).failure();
}
