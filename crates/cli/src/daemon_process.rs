// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating and launching the `pudd` binary for the `serve` subcommand.

use std::path::PathBuf;
use std::process::Command;

/// Finds the `pudd` binary: a sibling of the running `pud` executable first
/// (the common install layout), falling back to `$PATH`.
fn find_pudd_binary() -> PathBuf {
    if let Some(dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        let sibling = dir.join("pudd");
        if sibling.exists() {
            return sibling;
        }
    }
    PathBuf::from("pudd")
}

/// Runs `pudd` in the foreground, inheriting stdio, and returns its exit status.
pub fn run_foreground() -> std::io::Result<std::process::ExitStatus> {
    Command::new(find_pudd_binary()).status()
}
