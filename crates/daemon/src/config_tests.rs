// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn state_dir_prefers_pud_state_dir_override() {
    std::env::set_var("PUD_STATE_DIR", "/tmp/pud-test-state-dir");
    let dir = state_dir().unwrap();
    std::env::remove_var("PUD_STATE_DIR");
    assert_eq!(dir, PathBuf::from("/tmp/pud-test-state-dir"));
}
