// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn recognizes_idempotent_stop_phrasings() {
    assert!(is_already_stopped_or_removed("Error: No such container: app"));
    assert!(is_already_stopped_or_removed("app is not running"));
    assert!(is_already_stopped_or_removed("container already stopped"));
    assert!(!is_already_stopped_or_removed("permission denied"));
}

#[test]
fn recognizes_idempotent_start_phrasing() {
    assert!(is_already_running("container app is already running"));
    assert!(!is_already_running("no such container"));
}
