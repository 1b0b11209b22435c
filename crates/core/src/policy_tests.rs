// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn finds_breakpoint_by_version() {
    let policy = Policy {
        latest: "1.9.0".into(),
        releases: vec!["1.8.0".into(), "1.9.0".into()],
        breakpoints: vec![Breakpoint {
            version: "1.9.0".into(),
            reason: "schema".into(),
            docs: "https://example.com".into(),
        }],
        updater_api_init_version: None,
    };
    assert!(policy.breakpoint_for("1.9.0").is_some());
    assert!(policy.breakpoint_for("1.8.0").is_none());
    assert!(policy.is_known_release("1.8.0"));
    assert!(!policy.is_known_release("2.0.0"));
}
