// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn strips_leading_v_before_comparing() {
    assert!(version_less_than("v1.8.0", "1.9.0"));
    assert!(!version_less_than("1.9.0", "v1.8.0"));
}

#[test]
fn numeric_prefix_ignores_trailing_suffix() {
    assert_eq!(numeric_components("1.9.0-beta"), vec![1, 9, 0]);
}

#[test]
fn equal_versions_are_not_less_than_each_other() {
    assert!(!version_less_than("1.9.0", "1.9.0"));
}
