// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn env_overrides_take_precedence() {
    let env = |k: &str| match k {
        "POSTGRES_HOST" => Some("db.example.com".to_string()),
        _ => None,
    };
    let conn = from_env_overrides(&env).unwrap();
    assert_eq!(conn.host, "db.example.com");
}

#[test]
fn local_override_is_skipped_in_favor_of_container_env() {
    let env = |k: &str| match k {
        "POSTGRES_HOST" => Some("localhost".to_string()),
        _ => None,
    };
    assert!(from_env_overrides(&env).is_none());
}

#[test]
fn container_env_used_when_no_override() {
    let env = vec!["POSTGRES_HOST=127.0.0.1".to_string(), "POSTGRES_DB=payram".to_string()];
    let conn = from_container_env(&env).unwrap();
    assert_eq!(conn.host, "127.0.0.1");
    assert_eq!(conn.database, "payram");
}

#[test]
fn env_file_parses_key_value_lines() {
    let contents = "POSTGRES_HOST=10.0.0.5\nPOSTGRES_PORT=5433\n# comment\n";
    let conn = parse_env_file(contents).unwrap();
    assert_eq!(conn.host, "10.0.0.5");
    assert_eq!(conn.port, "5433");
}

#[tokio::test]
async fn falls_through_precedence_to_not_found() {
    let env = |_: &str| None;
    let result = discover_db_location(&env, &[], Path::new("/nonexistent/db.env")).await;
    assert!(matches!(result, Err(DbDiscoveryError::NotFound)));
}
