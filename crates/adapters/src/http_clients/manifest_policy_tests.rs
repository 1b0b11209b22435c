// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Doc {
    latest: String,
}

#[tokio::test]
async fn reads_local_file_when_not_http() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.json");
    tokio::fs::write(&path, r#"{"latest":"1.9.0"}"#).await.unwrap();
    let client = reqwest::Client::new();
    let doc: Doc = fetch_json_document(&client, path.to_str().unwrap(), DEFAULT_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(doc.latest, "1.9.0");
}

#[tokio::test]
async fn missing_local_file_is_an_error() {
    let client = reqwest::Client::new();
    let result: Result<Doc, _> =
        fetch_json_document(&client, "/nonexistent/policy.json", DEFAULT_TIMEOUT).await;
    assert!(matches!(result, Err(DocumentFetchError::FileReadFailed(_))));
}
