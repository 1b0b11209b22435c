// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest & Policy clients (spec §4.C3): GET the URL (or read a local file
//! when it doesn't start with `http`), cap the body at 1 MiB, fail on
//! non-200, strict JSON decode.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const BODY_CAP_BYTES: usize = 1024 * 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum DocumentFetchError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("non-200 response: {0}")]
    NonSuccessStatus(u16),
    #[error("response body exceeds the 1 MiB cap")]
    BodyTooLarge,
    #[error("failed to decode JSON: {0}")]
    DecodeFailed(String),
    #[error("failed to read local file: {0}")]
    FileReadFailed(String),
}

/// Fetches and strictly decodes a JSON document from `location`, which is
/// either an `http(s)://` URL or a local file path (spec §4.C3).
pub async fn fetch_json_document<T: DeserializeOwned>(
    client: &reqwest::Client,
    location: &str,
    timeout: Duration,
) -> Result<T, DocumentFetchError> {
    let body = if location.starts_with("http") {
        fetch_over_http(client, location, timeout).await?
    } else {
        tokio::fs::read_to_string(location)
            .await
            .map_err(|e| DocumentFetchError::FileReadFailed(e.to_string()))?
    };
    if body.len() > BODY_CAP_BYTES {
        return Err(DocumentFetchError::BodyTooLarge);
    }
    serde_json::from_str(&body).map_err(|e| DocumentFetchError::DecodeFailed(e.to_string()))
}

async fn fetch_over_http(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, DocumentFetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| DocumentFetchError::RequestFailed(e.to_string()))?;
    if !response.status().is_success() {
        return Err(DocumentFetchError::NonSuccessStatus(response.status().as_u16()));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| DocumentFetchError::RequestFailed(e.to_string()))?;
    if bytes.len() > BODY_CAP_BYTES {
        return Err(DocumentFetchError::BodyTooLarge);
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| DocumentFetchError::DecodeFailed(e.to_string()))
}

#[cfg(test)]
#[path = "manifest_policy_tests.rs"]
mod tests;
