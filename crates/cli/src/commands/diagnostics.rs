// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pud inspect` / `pud recover` / `pud sync` — the Inspector and Automated
//! Recoverer surfaced over the control plane (spec §4.C11/§4.C12).

use anyhow::Result;
use pud_engine::OverallState;

use crate::client::PudClient;

pub async fn inspect(client: &PudClient) -> Result<i32> {
    let report = client.inspect().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(match report.overall_state {
        OverallState::Ok => 0,
        OverallState::Degraded => 1,
        OverallState::Broken => 2,
    })
}

pub async fn recover(client: &PudClient) -> Result<i32> {
    let resp = client.recover().await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(if resp.outcome == "REFUSED" { 1 } else { 0 })
}

pub async fn sync(client: &PudClient) -> Result<i32> {
    let resp = client.sync().await?;
    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(0)
}
