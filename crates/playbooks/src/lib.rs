// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Static playbook registry and rendering (spec §4.C7): maps every
//! `FailureCode` to an operator-facing recovery playbook and substitutes a
//! `PlaybookContext`'s values into its placeholders.

mod registry;

use pud_core::{FailureCode, Playbook, PlaybookContext, Severity};
use thiserror::Error;

pub use registry::REGISTRY;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybookLookupError {
    #[error("no playbook registered for failure code {0}")]
    NotFound(String),
}

/// Looks up and renders the playbook for `code`, substituting `ctx`'s values
/// into `user_message`, `ssh_steps`, and `backup_path`.
pub fn render_playbook(code: FailureCode, ctx: &PlaybookContext) -> Result<Playbook, PlaybookLookupError> {
    let template = REGISTRY
        .get(&code)
        .ok_or_else(|| PlaybookLookupError::NotFound(code.as_str().to_string()))?;

    Ok(Playbook {
        code: template.code.clone(),
        severity: template.severity,
        data_risk: template.data_risk,
        title: template.title.clone(),
        user_message: registry::substitute(&template.user_message, ctx),
        ssh_steps: template
            .ssh_steps
            .iter()
            .map(|step| registry::substitute(step, ctx))
            .collect(),
        docs_url: template.docs_url.clone(),
        backup_path: if ctx.backup_path.is_empty() {
            template.backup_path.clone()
        } else {
            Some(ctx.backup_path.clone())
        },
    })
}

/// `true` when the daemon should retry automatically without operator input.
pub fn is_retryable(code: FailureCode) -> bool {
    REGISTRY
        .get(&code)
        .map(|p| p.severity == Severity::Retryable)
        .unwrap_or(false)
}

/// `true` when the failure needs an operator to follow SSH steps.
pub fn requires_manual_intervention(code: FailureCode) -> bool {
    REGISTRY
        .get(&code)
        .map(|p| p.severity == Severity::ManualRequired)
        .unwrap_or(false)
}

/// `true` when the failure carries any risk (`Possible`, `Likely`, or
/// `Unknown`) of data loss or corruption.
pub fn has_data_risk(code: FailureCode) -> bool {
    REGISTRY
        .get(&code)
        .map(|p| p.data_risk != pud_core::DataRisk::None)
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
