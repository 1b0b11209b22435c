// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn second_acquire_is_rejected_while_first_is_held() {
    let gate = ConcurrencyGate::new();
    let _first = gate.try_acquire(JobId::new("job-1")).unwrap();
    let err = gate.try_acquire(JobId::new("job-2")).unwrap_err();
    assert_eq!(err, JobId::new("job-1"));
}

#[test]
fn dropping_the_handle_releases_the_gate() {
    let gate = ConcurrencyGate::new();
    {
        let _first = gate.try_acquire(JobId::new("job-1")).unwrap();
    }
    assert!(gate.try_acquire(JobId::new("job-2")).is_ok());
}

#[test]
fn active_job_reports_the_current_holder() {
    let gate = ConcurrencyGate::new();
    assert!(gate.active_job().is_none());
    let _handle = gate.try_acquire(JobId::new("job-1")).unwrap();
    assert_eq!(gate.active_job(), Some(JobId::new("job-1")));
}
