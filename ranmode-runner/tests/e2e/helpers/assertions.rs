//! Outcome assertion helpers for E2E tests.

use ranmode_core::outcome::{Outcome, WarningKind};
use ranmode_core::types::ServiceRole;
use ranmode_runner::loopback::CallJournal;

/// Assert that `stop` was issued exactly once to each of `roles`, in order,
/// and to nothing else.
#[allow(dead_code)]
pub fn assert_stopped_in_order(journal: &CallJournal, roles: &[ServiceRole]) {
    assert_eq!(
        journal.stop_order(),
        roles.to_vec(),
        "unexpected stop order, calls: {:?}",
        journal.calls()
    );
}

/// Assert that the outcome is a soft warning of `kind` for `service`.
#[allow(dead_code)]
pub fn assert_soft_warning(outcome: &Outcome, service: ServiceRole, kind: WarningKind) {
    match outcome {
        Outcome::SoftWarning {
            service: s,
            kind: k,
            ..
        } => {
            assert_eq!(*s, service, "warning on wrong service: {outcome}");
            assert_eq!(*k, kind, "wrong warning kind: {outcome}");
        }
        other => panic!("expected soft warning, got: {other}"),
    }
}

/// Assert that the outcome is a startup failure of `service` and return its cause.
#[allow(dead_code)]
pub fn assert_startup_failure(
    outcome: &Outcome,
    service: ServiceRole,
) -> ranmode_core::error::ServiceError {
    match outcome {
        Outcome::StartupFailure { service: s, cause } => {
            assert_eq!(*s, service, "startup failure on wrong service: {outcome}");
            cause.clone()
        }
        other => panic!("expected startup failure, got: {other}"),
    }
}
