//! Startup failures: ordering, attribution, and guaranteed teardown.

use std::time::Duration;

use ranmode_core::error::ServiceError;
use ranmode_core::types::ServiceRole;

use crate::helpers::assertions::{assert_startup_failure, assert_stopped_in_order};
use crate::helpers::config::TestConfigBuilder;
use crate::helpers::rig::Rig;

#[tokio::test(start_paused = true)]
async fn test_e2e_core_start_failure_never_starts_base_station() {
    // Given: the core rejects its start
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().core(|c| {
        c.with_start_error(ServiceError::Rejected("amf config invalid".to_owned()))
    });

    // When
    let (report, journal) = rig.run(params).await;

    // Then
    assert_eq!(journal.start_count(ServiceRole::BaseStation), 0);
    let cause = assert_startup_failure(&report.outcome, ServiceRole::CoreNetwork);
    assert_eq!(cause, ServiceError::Rejected("amf config invalid".to_owned()));
    assert_eq!(report.session_secs, 0.0);
    assert_eq!(report.exit_code(), 2);
    // core start was attempted, so it is stopped; the base station is not
    assert_stopped_in_order(&journal, &[ServiceRole::CoreNetwork]);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_core_unreachable_stops_nothing() {
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().core(|c| {
        c.with_definition_error(ServiceError::Transport("connection refused".to_owned()))
    });

    let (report, journal) = rig.run(params).await;

    let cause = assert_startup_failure(&report.outcome, ServiceRole::CoreNetwork);
    assert!(matches!(cause, ServiceError::Transport(_)));
    assert_eq!(journal.start_count(ServiceRole::CoreNetwork), 0);
    assert_stopped_in_order(&journal, &[]);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_base_station_rejection_stops_both() {
    // Given: the base station rejects the request
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().edge(|e| {
        e.with_start_error(ServiceError::Rejected(
            "cell_cfg: bad antenna count".to_owned(),
        ))
    });

    // When
    let (report, journal) = rig.run(params).await;

    // Then: both were started, so both are stopped, base station first
    let cause = assert_startup_failure(&report.outcome, ServiceRole::BaseStation);
    assert_eq!(
        cause,
        ServiceError::Rejected("cell_cfg: bad antenna count".to_owned())
    );
    assert_stopped_in_order(
        &journal,
        &[ServiceRole::BaseStation, ServiceRole::CoreNetwork],
    );
}

#[tokio::test(start_paused = true)]
async fn test_e2e_base_station_timeout_gets_best_effort_stop() {
    // Given: the base station never answers within its 2 s bound
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().edge(|e| e.with_start_delay(Duration::from_secs(60)));

    // When
    let (report, journal) = rig.run(params).await;

    // Then: the timed-out service still receives a stop
    let cause = assert_startup_failure(&report.outcome, ServiceRole::BaseStation);
    assert_eq!(
        cause,
        ServiceError::StartupTimeout {
            timeout: Duration::from_secs(2)
        }
    );
    assert_eq!(journal.stop_count(ServiceRole::BaseStation), 1);
    assert_eq!(journal.stop_count(ServiceRole::CoreNetwork), 1);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_startup_failure_wins_over_teardown_findings() {
    // Given: base station start fails AND the core crashes on stop
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new()
        .edge(|e| e.with_start_error(ServiceError::Rejected("no prach".to_owned())))
        .core(|c| c.with_exit_code(139));

    // When
    let (report, _journal) = rig.run(params).await;

    // Then: startup failure decides, the crash is kept as advisory
    assert_startup_failure(&report.outcome, ServiceRole::BaseStation);
    assert_eq!(report.findings.len(), 1);
    assert!(report.artifacts_requested);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_panic_in_core_start_is_a_fault() {
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().core(|c| c.with_start_panic("scripted panic"));

    let (report, journal) = rig.run(params).await;

    let cause = assert_startup_failure(&report.outcome, ServiceRole::CoreNetwork);
    assert_eq!(cause, ServiceError::Fault("scripted panic".to_owned()));
    assert_eq!(journal.start_count(ServiceRole::BaseStation), 0);
    assert_stopped_in_order(&journal, &[ServiceRole::CoreNetwork]);
}
