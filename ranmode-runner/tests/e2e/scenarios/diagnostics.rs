//! Post-run diagnostics: log findings, KO counters, policy flags.

use ranmode_core::diagnostics::{KpiCounters, LogFindings};
use ranmode_core::error::DiagnosticsError;
use ranmode_core::outcome::{Outcome, RuntimeCause, WarningKind};
use ranmode_core::types::ServiceRole;

use crate::helpers::assertions::assert_soft_warning;
use crate::helpers::config::TestConfigBuilder;
use crate::helpers::rig::Rig;

fn warnings_only() -> LogFindings {
    LogFindings {
        errors: vec![],
        warnings: vec!["[RLC] buffer near full".to_owned()],
    }
}

fn kos(ul: u64, dl: u64) -> KpiCounters {
    KpiCounters {
        ul_bitrate_bps: 1.0e6,
        dl_bitrate_bps: 2.0e6,
        nof_ko_ul: ul,
        nof_ko_dl: dl,
    }
}

#[tokio::test(start_paused = true)]
async fn test_e2e_warnings_pass_when_not_promoted() {
    // Given: warnings only, warning_as_errors = false
    let params = TestConfigBuilder::new().warning_as_errors(false).params();
    let rig = Rig::new().diagnostics(|d| d.with_logs(ServiceRole::BaseStation, warnings_only()));

    // When
    let (report, _journal) = rig.run(params).await;

    // Then
    assert_eq!(report.outcome, Outcome::Success);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_warnings_fail_when_promoted() {
    // Given: same logs, warning_as_errors = true
    let params = TestConfigBuilder::new().warning_as_errors(true).params();
    let rig = Rig::new().diagnostics(|d| d.with_logs(ServiceRole::BaseStation, warnings_only()));

    // When
    let (report, _journal) = rig.run(params).await;

    // Then
    assert_soft_warning(
        &report.outcome,
        ServiceRole::BaseStation,
        WarningKind::PromotedWarnings,
    );
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_log_errors_are_soft_warning() {
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().diagnostics(|d| {
        d.with_logs(
            ServiceRole::CoreNetwork,
            LogFindings {
                errors: vec!["[AMF] NGAP setup failure".to_owned()],
                warnings: vec![],
            },
        )
    });

    let (report, _journal) = rig.run(params).await;

    assert_soft_warning(&report.outcome, ServiceRole::CoreNetwork, WarningKind::LogErrors);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_kos_from_either_service_fail_run() {
    for role in [ServiceRole::BaseStation, ServiceRole::CoreNetwork] {
        // Given: clean starts and stops, KOs on one service
        let params = TestConfigBuilder::new().fail_if_kos(true).params();
        let rig = Rig::new().diagnostics(|d| d.with_kpis(role, kos(2, 0)));

        // When
        let (report, _journal) = rig.run(params).await;

        // Then
        assert_soft_warning(&report.outcome, role, WarningKind::KOsDetected);
    }
}

#[tokio::test(start_paused = true)]
async fn test_e2e_kos_ignored_when_check_disabled() {
    let params = TestConfigBuilder::new().fail_if_kos(false).params();
    let rig = Rig::new().diagnostics(|d| d.with_kpis(ServiceRole::BaseStation, kos(5, 5)));

    let (report, _journal) = rig.run(params).await;

    assert!(report.outcome.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_e2e_first_teardown_finding_decides() {
    // Given: base station warnings (inspected first) and core KOs
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().diagnostics(|d| {
        d.with_logs(ServiceRole::BaseStation, warnings_only())
            .with_kpis(ServiceRole::CoreNetwork, kos(0, 1))
    });

    // When
    let (report, _journal) = rig.run(params).await;

    // Then: the base station finding wins, both are kept
    assert_soft_warning(
        &report.outcome,
        ServiceRole::BaseStation,
        WarningKind::PromotedWarnings,
    );
    assert_eq!(report.findings.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_unavailable_log_store_is_runtime_failure() {
    let params = TestConfigBuilder::new().params();
    let rig = Rig::new().diagnostics(|d| {
        d.with_log_error(DiagnosticsError::Unavailable("log store offline".to_owned()))
    });

    let (report, _journal) = rig.run(params).await;

    assert!(matches!(
        report.outcome,
        Outcome::RuntimeFailure {
            service: ServiceRole::BaseStation,
            cause: RuntimeCause::DiagnosticsUnavailable(DiagnosticsError::Unavailable(_)),
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_e2e_log_search_disabled_skips_scan() {
    let params = TestConfigBuilder::new().log_search(false).params();
    let rig = Rig::new().diagnostics(|d| {
        d.with_logs(
            ServiceRole::BaseStation,
            LogFindings {
                errors: vec!["fatal".to_owned()],
                warnings: vec![],
            },
        )
    });

    let (report, journal) = rig.run(params).await;

    assert!(report.outcome.is_success());
    assert!(
        !journal
            .calls()
            .iter()
            .any(|c| matches!(c, ranmode_runner::loopback::Call::SearchLogs(_)))
    );
}
