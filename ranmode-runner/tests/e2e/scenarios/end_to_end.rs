//! Full successful run: startup, exact session window, clean teardown.

use std::time::Duration;

use ranmode_core::outcome::Outcome;
use ranmode_core::types::{Plmn, ServiceRole};
use ranmode_runner::loopback::Call;
use ranmode_runner::startup::StartupState;

use crate::helpers::assertions::assert_stopped_in_order;
use crate::helpers::config::TestConfigBuilder;
use crate::helpers::rig::Rig;

const EXTRA: &str = "test_mode test_ue --rnti 0x44 --cqi 15 --ri 1";

#[tokio::test(start_paused = true)]
async fn test_e2e_two_antennas_clean_run_succeeds() {
    // Given: 2 antennas, the standard test-mode directive, a 300 s session
    let params = TestConfigBuilder::new()
        .antennas(2)
        .extra_config(EXTRA)
        .duration_secs(300)
        .params();

    // When
    let (report, journal) = Rig::new().run(params).await;

    // Then: success, and the base station got the exact post command line
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(report.exit_code(), 0);
    let request = journal
        .start_request(ServiceRole::BaseStation)
        .expect("base station should have been started");
    assert_eq!(
        request.start_info.post_command_line(),
        "cell_cfg --nof_antennas_dl 2 --nof_antennas_ul 2 test_mode test_ue --rnti 0x44 --cqi 15 --ri 1"
    );
    assert_eq!(request.plmn, Plmn::new("001", "01"));
    assert_eq!(request.start_info.timeout, Duration::from_secs(2));
    assert_stopped_in_order(
        &journal,
        &[ServiceRole::BaseStation, ServiceRole::CoreNetwork],
    );
}

#[tokio::test(start_paused = true)]
async fn test_e2e_session_waits_configured_duration_before_teardown() {
    // Given
    let params = TestConfigBuilder::new().duration_secs(300).params();
    let started = tokio::time::Instant::now();

    // When
    let (report, _journal) = Rig::new().run(params).await;

    // Then: the window is the configured duration, within a millisecond
    assert!(report.session_secs >= 300.0);
    assert!(report.session_secs < 300.001);
    assert!(started.elapsed() >= Duration::from_secs(300));
    assert!(started.elapsed() < Duration::from_secs(301));
}

#[tokio::test(start_paused = true)]
async fn test_e2e_no_remote_calls_during_session() {
    // Given
    let params = TestConfigBuilder::new().duration_secs(60).params();

    // When
    let (_report, journal) = Rig::new().run(params).await;

    // Then: the call after the last start is the base station stop
    let calls = journal.calls();
    let last_start = calls
        .iter()
        .rposition(|c| matches!(c, Call::Start(..)))
        .expect("starts recorded");
    assert!(matches!(
        calls[last_start + 1],
        Call::Stop(ServiceRole::BaseStation, _)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_e2e_peer_and_radio_ports_trimmed_to_antennas() {
    for (antennas, expected) in [(1, 1), (2, 2), (4, 4), (8, 4)] {
        // Given: both doubles expose 4 ports
        let params = TestConfigBuilder::new().antennas(antennas).params();

        // When
        let (report, journal) = Rig::new().run(params).await;

        // Then: min(antennas, available)
        assert_eq!(report.startup_state, StartupState::BothReady);
        let request = journal
            .start_request(ServiceRole::BaseStation)
            .expect("base station started");
        let peer = request.peer.expect("peer definition present");
        let radio = request.radio.expect("radio definition present");
        assert_eq!(peer.ports.len(), expected, "antennas={antennas}");
        assert_eq!(radio.ports.len(), expected, "antennas={antennas}");
        assert!(peer.ports.len() <= antennas);
    }
}

#[tokio::test(start_paused = true)]
async fn test_e2e_core_started_before_base_station_definition() {
    let params = TestConfigBuilder::new().params();

    let (_report, journal) = Rig::new().run(params).await;

    let calls = journal.calls();
    let core_start = calls
        .iter()
        .position(|c| matches!(c, Call::Start(ServiceRole::CoreNetwork, _)))
        .expect("core started");
    let edge_definition = calls
        .iter()
        .position(|c| matches!(c, Call::GetDefinition(ServiceRole::BaseStation)))
        .expect("edge defined");
    assert!(core_start < edge_definition);
}

#[tokio::test(start_paused = true)]
async fn test_e2e_artifacts_only_requested_when_policy_or_failure() {
    let params = TestConfigBuilder::new()
        .always_download_artifacts(false)
        .params();

    let (report, _journal) = Rig::new().run(params).await;

    assert!(report.outcome.is_success());
    assert!(!report.artifacts_requested);
    assert_eq!(report.artifacts, vec!["gnb.log", "5gc.log"]);
}
