//! Run orchestration -- startup, session window, guaranteed teardown.
//!
//! The [`Orchestrator`] owns both service handles and the diagnostics
//! collaborator for exactly one run.
//!
//! # Flow
//!
//! 1. Startup: core network, then base station
//! 2. Session window, only when both services are ready
//! 3. Teardown: base station, then core network, then diagnostics
//! 4. Outcome resolution and report
//!
//! Teardown runs on every path. Startup failures come back as values and
//! a panic inside startup is caught and recorded as a `Fault`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tracing::Instrument;

use ranmode_core::diagnostics::Diagnostics;
use ranmode_core::metrics as m;
use ranmode_core::outcome::OutcomeResolver;
use ranmode_core::params::SessionParameters;
use ranmode_core::service::{RemoteService, ServiceHandle};
use ranmode_core::types::ServiceRole;

use crate::report::SessionReport;
use crate::session::SessionRunner;
use crate::shutdown::ShutdownCoordinator;
use crate::startup::{StartupCoordinator, StartupState};

/// One test-mode run against a core-network and base-station pair.
pub struct Orchestrator<C, G, D> {
    run_id: String,
    params: SessionParameters,
    core: ServiceHandle<C>,
    edge: ServiceHandle<G>,
    diagnostics: D,
    rehearsal: bool,
}

impl<C, G, D> Orchestrator<C, G, D>
where
    C: RemoteService,
    G: RemoteService,
    D: Diagnostics,
{
    /// Build an orchestrator with a fresh run id.
    pub fn new(params: SessionParameters, core: C, edge: G, diagnostics: D) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            params,
            core: ServiceHandle::new(ServiceRole::CoreNetwork, core),
            edge: ServiceHandle::new(ServiceRole::BaseStation, edge),
            diagnostics,
            rehearsal: false,
        }
    }

    /// Mark the run as a rehearsal against loopback doubles.
    pub fn rehearsal(mut self) -> Self {
        self.rehearsal = true;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn params(&self) -> &SessionParameters {
        &self.params
    }

    /// Execute the run and resolve its outcome exactly once.
    pub async fn execute(mut self) -> SessionReport {
        let span = tracing::info_span!("run", run_id = %self.run_id);
        async move {
            tracing::info!(
                nof_antennas = self.params.nof_antennas,
                duration_secs = self.params.duration.as_secs(),
                plmn = %self.params.plmn,
                rehearsal = self.rehearsal,
                "run starting"
            );

            let mut resolver = OutcomeResolver::new();

            let startup_state = self.startup().await;
            if let StartupState::Failed { service, cause } = &startup_state {
                resolver.record_startup_failure(*service, cause.clone());
            }

            let runner = SessionRunner::new(self.params.duration);
            let window = if startup_state.is_ready() {
                runner.run().await
            } else {
                tracing::warn!(
                    state = %startup_state,
                    skipped_secs = runner.duration().as_secs(),
                    "startup incomplete, skipping session"
                );
                Duration::ZERO
            };

            let stopped = ShutdownCoordinator::new(&self.params, &self.diagnostics)
                .run(&mut self.core, &mut self.edge, &mut resolver)
                .await;

            if resolver.startup_failed() && !resolver.findings().is_empty() {
                tracing::info!(
                    findings = resolver.findings().len(),
                    "teardown findings are advisory after a startup failure"
                );
            }
            let resolved = resolver.resolve();
            let artifacts_requested = SessionReport::artifacts_wanted(
                self.params.policy.always_download_artifacts,
                &resolved.outcome,
            );
            let artifacts = stopped
                .into_iter()
                .flat_map(|s| s.result.artifacts)
                .collect();

            metrics::counter!(m::RUN_OUTCOMES_TOTAL, m::LABEL_OUTCOME => resolved.outcome.label())
                .increment(1);
            if resolved.outcome.is_success() {
                tracing::info!(outcome = %resolved.outcome, "run finished");
            } else {
                tracing::error!(outcome = %resolved.outcome, "run finished");
            }

            SessionReport {
                run_id: self.run_id.clone(),
                outcome: resolved.outcome,
                startup_state,
                session_secs: window.as_secs_f64(),
                findings: resolved.findings,
                artifacts,
                artifacts_requested,
                rehearsal: self.rehearsal,
            }
        }
        .instrument(span)
        .await
    }

    /// Startup with any escaped panic converted into a startup failure.
    async fn startup(&mut self) -> StartupState {
        let mut coordinator = StartupCoordinator::new(&self.params);
        let attempt = AssertUnwindSafe(coordinator.run(&mut self.core, &mut self.edge))
            .catch_unwind()
            .await;

        match attempt {
            Ok(state) => state,
            Err(panic) => coordinator.fault(panic_message(panic.as_ref())),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}
