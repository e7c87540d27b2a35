//! Teardown: ordered stops, post-run diagnostics, and finding classification.
//!
//! # Order
//!
//! 1. Stop the base station (last started, first stopped)
//! 2. Stop the core network
//! 3. Diagnostics for each service that stopped cleanly, base station first
//!
//! Every finding is handed to the [`OutcomeResolver`] in discovery order:
//! stop results first, then diagnostics. A failure on one service never
//! prevents inspection of the other.

use ranmode_core::diagnostics::{Diagnostics, KpiCounters, LogFindings};
use ranmode_core::metrics as m;
use ranmode_core::outcome::{Outcome, OutcomeResolver, RuntimeCause, WarningKind};
use ranmode_core::params::SessionParameters;
use ranmode_core::service::{RemoteService, ServiceHandle};
use ranmode_core::types::{ServiceRole, StopParams, StopResult};

/// A service that answered its `stop` call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedService {
    pub role: ServiceRole,
    pub result: StopResult,
}

/// Stops started services and inspects what they left behind.
pub struct ShutdownCoordinator<'a, D> {
    params: &'a SessionParameters,
    diagnostics: &'a D,
}

impl<'a, D: Diagnostics> ShutdownCoordinator<'a, D> {
    pub fn new(params: &'a SessionParameters, diagnostics: &'a D) -> Self {
        Self {
            params,
            diagnostics,
        }
    }

    /// Runs teardown over both handles and records findings into `resolver`.
    ///
    /// Only handles with [`ServiceHandle::needs_stop`] are stopped.
    /// Returns the services that stopped, in stop order.
    pub async fn run<C, G>(
        &self,
        core: &mut ServiceHandle<C>,
        edge: &mut ServiceHandle<G>,
        resolver: &mut OutcomeResolver,
    ) -> Vec<StoppedService>
    where
        C: RemoteService,
        G: RemoteService,
    {
        let mut stopped = Vec::with_capacity(2);

        if let Some(result) = stop_one(edge, self.params.base_station_stop(), resolver).await {
            stopped.push(StoppedService {
                role: ServiceRole::BaseStation,
                result,
            });
        }
        if let Some(result) = stop_one(core, self.params.core_network_stop(), resolver).await {
            stopped.push(StoppedService {
                role: ServiceRole::CoreNetwork,
                result,
            });
        }

        for service in &stopped {
            self.inspect(service, resolver).await;
        }

        tracing::info!(
            stopped = stopped.len(),
            findings = resolver.findings().len(),
            "teardown complete"
        );
        stopped
    }

    async fn inspect(&self, service: &StoppedService, resolver: &mut OutcomeResolver) {
        let policy = self.params.policy;
        let role = service.role;

        if policy.log_search {
            match self.diagnostics.search_logs(role, &service.result).await {
                Ok(findings) => self.classify_logs(role, &findings, resolver),
                Err(e) => {
                    tracing::error!(service = %role, error = %e, "log search failed");
                    resolver.record_finding(Outcome::RuntimeFailure {
                        service: role,
                        cause: RuntimeCause::DiagnosticsUnavailable(e),
                    });
                }
            }
        }

        if policy.fail_if_kos {
            match self.diagnostics.fetch_kpis(role, &service.result).await {
                Ok(kpis) => classify_kpis(role, &kpis, resolver),
                Err(e) => {
                    tracing::error!(service = %role, error = %e, "kpi fetch failed");
                    resolver.record_finding(Outcome::RuntimeFailure {
                        service: role,
                        cause: RuntimeCause::DiagnosticsUnavailable(e),
                    });
                }
            }
        }
    }

    fn classify_logs(
        &self,
        role: ServiceRole,
        findings: &LogFindings,
        resolver: &mut OutcomeResolver,
    ) {
        metrics::counter!(m::SHUTDOWN_LOG_ERRORS_TOTAL, m::LABEL_SERVICE => role.as_str())
            .increment(findings.errors.len() as u64);
        metrics::counter!(m::SHUTDOWN_LOG_WARNINGS_TOTAL, m::LABEL_SERVICE => role.as_str())
            .increment(findings.warnings.len() as u64);

        if !findings.errors.is_empty() {
            tracing::warn!(service = %role, count = findings.errors.len(), "errors in logs");
            resolver.record_finding(Outcome::SoftWarning {
                service: role,
                kind: WarningKind::LogErrors,
                detail: summarize(&findings.errors),
            });
        }

        if findings.warnings.is_empty() {
            return;
        }
        if self.params.policy.warning_as_errors {
            tracing::warn!(
                service = %role,
                count = findings.warnings.len(),
                "warnings in logs promoted to errors"
            );
            resolver.record_finding(Outcome::SoftWarning {
                service: role,
                kind: WarningKind::PromotedWarnings,
                detail: summarize(&findings.warnings),
            });
        } else {
            tracing::info!(
                service = %role,
                count = findings.warnings.len(),
                "warnings in logs"
            );
        }
    }
}

async fn stop_one<S: RemoteService>(
    handle: &mut ServiceHandle<S>,
    params: StopParams,
    resolver: &mut OutcomeResolver,
) -> Option<StopResult> {
    let role = handle.role();
    if !handle.needs_stop() {
        tracing::debug!(
            service = %role,
            state = %handle.state(),
            "start never attempted, skipping stop"
        );
        return None;
    }

    match handle.stop(params).await {
        Ok(result) => {
            if result.crashed() {
                tracing::error!(
                    service = %role,
                    exit_code = result.exit_code,
                    "service crashed during the run"
                );
                metrics::counter!(m::SHUTDOWN_CRASHES_TOTAL, m::LABEL_SERVICE => role.as_str())
                    .increment(1);
                resolver.record_finding(Outcome::RuntimeFailure {
                    service: role,
                    cause: RuntimeCause::Crashed {
                        exit_code: result.exit_code,
                    },
                });
            } else {
                tracing::info!(service = %role, "service stopped");
            }
            Some(result)
        }
        Err(e) => {
            tracing::error!(service = %role, error = %e, "stop failed");
            metrics::counter!(
                m::SHUTDOWN_STOP_FAILURES_TOTAL,
                m::LABEL_SERVICE => role.as_str(),
                m::LABEL_CAUSE => e.kind()
            )
            .increment(1);
            resolver.record_finding(Outcome::RuntimeFailure {
                service: role,
                cause: RuntimeCause::StopFailed(e),
            });
            None
        }
    }
}

fn classify_kpis(role: ServiceRole, kpis: &KpiCounters, resolver: &mut OutcomeResolver) {
    tracing::info!(
        service = %role,
        ul_bitrate_bps = kpis.ul_bitrate_bps,
        dl_bitrate_bps = kpis.dl_bitrate_bps,
        nof_ko_ul = kpis.nof_ko_ul,
        nof_ko_dl = kpis.nof_ko_dl,
        "kpis"
    );

    let total = kpis.total_kos();
    if total == 0 {
        return;
    }
    metrics::counter!(m::SHUTDOWN_KOS_TOTAL, m::LABEL_SERVICE => role.as_str()).increment(total);
    resolver.record_finding(Outcome::SoftWarning {
        service: role,
        kind: WarningKind::KOsDetected,
        detail: format!("{} UL / {} DL KOs", kpis.nof_ko_ul, kpis.nof_ko_dl),
    });
}

/// Line count plus the first offending line.
fn summarize(lines: &[String]) -> String {
    match lines.first() {
        Some(first) if lines.len() == 1 => first.clone(),
        Some(first) => format!("{} lines, first: {first}", lines.len()),
        None => String::new(),
    }
}
