//! In-process loopback doubles for rehearsing a run without a transport.
//!
//! [`LoopbackService`] and [`LoopbackDiagnostics`] are scripted: each call
//! returns whatever the builder configured and is appended to a shared
//! [`CallJournal`], so callers can assert on ordering and call counts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ranmode_core::diagnostics::{Diagnostics, KpiCounters, LogFindings};
use ranmode_core::error::{DiagnosticsError, ServiceError};
use ranmode_core::service::RemoteService;
use ranmode_core::types::{ServiceDefinition, ServiceRole, StartRequest, StopParams, StopResult};

/// A single recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetDefinition(ServiceRole),
    Start(ServiceRole, StartRequest),
    Stop(ServiceRole, StopParams),
    SearchLogs(ServiceRole),
    FetchKpis(ServiceRole),
}

impl Call {
    /// The service this call targeted.
    pub fn role(&self) -> ServiceRole {
        match self {
            Self::GetDefinition(role)
            | Self::Start(role, _)
            | Self::Stop(role, _)
            | Self::SearchLogs(role)
            | Self::FetchKpis(role) => *role,
        }
    }
}

/// Ordered, shared record of every call made against the doubles.
#[derive(Debug, Clone, Default)]
pub struct CallJournal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: Call) {
        // A poisoned journal only means an earlier scripted panic; keep recording.
        let mut calls = match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        calls.push(call);
    }

    /// Snapshot of all calls in order.
    pub fn calls(&self) -> Vec<Call> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of `start` calls made against `role`.
    pub fn start_count(&self, role: ServiceRole) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Start(r, _) if *r == role))
            .count()
    }

    /// Number of `stop` calls made against `role`.
    pub fn stop_count(&self, role: ServiceRole) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Stop(r, _) if *r == role))
            .count()
    }

    /// The last request sent to `role`'s `start`.
    pub fn start_request(&self, role: ServiceRole) -> Option<StartRequest> {
        self.calls().into_iter().rev().find_map(|c| match c {
            Call::Start(r, request) if r == role => Some(request),
            _ => None,
        })
    }

    /// Roles of `stop` calls, in the order they were issued.
    pub fn stop_order(&self) -> Vec<ServiceRole> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                Call::Stop(role, _) => Some(*role),
                _ => None,
            })
            .collect()
    }
}

/// Scripted [`RemoteService`] double.
#[derive(Debug, Clone)]
pub struct LoopbackService {
    role: ServiceRole,
    journal: CallJournal,
    definition: Result<ServiceDefinition, ServiceError>,
    start_delay: Duration,
    start_outcome: Result<(), ServiceError>,
    start_panic: Option<String>,
    stop_delay: Duration,
    stop_outcome: Result<StopResult, ServiceError>,
}

impl LoopbackService {
    /// Core-network double with four ports and a clean stop.
    pub fn core_network(journal: CallJournal) -> Self {
        Self::new(
            ServiceRole::CoreNetwork,
            journal,
            ServiceDefinition::new("127.0.0.1", vec![2000, 2001, 2002, 2003]),
        )
    }

    /// Base-station double with four ports and a clean stop.
    pub fn base_station(journal: CallJournal) -> Self {
        Self::new(
            ServiceRole::BaseStation,
            journal,
            ServiceDefinition::new("127.0.0.1", vec![2100, 2101, 2102, 2103]),
        )
    }

    fn new(role: ServiceRole, journal: CallJournal, definition: ServiceDefinition) -> Self {
        Self {
            role,
            journal,
            definition: Ok(definition),
            start_delay: Duration::ZERO,
            start_outcome: Ok(()),
            start_panic: None,
            stop_delay: Duration::ZERO,
            stop_outcome: Ok(StopResult {
                exit_code: 0,
                artifacts: vec![format!("{}.log", role.as_str())],
            }),
        }
    }

    pub fn with_definition(mut self, definition: ServiceDefinition) -> Self {
        self.definition = Ok(definition);
        self
    }

    pub fn with_definition_error(mut self, err: ServiceError) -> Self {
        self.definition = Err(err);
        self
    }

    /// Delay before `start` replies. Longer than the startup bound means a timeout.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn with_start_error(mut self, err: ServiceError) -> Self {
        self.start_outcome = Err(err);
        self
    }

    /// Panic inside `start` with the given message.
    pub fn with_start_panic(mut self, message: impl Into<String>) -> Self {
        self.start_panic = Some(message.into());
        self
    }

    pub fn with_stop_delay(mut self, delay: Duration) -> Self {
        self.stop_delay = delay;
        self
    }

    pub fn with_stop_error(mut self, err: ServiceError) -> Self {
        self.stop_outcome = Err(err);
        self
    }

    /// Report a non-zero exit code from `stop`, as if the process crashed mid-run.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        if let Ok(result) = &mut self.stop_outcome {
            result.exit_code = exit_code;
        }
        self
    }
}

impl RemoteService for LoopbackService {
    async fn get_definition(&self) -> Result<ServiceDefinition, ServiceError> {
        self.journal.record(Call::GetDefinition(self.role));
        self.definition.clone()
    }

    async fn start(&mut self, request: &StartRequest) -> Result<(), ServiceError> {
        self.journal.record(Call::Start(self.role, request.clone()));
        if let Some(message) = &self.start_panic {
            panic!("{message}");
        }
        if !self.start_delay.is_zero() {
            tokio::time::sleep(self.start_delay).await;
        }
        self.start_outcome.clone()
    }

    async fn stop(&mut self, params: StopParams) -> Result<StopResult, ServiceError> {
        self.journal.record(Call::Stop(self.role, params));
        if !self.stop_delay.is_zero() {
            tokio::time::sleep(self.stop_delay).await;
        }
        self.stop_outcome.clone()
    }
}

/// Scripted [`Diagnostics`] double.
#[derive(Debug, Clone, Default)]
pub struct LoopbackDiagnostics {
    journal: CallJournal,
    logs: HashMap<ServiceRole, LogFindings>,
    kpis: HashMap<ServiceRole, KpiCounters>,
    log_error: Option<DiagnosticsError>,
    kpi_error: Option<DiagnosticsError>,
}

impl LoopbackDiagnostics {
    /// Clean logs and zero KOs for every service.
    pub fn new(journal: CallJournal) -> Self {
        Self {
            journal,
            ..Default::default()
        }
    }

    pub fn with_logs(mut self, role: ServiceRole, findings: LogFindings) -> Self {
        self.logs.insert(role, findings);
        self
    }

    pub fn with_kpis(mut self, role: ServiceRole, kpis: KpiCounters) -> Self {
        self.kpis.insert(role, kpis);
        self
    }

    pub fn with_log_error(mut self, err: DiagnosticsError) -> Self {
        self.log_error = Some(err);
        self
    }

    pub fn with_kpi_error(mut self, err: DiagnosticsError) -> Self {
        self.kpi_error = Some(err);
        self
    }
}

impl Diagnostics for LoopbackDiagnostics {
    async fn search_logs(
        &self,
        role: ServiceRole,
        _stop: &StopResult,
    ) -> Result<LogFindings, DiagnosticsError> {
        self.journal.record(Call::SearchLogs(role));
        match &self.log_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.logs.get(&role).cloned().unwrap_or_default()),
        }
    }

    async fn fetch_kpis(
        &self,
        role: ServiceRole,
        _stop: &StopResult,
    ) -> Result<KpiCounters, DiagnosticsError> {
        self.journal.record(Call::FetchKpis(role));
        match &self.kpi_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.kpis.get(&role).cloned().unwrap_or_default()),
        }
    }
}
