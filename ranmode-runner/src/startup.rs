//! Startup sequencing for the core network and base station.
//!
//! # State machine
//!
//! ```text
//! Idle → CoreStarting → CoreReady → EdgeStarting → BothReady
//!   └────────┴─────────────┴────────────┴──→ Failed(service, cause)
//! ```
//!
//! The core network is always started strictly before the base station,
//! because the base-station request carries the core's definition.
//! Startup never stops anything; teardown belongs to
//! [`ShutdownCoordinator`](crate::shutdown::ShutdownCoordinator).

use std::fmt;

use serde::Serialize;
use tokio::time::Instant;

use ranmode_core::error::ServiceError;
use ranmode_core::metrics as m;
use ranmode_core::params::SessionParameters;
use ranmode_core::service::{RemoteService, ServiceHandle};
use ranmode_core::types::{
    ServiceDefinition, ServiceRole, StartInfo, StartRequest, antenna_directive,
};

/// Startup progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StartupState {
    Idle,
    CoreStarting,
    CoreReady,
    EdgeStarting,
    BothReady,
    Failed {
        service: ServiceRole,
        cause: ServiceError,
    },
}

impl StartupState {
    /// Both services are running and the session may begin.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::BothReady)
    }

    /// The service a call was in flight against while in this state.
    pub fn service_in_flight(&self) -> Option<ServiceRole> {
        match self {
            Self::Idle | Self::CoreStarting => Some(ServiceRole::CoreNetwork),
            Self::CoreReady | Self::EdgeStarting => Some(ServiceRole::BaseStation),
            Self::BothReady | Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for StartupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CoreStarting => write!(f, "core_starting"),
            Self::CoreReady => write!(f, "core_ready"),
            Self::EdgeStarting => write!(f, "edge_starting"),
            Self::BothReady => write!(f, "both_ready"),
            Self::Failed { service, cause } => write!(f, "failed({service}: {cause})"),
        }
    }
}

/// Builds the base-station start request.
///
/// Both the core's definition and the base station's own definition are
/// trimmed to the antenna count. Post commands are the antenna directive
/// followed by `extra_config`, verbatim, when it is not blank.
pub fn base_station_request(
    params: &SessionParameters,
    core: &ServiceDefinition,
    own: &ServiceDefinition,
) -> StartRequest {
    let mut post_commands = vec![antenna_directive(params.nof_antennas)];
    if !params.extra_config.trim().is_empty() {
        post_commands.push(params.extra_config.clone());
    }

    StartRequest {
        plmn: params.plmn.clone(),
        peer: Some(core.trimmed(params.nof_antennas)),
        radio: Some(own.trimmed(params.nof_antennas)),
        start_info: StartInfo {
            timeout: params.base_station_startup_timeout,
            post_commands,
        },
    }
}

/// Core-network start request: PLMN and timeout, no post commands.
pub fn core_network_request(params: &SessionParameters) -> StartRequest {
    StartRequest {
        plmn: params.plmn.clone(),
        peer: None,
        radio: None,
        start_info: StartInfo::with_timeout(params.core_network_startup_timeout),
    }
}

/// Drives the startup state machine over two service handles.
pub struct StartupCoordinator<'a> {
    params: &'a SessionParameters,
    state: StartupState,
}

impl<'a> StartupCoordinator<'a> {
    pub fn new(params: &'a SessionParameters) -> Self {
        Self {
            params,
            state: StartupState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &StartupState {
        &self.state
    }

    /// Runs the sequence to `BothReady` or `Failed`.
    ///
    /// Failures are returned as a state, never as an error, so the caller
    /// always reaches teardown.
    pub async fn run<C, G>(
        &mut self,
        core: &mut ServiceHandle<C>,
        edge: &mut ServiceHandle<G>,
    ) -> StartupState
    where
        C: RemoteService,
        G: RemoteService,
    {
        if self.state != StartupState::Idle {
            tracing::warn!(state = %self.state, "startup already ran, ignoring");
            return self.state.clone();
        }

        // Idle → CoreStarting
        self.state = StartupState::CoreStarting;
        let core_def = match core
            .define(self.params.core_network_startup_timeout)
            .await
        {
            Ok(def) => def,
            Err(e) => return self.fail(ServiceRole::CoreNetwork, e),
        };

        // CoreStarting → CoreReady
        let request = core_network_request(self.params);
        if let Err(e) = start_timed(core, &request).await {
            return self.fail(ServiceRole::CoreNetwork, e);
        }
        self.state = StartupState::CoreReady;
        tracing::info!(service = %ServiceRole::CoreNetwork, "service started");

        // CoreReady → EdgeStarting
        let edge_def = match edge
            .define(self.params.base_station_startup_timeout)
            .await
        {
            Ok(def) => def,
            Err(e) => return self.fail(ServiceRole::BaseStation, e),
        };
        let request = base_station_request(self.params, &core_def, &edge_def);
        self.state = StartupState::EdgeStarting;
        tracing::debug!(
            peer_ports = request.peer.as_ref().map_or(0, |d| d.ports.len()),
            radio_ports = request.radio.as_ref().map_or(0, |d| d.ports.len()),
            post_commands = %request.start_info.post_command_line(),
            "base station request built"
        );

        // EdgeStarting → BothReady
        if let Err(e) = start_timed(edge, &request).await {
            return self.fail(ServiceRole::BaseStation, e);
        }
        self.state = StartupState::BothReady;
        tracing::info!(service = %ServiceRole::BaseStation, "service started");

        self.state.clone()
    }

    /// Converts an escaped panic into a startup failure of the in-flight service.
    pub fn fault(&mut self, message: impl Into<String>) -> StartupState {
        let service = self
            .state
            .service_in_flight()
            .unwrap_or(ServiceRole::BaseStation);
        self.fail(service, ServiceError::Fault(message.into()))
    }

    /// Failed-state handler. Runs at most once per coordinator.
    fn fail(&mut self, service: ServiceRole, cause: ServiceError) -> StartupState {
        if let StartupState::Failed { .. } = self.state {
            tracing::warn!(
                service = %service,
                cause = %cause,
                "startup already failed, ignoring"
            );
            return self.state.clone();
        }

        tracing::error!(
            service = %service,
            cause = %cause,
            kind = cause.kind(),
            from_state = %self.state,
            "startup failed"
        );
        metrics::counter!(
            m::STARTUP_FAILURES_TOTAL,
            m::LABEL_SERVICE => service.as_str(),
            m::LABEL_CAUSE => cause.kind()
        )
        .increment(1);

        self.state = StartupState::Failed { service, cause };
        self.state.clone()
    }
}

async fn start_timed<S: RemoteService>(
    handle: &mut ServiceHandle<S>,
    request: &StartRequest,
) -> Result<(), ServiceError> {
    let role = handle.role();
    metrics::counter!(m::STARTUP_ATTEMPTS_TOTAL, m::LABEL_SERVICE => role.as_str()).increment(1);

    let started = Instant::now();
    let result = handle.start(request).await;
    metrics::histogram!(m::STARTUP_DURATION_SECONDS, m::LABEL_SERVICE => role.as_str())
        .record(started.elapsed().as_secs_f64());
    result
}
