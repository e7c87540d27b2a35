//! 원격 서비스 제어 — 테스트 더블 제어 계약과 핸들 생명주기 관리
//!
//! [`RemoteService`] trait은 원격 프로세스 하나에 대한 제어 채널을 추상화합니다.
//! 실제 RPC 전송 구현과 테스트용 loopback 더블이 같은 trait을 구현합니다.
//!
//! [`ServiceHandle`]은 클라이언트를 감싸 역할, 생명주기 상태, 호출 타임아웃을 관리합니다.
//!
//! # 생명주기
//! ```text
//! Created → define() → Defined → start() → Starting → Running → stop() → Stopped
//!                                             └── 실패 → Failed ──┘
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::types::{ServiceDefinition, ServiceRole, StartRequest, StopParams, StopResult};

/// 원격 테스트 더블 제어 trait
///
/// 모든 호출은 응답 또는 전송 에러가 도착할 때까지 호출 흐름을 멈춥니다.
///
/// # 구현 예시
/// ```ignore
/// struct GrpcCoreClient { /* channel */ }
///
/// impl RemoteService for GrpcCoreClient {
///     async fn get_definition(&self) -> Result<ServiceDefinition, ServiceError> { ... }
///     async fn start(&mut self, request: &StartRequest) -> Result<(), ServiceError> { ... }
///     async fn stop(&mut self, params: StopParams) -> Result<StopResult, ServiceError> { ... }
/// }
/// ```
pub trait RemoteService: Send {
    /// 서비스 정의를 조회합니다.
    ///
    /// 원격에 도달할 수 없으면 `Transport`, 응답을 해석할 수 없으면 `Protocol`.
    fn get_definition(
        &self,
    ) -> impl Future<Output = Result<ServiceDefinition, ServiceError>> + Send;

    /// 서비스를 시작합니다.
    ///
    /// 원격의 명시적 거부는 `Rejected(reason)`으로 반환합니다.
    fn start(
        &mut self,
        request: &StartRequest,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    /// 서비스를 정지하고 수집된 진단 정보를 반환합니다.
    ///
    /// 정지 후 같은 핸들에 `start`를 다시 호출하지 않습니다.
    fn stop(
        &mut self,
        params: StopParams,
    ) -> impl Future<Output = Result<StopResult, ServiceError>> + Send;
}

/// 핸들 생명주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleState {
    /// 생성됨 (원격 호출 전)
    Created,
    /// 서비스 정의 수신 완료
    Defined,
    /// 시작 요청 진행 중
    Starting,
    /// 시작 완료
    Running,
    /// 정지됨
    Stopped,
    /// 오류 상태
    Failed,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Defined => write!(f, "defined"),
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// 원격 서비스 핸들
///
/// 한 번의 테스트 실행 동안 오케스트레이터가 독점 소유합니다.
/// `start` 시도 여부와 `stop` 시도 여부를 기록하여
/// 종료 단계가 정지해야 할 서비스를 판단할 수 있게 합니다.
pub struct ServiceHandle<S> {
    role: ServiceRole,
    client: S,
    state: HandleState,
    definition: Option<ServiceDefinition>,
    start_attempted: bool,
    stop_attempted: bool,
}

impl<S: RemoteService> ServiceHandle<S> {
    /// 새 핸들을 생성합니다.
    pub fn new(role: ServiceRole, client: S) -> Self {
        Self {
            role,
            client,
            state: HandleState::Created,
            definition: None,
            start_attempted: false,
            stop_attempted: false,
        }
    }

    /// 서비스 역할
    pub fn role(&self) -> ServiceRole {
        self.role
    }

    /// 현재 상태
    pub fn state(&self) -> HandleState {
        self.state
    }

    /// 수신한 서비스 정의
    pub fn definition(&self) -> Option<&ServiceDefinition> {
        self.definition.as_ref()
    }

    /// `start` 호출이 시도되었는지 여부
    pub fn start_attempted(&self) -> bool {
        self.start_attempted
    }

    /// 종료 단계에서 정지가 필요한지 여부
    ///
    /// 시작을 시도했고 아직 정지를 시도하지 않은 경우에만 `true`입니다.
    /// 시작이 타임아웃으로 실패한 서비스도 포함됩니다.
    pub fn needs_stop(&self) -> bool {
        self.start_attempted && !self.stop_attempted
    }

    /// 내부 클라이언트 참조
    pub fn client(&self) -> &S {
        &self.client
    }

    /// 서비스 정의를 조회하고 보관합니다.
    ///
    /// `bound` 안에 응답이 없으면 `Transport` 에러로 처리합니다.
    pub async fn define(&mut self, bound: Duration) -> Result<ServiceDefinition, ServiceError> {
        if self.state == HandleState::Stopped {
            return Err(ServiceError::InvalidState(format!(
                "{}: get_definition after stop",
                self.role
            )));
        }

        let result = match tokio::time::timeout(bound, self.client.get_definition()).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Transport(format!(
                "no definition reply within {bound:?}"
            ))),
        };

        match result {
            Ok(definition) => {
                tracing::debug!(
                    service = %self.role,
                    endpoint = %definition.endpoint,
                    ports = definition.ports.len(),
                    "service definition received"
                );
                self.definition = Some(definition.clone());
                self.state = HandleState::Defined;
                Ok(definition)
            }
            Err(e) => {
                self.state = HandleState::Failed;
                Err(e)
            }
        }
    }

    /// 서비스를 시작합니다.
    ///
    /// `request.start_info.timeout` 안에 응답이 없으면 `StartupTimeout`입니다.
    /// 타임아웃이 발생해도 원격 작업은 취소되지 않으며 핸들은 "시작 시도됨"으로 남습니다.
    pub async fn start(&mut self, request: &StartRequest) -> Result<(), ServiceError> {
        match self.state {
            HandleState::Stopped => {
                return Err(ServiceError::InvalidState(format!(
                    "{}: start after stop",
                    self.role
                )));
            }
            HandleState::Starting | HandleState::Running => {
                return Err(ServiceError::InvalidState(format!(
                    "{}: already started",
                    self.role
                )));
            }
            _ => {}
        }

        let timeout = request.start_info.timeout;
        self.start_attempted = true;
        self.state = HandleState::Starting;

        let result = match tokio::time::timeout(timeout, self.client.start(request)).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::StartupTimeout { timeout }),
        };

        self.state = match result {
            Ok(()) => HandleState::Running,
            Err(_) => HandleState::Failed,
        };
        result
    }

    /// 서비스를 정지합니다.
    ///
    /// 정지는 핸들당 한 번만 시도됩니다. 실패해도 재시도하지 않습니다.
    /// `params.timeout`이 0이면 명시적 제한 없이 응답을 기다립니다.
    pub async fn stop(&mut self, params: StopParams) -> Result<StopResult, ServiceError> {
        if self.stop_attempted {
            return Err(ServiceError::InvalidState(format!(
                "{}: already stopped",
                self.role
            )));
        }
        self.stop_attempted = true;

        let result = if params.is_bounded() {
            match tokio::time::timeout(params.timeout, self.client.stop(params)).await {
                Ok(result) => result,
                Err(_) => Err(ServiceError::StopTimeout {
                    timeout: params.timeout,
                }),
            }
        } else {
            self.client.stop(params).await
        };

        self.state = match result {
            Ok(_) => HandleState::Stopped,
            Err(_) => HandleState::Failed,
        };
        result
    }
}
