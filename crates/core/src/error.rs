//! 에러 타입 — 도메인별 에러 정의

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// ranmode 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum RanmodeError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 원격 서비스 호출 에러
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 원격 서비스 제어 호출 에러
///
/// `GetDefinition` / `Start` / `Stop` 호출의 실패 원인을 분류합니다.
/// 원격이 돌려준 거부 사유는 가공하지 않고 그대로 보존합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ServiceError {
    /// 원격에 도달할 수 없거나 연결이 끊김
    #[error("transport error: {0}")]
    Transport(String),

    /// 응답을 디코딩할 수 없음
    #[error("protocol error: {0}")]
    Protocol(String),

    /// 시작 타임아웃 안에 응답이 오지 않음
    #[error("no start reply within {timeout:?}")]
    StartupTimeout { timeout: Duration },

    /// 정지 타임아웃 안에 응답이 오지 않음
    #[error("no stop reply within {timeout:?}")]
    StopTimeout { timeout: Duration },

    /// 원격이 명시적으로 요청을 거부함
    #[error("remote rejected request: {0}")]
    Rejected(String),

    /// 핸들 상태상 허용되지 않는 호출
    #[error("invalid handle state: {0}")]
    InvalidState(String),

    /// 호출 도중 예기치 못한 내부 결함 (panic 등)
    #[error("internal fault: {0}")]
    Fault(String),
}

impl ServiceError {
    /// 메트릭 레이블용 짧은 원인 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Protocol(_) => "protocol",
            Self::StartupTimeout { .. } => "startup_timeout",
            Self::StopTimeout { .. } => "stop_timeout",
            Self::Rejected(_) => "rejected",
            Self::InvalidState(_) => "invalid_state",
            Self::Fault(_) => "fault",
        }
    }
}

/// 진단 협력자(로그 검색, KPI 수집) 에러
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DiagnosticsError {
    /// 진단 데이터를 가져올 수 없음
    #[error("diagnostics unavailable: {0}")]
    Unavailable(String),

    /// 진단 데이터 형식이 잘못됨
    #[error("malformed diagnostics: {0}")]
    Malformed(String),
}
