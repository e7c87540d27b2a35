//! 세션 결과 — 실패 분류와 우선순위 해석
//!
//! # 우선순위
//! 1. 시작 단계 실패 (`StartupFailure`)가 기록되었으면 무조건 최종 결과
//! 2. 아니면 종료 단계에서 처음 발견된 `RuntimeFailure` 또는 `SoftWarning`
//! 3. 아무것도 없으면 `Success`
//!
//! [`OutcomeResolver::resolve`]는 `self`를 소비하므로 실행당 정확히 한 번만 해석됩니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DiagnosticsError, ServiceError};
use crate::types::ServiceRole;

/// 세션 최종 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// 서비스 시작 실패
    StartupFailure {
        service: ServiceRole,
        cause: ServiceError,
    },
    /// 실행 중 크래시 또는 종료 단계 실패
    RuntimeFailure {
        service: ServiceRole,
        cause: RuntimeCause,
    },
    /// 종료 후 진단에서 발견된 비치명 조건
    SoftWarning {
        service: ServiceRole,
        kind: WarningKind,
        detail: String,
    },
    /// 성공
    Success,
}

impl Outcome {
    /// 성공 여부
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// 메트릭 레이블용 이름
    pub fn label(&self) -> &'static str {
        match self {
            Self::StartupFailure { .. } => "startup_failure",
            Self::RuntimeFailure { .. } => "runtime_failure",
            Self::SoftWarning { .. } => "soft_warning",
            Self::Success => "success",
        }
    }

    /// 결과와 관련된 서비스 (성공이면 `None`)
    pub fn service(&self) -> Option<ServiceRole> {
        match self {
            Self::StartupFailure { service, .. }
            | Self::RuntimeFailure { service, .. }
            | Self::SoftWarning { service, .. } => Some(*service),
            Self::Success => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartupFailure { service, cause } => {
                write!(f, "{service} failed to start: {cause}")
            }
            Self::RuntimeFailure { service, cause } => write!(f, "{service} failed: {cause}"),
            Self::SoftWarning {
                service,
                kind,
                detail,
            } => write!(f, "{service} {kind}: {detail}"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// 종료 단계 실패 원인
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeCause {
    /// `Stop` 호출 자체가 실패
    #[error("stop failed: {0}")]
    StopFailed(ServiceError),

    /// 원격 프로세스가 실행 중 비정상 종료
    #[error("crashed during the run (exit code {exit_code})")]
    Crashed { exit_code: i32 },

    /// 진단 협력자 호출 실패
    #[error("{0}")]
    DiagnosticsUnavailable(DiagnosticsError),
}

/// 비치명 경고 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// 로그에 에러 마커 존재
    LogErrors,
    /// `warning_as_errors`로 승격된 경고
    PromotedWarnings,
    /// KPI 카운터에 KO 존재
    #[serde(rename = "kos_detected")]
    KOsDetected,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogErrors => write!(f, "log errors"),
            Self::PromotedWarnings => write!(f, "warnings promoted to errors"),
            Self::KOsDetected => write!(f, "KOs detected"),
        }
    }
}

/// 해석된 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOutcome {
    /// 최종 결과
    pub outcome: Outcome,
    /// 종료 단계에서 발견된 모든 조건 (발견 순서)
    ///
    /// 시작 실패가 최종 결과인 경우 참고용입니다.
    pub findings: Vec<Outcome>,
}

/// 결과 해석기
///
/// 시작 단계와 종료 단계가 발견한 조건을 누적하고
/// 마지막에 우선순위 규칙으로 한 번 해석합니다.
#[derive(Debug, Default)]
pub struct OutcomeResolver {
    startup_failure: Option<Outcome>,
    findings: Vec<Outcome>,
}

impl OutcomeResolver {
    /// 빈 해석기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 시작 실패를 기록합니다.
    ///
    /// 시작 시퀀스는 첫 실패에서 중단되므로 두 번째 기록은 무시합니다.
    pub fn record_startup_failure(&mut self, service: ServiceRole, cause: ServiceError) {
        if self.startup_failure.is_some() {
            tracing::warn!(
                service = %service,
                cause = %cause,
                "startup failure already recorded, ignoring"
            );
            return;
        }
        self.startup_failure = Some(Outcome::StartupFailure { service, cause });
    }

    /// 종료 단계 조건을 발견 순서대로 기록합니다.
    ///
    /// `Success`와 `StartupFailure`는 종료 단계 조건이 아니므로 무시합니다.
    pub fn record_finding(&mut self, finding: Outcome) {
        match finding {
            Outcome::RuntimeFailure { .. } | Outcome::SoftWarning { .. } => {
                self.findings.push(finding);
            }
            Outcome::Success | Outcome::StartupFailure { .. } => {}
        }
    }

    /// 시작 실패가 기록되었는지 여부
    pub fn startup_failed(&self) -> bool {
        self.startup_failure.is_some()
    }

    /// 지금까지 기록된 종료 단계 조건
    pub fn findings(&self) -> &[Outcome] {
        &self.findings
    }

    /// 최종 결과를 해석합니다.
    pub fn resolve(self) -> ResolvedOutcome {
        let outcome = match self.startup_failure {
            Some(failure) => failure,
            None => self.findings.first().cloned().unwrap_or(Outcome::Success),
        };
        ResolvedOutcome {
            outcome,
            findings: self.findings,
        }
    }
}
