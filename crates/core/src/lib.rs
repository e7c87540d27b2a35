#![doc = include_str!("../README.md")]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod metrics;
pub mod outcome;
pub mod params;
pub mod service;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, DiagnosticsError, RanmodeError, ServiceError};

// 설정
pub use config::RanmodeConfig;
pub use params::{Policy, SessionParameters};

// 협력자 trait
pub use diagnostics::{Diagnostics, KpiCounters, LogFindings};
pub use service::{HandleState, RemoteService, ServiceHandle};

// 결과
pub use outcome::{Outcome, OutcomeResolver, ResolvedOutcome, RuntimeCause, WarningKind};

// 도메인 타입
pub use types::{
    Plmn, ServiceDefinition, ServiceRole, StartInfo, StartRequest, StopParams, StopResult,
};
