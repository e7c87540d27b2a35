//! 설정 관리 — ranmode.toml 파싱 및 런타임 설정
//!
//! [`RanmodeConfig`]는 한 번의 테스트 모드 실행에 필요한 모든 설정을 담는 최상위 구조체입니다.
//! 설정 템플릿 렌더링은 이 크레이트의 범위가 아니며, 이미 해석된 값만 읽습니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`RANMODE_SESSION_NOF_ANTENNAS=4` 형식)
//! 3. 설정 파일 (`ranmode.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), ranmode_core::error::RanmodeError> {
//! use ranmode_core::config::RanmodeConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = RanmodeConfig::load("ranmode.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = RanmodeConfig::parse("[session]\nnof_antennas = 4")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, RanmodeError};
use crate::types::Plmn;

/// ranmode 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RanmodeConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 테스트 세션 설정
    #[serde(default)]
    pub session: SessionConfig,
    /// 원격 호출 타임아웃
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// 결과 판정 정책
    #[serde(default)]
    pub policy: PolicyConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl RanmodeConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RanmodeError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RanmodeError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RanmodeError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RanmodeError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, RanmodeError> {
        toml::from_str(toml_str).map_err(|e| {
            RanmodeError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `RANMODE_{SECTION}_{FIELD}`
    /// 예: `RANMODE_POLICY_FAIL_IF_KOS=false`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "RANMODE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "RANMODE_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.report_path, "RANMODE_GENERAL_REPORT_PATH");

        // Session
        override_usize(
            &mut self.session.nof_antennas,
            "RANMODE_SESSION_NOF_ANTENNAS",
        );
        override_string(
            &mut self.session.extra_config,
            "RANMODE_SESSION_EXTRA_CONFIG",
        );
        override_u64(
            &mut self.session.duration_secs,
            "RANMODE_SESSION_DURATION_SECS",
        );
        override_string(&mut self.session.mcc, "RANMODE_SESSION_MCC");
        override_string(&mut self.session.mnc, "RANMODE_SESSION_MNC");

        // Timeouts
        override_u64(
            &mut self.timeouts.core_network_startup_secs,
            "RANMODE_TIMEOUTS_CORE_NETWORK_STARTUP_SECS",
        );
        override_u64(
            &mut self.timeouts.base_station_startup_secs,
            "RANMODE_TIMEOUTS_BASE_STATION_STARTUP_SECS",
        );
        override_u64(
            &mut self.timeouts.core_network_stop_secs,
            "RANMODE_TIMEOUTS_CORE_NETWORK_STOP_SECS",
        );
        override_u64(
            &mut self.timeouts.base_station_stop_secs,
            "RANMODE_TIMEOUTS_BASE_STATION_STOP_SECS",
        );

        // Policy
        override_bool(
            &mut self.policy.always_download_artifacts,
            "RANMODE_POLICY_ALWAYS_DOWNLOAD_ARTIFACTS",
        );
        override_bool(&mut self.policy.log_search, "RANMODE_POLICY_LOG_SEARCH");
        override_bool(
            &mut self.policy.warning_as_errors,
            "RANMODE_POLICY_WARNING_AS_ERRORS",
        );
        override_bool(&mut self.policy.fail_if_kos, "RANMODE_POLICY_FAIL_IF_KOS");

        // Metrics
        override_bool(&mut self.metrics.enabled, "RANMODE_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "RANMODE_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "RANMODE_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), RanmodeError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.session.nof_antennas == 0 {
            return Err(invalid("session.nof_antennas", "must be at least 1"));
        }

        if !self.session.plmn().is_valid() {
            return Err(invalid(
                "session.mcc/mnc",
                "mcc must be 3 digits and mnc 2 or 3 digits",
            ));
        }

        // 시작 타임아웃 0은 즉시 실패를 의미하므로 허용하지 않음
        if self.timeouts.core_network_startup_secs == 0 {
            return Err(invalid(
                "timeouts.core_network_startup_secs",
                "must be greater than 0",
            ));
        }
        if self.timeouts.base_station_startup_secs == 0 {
            return Err(invalid(
                "timeouts.base_station_startup_secs",
                "must be greater than 0",
            ));
        }

        if self.metrics.enabled {
            if self.metrics.endpoint != "/metrics" {
                return Err(invalid("metrics.endpoint", "only '/metrics' is supported"));
            }
            if self.metrics.port == 0 {
                return Err(invalid("metrics.port", "must be greater than 0"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> RanmodeError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// JSON 결과 리포트 경로 (빈 문자열이면 파일 출력 안 함)
    pub report_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            report_path: String::new(),
        }
    }
}

/// 테스트 세션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 테스트 대상 안테나 수
    pub nof_antennas: usize,
    /// 안테나 지시어 뒤에 붙는 추가 설정 지시어
    pub extra_config: String,
    /// 세션 유지 시간 (초)
    pub duration_secs: u64,
    /// Mobile Country Code
    pub mcc: String,
    /// Mobile Network Code
    pub mnc: String,
}

impl SessionConfig {
    /// PLMN 조합
    pub fn plmn(&self) -> Plmn {
        Plmn::new(self.mcc.clone(), self.mnc.clone())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            nof_antennas: 1,
            extra_config: "test_mode test_ue --rnti 0x44 --cqi 15 --ri 1".to_owned(),
            duration_secs: 5 * 60,
            mcc: "001".to_owned(),
            mnc: "01".to_owned(),
        }
    }
}

/// 원격 호출 타임아웃 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// 코어 네트워크 시작 타임아웃 (초)
    pub core_network_startup_secs: u64,
    /// 기지국 시작 타임아웃 (초)
    pub base_station_startup_secs: u64,
    /// 코어 네트워크 정지 타임아웃 (초, 0 = 제한 없음)
    pub core_network_stop_secs: u64,
    /// 기지국 정지 타임아웃 (초, 0 = 제한 없음)
    pub base_station_stop_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            core_network_startup_secs: 3 * 60,
            base_station_startup_secs: 2,
            core_network_stop_secs: 0,
            base_station_stop_secs: 0,
        }
    }
}

/// 결과 판정 정책
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// 성공해도 아티팩트를 항상 요청
    pub always_download_artifacts: bool,
    /// 종료 후 로그 검색 수행
    pub log_search: bool,
    /// 경고를 에러로 승격
    pub warning_as_errors: bool,
    /// KO 카운터가 있으면 실패
    pub fail_if_kos: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            always_download_artifacts: true,
            log_search: true,
            warning_as_errors: true,
            fail_if_kos: true,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Prometheus 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 수신 주소
    pub listen_addr: String,
    /// 수신 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9464,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
