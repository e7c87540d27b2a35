//! 세션 파라미터 — 한 번의 실행 동안 변하지 않는 테스트 튜너블

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RanmodeConfig;
use crate::types::{Plmn, StopParams};

/// 결과 판정 정책 플래그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// 성공해도 아티팩트를 항상 요청
    pub always_download_artifacts: bool,
    /// 종료 후 로그 검색 수행
    pub log_search: bool,
    /// 경고를 에러로 승격
    pub warning_as_errors: bool,
    /// KO 카운터가 있으면 실패
    pub fail_if_kos: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            always_download_artifacts: true,
            log_search: true,
            warning_as_errors: true,
            fail_if_kos: true,
        }
    }
}

/// 세션 파라미터
///
/// 설정 로더가 해석한 값으로부터 만들어지며 실행 중 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParameters {
    /// 사업자 식별자
    pub plmn: Plmn,
    /// 테스트 대상 안테나 수
    pub nof_antennas: usize,
    /// 추가 설정 지시어
    pub extra_config: String,
    /// 세션 유지 시간
    pub duration: Duration,
    /// 코어 네트워크 시작 타임아웃
    pub core_network_startup_timeout: Duration,
    /// 기지국 시작 타임아웃
    pub base_station_startup_timeout: Duration,
    /// 코어 네트워크 정지 타임아웃 (0 = 제한 없음)
    pub core_network_stop_timeout: Duration,
    /// 기지국 정지 타임아웃 (0 = 제한 없음)
    pub base_station_stop_timeout: Duration,
    /// 판정 정책
    pub policy: Policy,
}

impl SessionParameters {
    /// 검증된 설정에서 파라미터를 만듭니다.
    pub fn from_config(config: &RanmodeConfig) -> Self {
        Self {
            plmn: config.session.plmn(),
            nof_antennas: config.session.nof_antennas,
            extra_config: config.session.extra_config.clone(),
            duration: Duration::from_secs(config.session.duration_secs),
            core_network_startup_timeout: Duration::from_secs(
                config.timeouts.core_network_startup_secs,
            ),
            base_station_startup_timeout: Duration::from_secs(
                config.timeouts.base_station_startup_secs,
            ),
            core_network_stop_timeout: Duration::from_secs(config.timeouts.core_network_stop_secs),
            base_station_stop_timeout: Duration::from_secs(config.timeouts.base_station_stop_secs),
            policy: Policy {
                always_download_artifacts: config.policy.always_download_artifacts,
                log_search: config.policy.log_search,
                warning_as_errors: config.policy.warning_as_errors,
                fail_if_kos: config.policy.fail_if_kos,
            },
        }
    }

    /// 코어 네트워크 정지 파라미터
    pub fn core_network_stop(&self) -> StopParams {
        StopParams {
            timeout: self.core_network_stop_timeout,
        }
    }

    /// 기지국 정지 파라미터
    pub fn base_station_stop(&self) -> StopParams {
        StopParams {
            timeout: self.base_station_stop_timeout,
        }
    }
}

impl Default for SessionParameters {
    fn default() -> Self {
        Self::from_config(&RanmodeConfig::default())
    }
}
