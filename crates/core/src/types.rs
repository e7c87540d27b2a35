//! 도메인 타입 — 원격 제어 평면에서 주고받는 값 객체
//!
//! 모든 값은 생성 후 변경되지 않습니다. 요청은 호출마다 새로 만들어 전송합니다.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 원격 서비스의 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceRole {
    /// 코어 네트워크 테스트 더블 (5GC)
    CoreNetwork,
    /// 기지국 테스트 더블 (gNB)
    BaseStation,
}

impl ServiceRole {
    /// 메트릭 레이블 및 로그용 짧은 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoreNetwork => "5gc",
            Self::BaseStation => "gnb",
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사업자 식별자 (PLMN)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plmn {
    /// Mobile Country Code (3자리)
    pub mcc: String,
    /// Mobile Network Code (2~3자리)
    pub mnc: String,
}

impl Plmn {
    /// PLMN 생성
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Self {
        Self {
            mcc: mcc.into(),
            mnc: mnc.into(),
        }
    }

    /// 자릿수 규칙 검증 — MCC 3자리, MNC 2~3자리 십진수
    pub fn is_valid(&self) -> bool {
        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        self.mcc.len() == 3
            && digits(&self.mcc)
            && (2..=3).contains(&self.mnc.len())
            && digits(&self.mnc)
    }
}

impl Default for Plmn {
    fn default() -> Self {
        Self::new("001", "01")
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mcc, self.mnc)
    }
}

/// 서비스 정의
///
/// 서비스에 도달한 뒤 한 번 받아오는 주소 정보입니다.
/// 다른 서비스가 상호 연동에 필요로 하는 전송 엔드포인트와
/// 순서가 있는 서브채널 포트 목록을 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// 전송 엔드포인트 (예: `"10.12.1.2"`)
    pub endpoint: String,
    /// 서브채널 포트 목록 (안테나 순서)
    pub ports: Vec<u16>,
}

impl ServiceDefinition {
    /// 정의 생성
    pub fn new(endpoint: impl Into<String>, ports: Vec<u16>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ports,
        }
    }

    /// 포트 목록을 앞에서부터 최대 `count`개로 잘라낸 사본을 반환합니다.
    ///
    /// 결과 길이는 `min(count, self.ports.len())`입니다.
    pub fn trimmed(&self, count: usize) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            ports: self.ports.iter().take(count).copied().collect(),
        }
    }
}

/// 시작 요청에 동봉되는 타임아웃과 후처리 명령
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartInfo {
    /// 원격이 시작을 완료해야 하는 시간
    pub timeout: Duration,
    /// 시작 후 적용할 설정 지시어 (순서 유지)
    pub post_commands: Vec<String>,
}

impl StartInfo {
    /// 후처리 명령 없는 StartInfo
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            post_commands: Vec::new(),
        }
    }

    /// 지시어를 공백 하나로 이어 붙인 명령줄
    pub fn post_command_line(&self) -> String {
        self.post_commands.join(" ")
    }
}

/// 안테나 설정 지시어
///
/// 하향/상향 안테나 수를 동일하게 설정합니다.
pub fn antenna_directive(nof_antennas: usize) -> String {
    format!("cell_cfg --nof_antennas_dl {nof_antennas} --nof_antennas_ul {nof_antennas}")
}

/// 서비스 `Start` 요청
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    /// 사업자 식별자
    pub plmn: Plmn,
    /// 상대 서비스의 정의 (기지국 요청에서 코어 네트워크 정의)
    pub peer: Option<ServiceDefinition>,
    /// 자기 무선 채널 주소 (기지국 요청에서 자신의 정의, 안테나 수로 잘림)
    pub radio: Option<ServiceDefinition>,
    /// 타임아웃 및 후처리 명령
    pub start_info: StartInfo,
}

/// 서비스 `Stop` 파라미터
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopParams {
    /// 정지 타임아웃 (0 = 명시적 제한 없음, best-effort)
    pub timeout: Duration,
}

impl StopParams {
    /// 명시적 타임아웃이 설정되었는지 여부
    pub fn is_bounded(&self) -> bool {
        !self.timeout.is_zero()
    }
}

/// `Stop` 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResult {
    /// 원격 프로세스 종료 코드 (0이 아니면 실행 중 크래시)
    pub exit_code: i32,
    /// 수집된 로그 아티팩트 식별자
    pub artifacts: Vec<String>,
}

impl StopResult {
    /// 원격 프로세스가 비정상 종료했는지 여부
    pub fn crashed(&self) -> bool {
        self.exit_code != 0
    }
}
