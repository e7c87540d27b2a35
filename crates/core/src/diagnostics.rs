//! 종료 시점 진단 — 로그 검색 및 KPI 카운터 수집 협력자 계약
//!
//! 로그 스크래핑 휴리스틱과 아티팩트 저장은 외부 협력자의 책임입니다.
//! 오케스트레이터는 [`Diagnostics`] trait을 통해 구조화된 결과만 받습니다.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::DiagnosticsError;
use crate::types::{ServiceRole, StopResult};

/// 진단 협력자 trait
pub trait Diagnostics: Send + Sync {
    /// 정지된 서비스의 로그에서 에러/경고 마커를 검색합니다.
    fn search_logs(
        &self,
        role: ServiceRole,
        stop: &StopResult,
    ) -> impl Future<Output = Result<LogFindings, DiagnosticsError>> + Send;

    /// 정지된 서비스가 보고한 KPI 카운터를 가져옵니다.
    fn fetch_kpis(
        &self,
        role: ServiceRole,
        stop: &StopResult,
    ) -> impl Future<Output = Result<KpiCounters, DiagnosticsError>> + Send;
}

/// 로그 검색 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFindings {
    /// 에러(치명) 마커가 포함된 로그 라인
    pub errors: Vec<String>,
    /// 경고 마커가 포함된 로그 라인
    pub warnings: Vec<String>,
}

impl LogFindings {
    /// 에러도 경고도 없는지 여부
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 서비스가 보고한 KPI 카운터
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiCounters {
    /// 상향 평균 비트레이트 (bps)
    pub ul_bitrate_bps: f64,
    /// 하향 평균 비트레이트 (bps)
    pub dl_bitrate_bps: f64,
    /// 상향 KO 수
    pub nof_ko_ul: u64,
    /// 하향 KO 수
    pub nof_ko_dl: u64,
}

impl KpiCounters {
    /// 상향 + 하향 KO 합계
    pub fn total_kos(&self) -> u64 {
        self.nof_ko_ul.saturating_add(self.nof_ko_dl)
    }
}
