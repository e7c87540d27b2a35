//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 오케스트레이션 단계는 이 상수로 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `ranmode_`
//! - 단계명: `startup_`, `session_`, `shutdown_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 서비스 레이블 키 (5gc, gnb)
pub const LABEL_SERVICE: &str = "service";

/// 원인 레이블 키 (transport, startup_timeout, rejected, ...)
pub const LABEL_CAUSE: &str = "cause";

/// 결과 레이블 키 (success, soft_warning, startup_failure, runtime_failure)
pub const LABEL_OUTCOME: &str = "outcome";

// ─── Startup 메트릭 ─────────────────────────────────────────────────

/// Startup: 서비스 시작 시도 수 (counter, label: service)
pub const STARTUP_ATTEMPTS_TOTAL: &str = "ranmode_startup_attempts_total";

/// Startup: 서비스 시작 실패 수 (counter, label: service, cause)
pub const STARTUP_FAILURES_TOTAL: &str = "ranmode_startup_failures_total";

/// Startup: 서비스 시작 소요 시간 (histogram, 초, label: service)
pub const STARTUP_DURATION_SECONDS: &str = "ranmode_startup_duration_seconds";

// ─── Session 메트릭 ─────────────────────────────────────────────────

/// Session: 실제 세션 유지 시간 (histogram, 초)
pub const SESSION_WINDOW_SECONDS: &str = "ranmode_session_window_seconds";

/// Session: 세션 진행 중 여부 (gauge, 0/1)
pub const SESSION_ACTIVE: &str = "ranmode_session_active";

// ─── Shutdown 메트릭 ────────────────────────────────────────────────

/// Shutdown: 정지 실패 수 (counter, label: service, cause)
pub const SHUTDOWN_STOP_FAILURES_TOTAL: &str = "ranmode_shutdown_stop_failures_total";

/// Shutdown: 실행 중 크래시 수 (counter, label: service)
pub const SHUTDOWN_CRASHES_TOTAL: &str = "ranmode_shutdown_crashes_total";

/// Shutdown: 로그 에러 라인 수 (counter, label: service)
pub const SHUTDOWN_LOG_ERRORS_TOTAL: &str = "ranmode_shutdown_log_errors_total";

/// Shutdown: 로그 경고 라인 수 (counter, label: service)
pub const SHUTDOWN_LOG_WARNINGS_TOTAL: &str = "ranmode_shutdown_log_warnings_total";

/// Shutdown: KO 수 (counter, label: service)
pub const SHUTDOWN_KOS_TOTAL: &str = "ranmode_shutdown_kos_total";

// ─── Run 메트릭 ─────────────────────────────────────────────────────

/// Run: 실행 결과 수 (counter, label: outcome)
pub const RUN_OUTCOMES_TOTAL: &str = "ranmode_run_outcomes_total";

/// Run: 빌드 정보 (gauge, label: version)
pub const RUN_BUILD_INFO: &str = "ranmode_build_info";

/// 모든 메트릭 설명을 등록합니다.
///
/// 전역 recorder 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    describe_counter!(STARTUP_ATTEMPTS_TOTAL, "Start calls issued per service");
    describe_counter!(
        STARTUP_FAILURES_TOTAL,
        "Startup failures per service and cause"
    );
    describe_histogram!(
        STARTUP_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Time from Start call to reply per service"
    );
    describe_histogram!(
        SESSION_WINDOW_SECONDS,
        metrics::Unit::Seconds,
        "Measured length of the session window"
    );
    describe_gauge!(SESSION_ACTIVE, "1 while the session window is open");
    describe_counter!(
        SHUTDOWN_STOP_FAILURES_TOTAL,
        "Failed Stop calls per service and cause"
    );
    describe_counter!(
        SHUTDOWN_CRASHES_TOTAL,
        "Services that exited non-zero during the run"
    );
    describe_counter!(SHUTDOWN_LOG_ERRORS_TOTAL, "Error lines found in service logs");
    describe_counter!(
        SHUTDOWN_LOG_WARNINGS_TOTAL,
        "Warning lines found in service logs"
    );
    describe_counter!(SHUTDOWN_KOS_TOTAL, "KO events reported by services");
    describe_counter!(RUN_OUTCOMES_TOTAL, "Resolved run outcomes");
    describe_gauge!(RUN_BUILD_INFO, "Build information (always 1)");
}
