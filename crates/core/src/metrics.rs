//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `gamelog_`
//! - 모듈명: `tailer_`, `directory_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(gamelog_core::metrics::TAILER_LINES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 문법 레이블 키 (join, kill, player, chat, line)
pub const LABEL_GRAMMAR: &str = "grammar";

// ─── Tailer 메트릭 ──────────────────────────────────────────────────

/// Tailer: 읽은 완전한 라인 수 (counter)
pub const TAILER_LINES_READ_TOTAL: &str = "gamelog_tailer_lines_read_total";

/// Tailer: 출력 채널로 전달된 이벤트 수 (counter)
pub const TAILER_EVENTS_PUBLISHED_TOTAL: &str = "gamelog_tailer_events_published_total";

/// Tailer: 분류 실패로 건너뛴 라인 수 (counter, label: grammar)
pub const TAILER_PARSE_ERRORS_TOTAL: &str = "gamelog_tailer_parse_errors_total";

/// Tailer: 감지된 로테이션 수 (counter)
pub const TAILER_ROTATIONS_TOTAL: &str = "gamelog_tailer_rotations_total";

/// Tailer: 길이 제한을 넘어 버린 라인 수 (counter)
pub const TAILER_OVERSIZED_LINES_TOTAL: &str = "gamelog_tailer_oversized_lines_total";

// ─── PlayerDirectory 메트릭 ─────────────────────────────────────────

/// Directory: 소스 호출로 캐시를 갱신한 횟수 (counter)
pub const DIRECTORY_REFRESHES_TOTAL: &str = "gamelog_directory_refreshes_total";

/// Directory: 소스 호출 실패 수 (counter)
pub const DIRECTORY_SOURCE_ERRORS_TOTAL: &str = "gamelog_directory_source_errors_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        TAILER_LINES_READ_TOTAL,
        "Total number of complete lines read from the tailed file"
    );
    describe_counter!(
        TAILER_EVENTS_PUBLISHED_TOTAL,
        "Total number of classified events sent to the output queue"
    );
    describe_counter!(
        TAILER_PARSE_ERRORS_TOTAL,
        "Total number of lines skipped because classification failed"
    );
    describe_counter!(
        TAILER_ROTATIONS_TOTAL,
        "Total number of file rotations (replacement or truncation) detected"
    );
    describe_counter!(
        TAILER_OVERSIZED_LINES_TOTAL,
        "Total number of lines dropped for exceeding the line length limit"
    );
    describe_counter!(
        DIRECTORY_REFRESHES_TOTAL,
        "Total number of player directory refreshes from the status source"
    );
    describe_counter!(
        DIRECTORY_SOURCE_ERRORS_TOTAL,
        "Total number of failed player status source calls"
    );
}
