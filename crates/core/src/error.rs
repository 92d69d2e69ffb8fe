//! 에러 타입 — 도메인별 에러 정의

/// gamelog 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum GamelogError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 라인 분류 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 플레이어 상태 소스 에러
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 테일러 종료 사유
    #[error("tail error: {0}")]
    Tail(#[from] TailError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GamelogError {
    /// 요청된 취소로 인한 정상 종료인지 확인합니다.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Tail(TailError::Cancelled))
    }
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

/// 로그 라인 분류 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 공백만 있는 라인
    #[error("empty line")]
    Empty,

    /// 문법 불일치 또는 숫자 필드 오류
    #[error("{grammar}: {reason}")]
    Format { grammar: String, reason: String },
}

/// 플레이어 상태 소스 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 소스에 연결할 수 없음
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// 상태 조회 실패
    #[error("status query failed: {0}")]
    Query(String),
}

/// 테일러 종료 사유 (I/O 제외)
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    /// 취소 토큰에 의한 정상 종료
    #[error("tail cancelled")]
    Cancelled,

    /// 출력 채널 수신 측이 닫힘
    #[error("output channel closed: {0}")]
    Channel(String),
}
