//! 이벤트 크레이트 에러 타입
//!
//! [`EventsError`]는 라인 분류, 테일링, 플레이어 디렉토리에서 발생하는
//! 모든 에러를 표현합니다. `From<EventsError> for GamelogError` 변환이
//! 구현되어 있어 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! # 복구 정책
//! - [`EventsError::Format`], [`EventsError::EmptyLine`]: 테일러는 해당 라인만 건너뜀
//! - [`EventsError::Io`], [`EventsError::Channel`]: 테일러 종료
//! - [`EventsError::Cancelled`]: 요청된 정상 종료 (장애 아님)

use gamelog_core::error::{ConfigError, GamelogError, ParseError, SourceError, TailError};

/// 이벤트 크레이트 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    /// 라인이 어떤 문법에도 맞지 않거나 숫자 필드가 잘못됨
    #[error("format error: {grammar}: {reason}")]
    Format {
        /// 실패한 문법 이름 (join, kill, player, chat 등)
        grammar: String,
        /// 실패 사유
        reason: String,
    },

    /// 공백만 있는 라인
    #[error("format error: empty line")]
    EmptyLine,

    /// 파일 열기/읽기 실패 (EOF 제외)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 취소 토큰에 의한 종료
    #[error("cancelled")]
    Cancelled,

    /// 플레이어 상태 소스 실패
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 출력 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// 문법 정규식 컴파일 실패
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl EventsError {
    /// 문법 에러를 생성합니다.
    pub(crate) fn format(grammar: &str, reason: impl Into<String>) -> Self {
        Self::Format {
            grammar: grammar.to_owned(),
            reason: reason.into(),
        }
    }

    /// 요청된 취소로 인한 종료인지 확인합니다.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// 테일러가 해당 라인만 건너뛰고 계속 진행할 수 있는 에러인지 확인합니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::EmptyLine)
    }

    /// 메트릭 레이블로 사용할 문법 이름
    pub(crate) fn grammar(&self) -> &str {
        match self {
            Self::Format { grammar, .. } => grammar,
            Self::EmptyLine => "line",
            _ => "other",
        }
    }
}

impl From<EventsError> for GamelogError {
    fn from(err: EventsError) -> Self {
        match err {
            EventsError::Format { grammar, reason } => {
                GamelogError::Parse(ParseError::Format { grammar, reason })
            }
            EventsError::EmptyLine => GamelogError::Parse(ParseError::Empty),
            EventsError::Io(e) => GamelogError::Io(e),
            EventsError::Cancelled => GamelogError::Tail(TailError::Cancelled),
            EventsError::Source(e) => GamelogError::Source(e),
            EventsError::Channel(reason) => GamelogError::Tail(TailError::Channel(reason)),
            EventsError::Regex(e) => GamelogError::Parse(ParseError::Format {
                grammar: "join".to_owned(),
                reason: e.to_string(),
            }),
            EventsError::Config { field, reason } => {
                GamelogError::Config(ConfigError::InvalidValue { field, reason })
            }
        }
    }
}
