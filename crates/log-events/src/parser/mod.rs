//! 라인 분류 모듈 -- 게임 서버 로그 한 줄을 타입이 있는 [`Event`]로 변환합니다.
//!
//! 분류는 순수 함수입니다. I/O도 상태도 없으며 입력을 보관하지 않습니다.
//!
//! # 분류 순서 (첫 번째 일치가 승리)
//! 1. `InitGame:` 접두사 -> 서버 이벤트 (`\key\value` 데이터)
//! 2. `ShutdownGame:` 접두사 -> 서버 이벤트 (빈 데이터)
//! 3. 세미콜론 포함 -> 접속(J) -> 킬(K, 13필드) -> 일반 플레이어 명령
//! 4. `say ` / `sayteam ` 접두사 -> 채팅
//! 5. 그 외 -> 구조 없는 기본 이벤트 (실패하지 않음)
//!
//! 라인 앞의 `H:M:S` 또는 `M:S` 토큰은 분류 전에 타임스탬프로 떼어냅니다.
//!
//! # 사용 예시
//! ```
//! use gamelog_events::parser::classify;
//!
//! let event = classify("1:02:03 say PlayerOne hello").unwrap();
//! assert_eq!(event.command(), "say");
//! assert_eq!(event.timestamp().map(|t| t.as_secs()), Some(3723));
//! ```

pub mod player;
pub mod server;
pub mod timestamp;

pub use server::parse_key_values;
pub use timestamp::parse_timestamp;

use std::sync::LazyLock;
use std::time::Duration;

use gamelog_core::event::{BaseEvent, Event};
use regex::Regex;

use crate::error::EventsError;

/// 분류 문법 이름
pub const FORMAT_NAME: &str = "gamelog";

/// 접속 라인: `J;<xuid>;<slot>;<name>`
///
/// xuid는 16진수/밑줄 1-32자(선택적 `-` 접두사), `bot<N>`, 또는 `0`
const JOIN_PATTERN: &str = r"^(J);(-?[A-Fa-f0-9_]{1,32}|bot[0-9]+|0);([0-9]+);(.*)$";

/// 프로세스 전역 문법 인스턴스 (정규식은 한 번만 컴파일)
static DEFAULT_GRAMMAR: LazyLock<Result<LineGrammar, regex::Error>> =
    LazyLock::new(LineGrammar::new_inner);

/// 게임 서버 로그 라인 문법
///
/// 컴파일된 정규식을 보관하므로 한 번 생성해서 재사용합니다.
/// 값을 들고 다닐 필요가 없다면 [`classify`] 함수를 사용하세요.
#[derive(Debug, Clone)]
pub struct LineGrammar {
    join: Regex,
}

impl LineGrammar {
    /// 문법을 생성합니다.
    ///
    /// # Errors
    ///
    /// 접속 라인 정규식 컴파일에 실패하면 [`EventsError::Regex`]를 반환합니다.
    pub fn new() -> Result<Self, EventsError> {
        Ok(Self::new_inner()?)
    }

    fn new_inner() -> Result<Self, regex::Error> {
        Ok(Self {
            join: Regex::new(JOIN_PATTERN)?,
        })
    }

    /// 문법 형식 이름을 반환합니다.
    pub fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    /// 로그 한 줄을 이벤트로 분류합니다.
    ///
    /// # Errors
    ///
    /// - [`EventsError::EmptyLine`]: 공백만 있는 라인
    /// - [`EventsError::Format`]: 일치한 문법 안에서 필드가 잘못된 경우
    ///   (세미콜론 라인이 어떤 플레이어 문법에도 맞지 않거나, 채팅 토큰 부족 등)
    pub fn classify(&self, line: &str) -> Result<Event, EventsError> {
        let raw = line.trim();
        if raw.is_empty() {
            return Err(EventsError::EmptyLine);
        }

        let (body, ts) = split_timestamp(raw);
        let body = body.as_str();

        if let Some(rest) = body.strip_prefix(server::INIT_GAME_PREFIX) {
            return Ok(server::init_game(rest, raw, ts));
        }

        if body.starts_with(server::SHUTDOWN_GAME_PREFIX) {
            return Ok(server::shutdown_game(raw, ts));
        }

        if body.contains(';') {
            if let Ok(event) = player::parse_join(&self.join, body, raw, ts) {
                return Ok(event);
            }
            if let Ok(event) = player::parse_kill(body, raw, ts) {
                return Ok(event);
            }
            return player::parse_generic(body, raw, ts);
        }

        if body.starts_with("say ") || body.starts_with("sayteam ") {
            return player::parse_chat(body, raw, ts);
        }

        Ok(Event::Base(BaseEvent::new(body, raw, ts)))
    }
}

/// 프로세스 전역 문법으로 로그 한 줄을 분류합니다.
///
/// [`LineGrammar::classify`]와 동일한 규칙을 따릅니다.
pub fn classify(line: &str) -> Result<Event, EventsError> {
    match &*DEFAULT_GRAMMAR {
        Ok(grammar) => grammar.classify(line),
        Err(e) => Err(EventsError::Regex(e.clone())),
    }
}

/// 첫 토큰이 시각 형식이면 떼어내고 나머지 토큰을 공백 하나로 다시 잇습니다.
///
/// 토큰이 하나뿐이거나 시각으로 해석되지 않으면 라인을 그대로 둡니다.
fn split_timestamp(line: &str) -> (String, Option<Duration>) {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() > 1 && fields[0].contains(':') {
        if let Some(ts) = parse_timestamp(fields[0]) {
            return (fields[1..].join(" "), Some(ts));
        }
    }
    (line.to_owned(), None)
}

/// 10진 음이 아닌 정수 슬롯 필드를 파싱합니다 (접속 라인용).
///
/// 부호(`+`, `-`)나 공백은 허용하지 않습니다.
pub(crate) fn parse_slot(grammar: &str, field: &str, value: &str) -> Result<i32, EventsError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EventsError::format(
            grammar,
            format!("invalid {field} {value:?}: not a non-negative integer"),
        ));
    }
    parse_signed_slot(grammar, field, value)
}

/// 부호를 허용하는 10진 정수 슬롯 필드를 파싱합니다.
///
/// 월드/낙사 킬은 킬러 슬롯을 `-1`로 기록합니다. 공백은 허용하지 않습니다.
pub(crate) fn parse_signed_slot(
    grammar: &str,
    field: &str,
    value: &str,
) -> Result<i32, EventsError> {
    value.parse::<i32>().map_err(|e| {
        EventsError::format(grammar, format!("invalid {field} {value:?}: {e}"))
    })
}
