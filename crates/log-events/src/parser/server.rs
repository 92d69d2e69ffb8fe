//! 서버 라이프사이클 라인 (`InitGame:`, `ShutdownGame:`)

use std::collections::BTreeMap;
use std::time::Duration;

use gamelog_core::event::{BaseEvent, Event, ServerEvent};

pub(crate) const INIT_GAME_PREFIX: &str = "InitGame:";
pub(crate) const SHUTDOWN_GAME_PREFIX: &str = "ShutdownGame:";

pub(crate) fn init_game(rest: &str, raw: &str, ts: Option<Duration>) -> Event {
    Event::Server(ServerEvent {
        base: BaseEvent::new("InitGame", raw, ts),
        data: parse_key_values(rest),
    })
}

pub(crate) fn shutdown_game(raw: &str, ts: Option<Duration>) -> Event {
    Event::Server(ServerEvent {
        base: BaseEvent::new("ShutdownGame", raw, ts),
        data: BTreeMap::new(),
    })
}

/// `\key1\value1\key2\value2` 형식의 문자열을 맵으로 변환합니다.
///
/// 앞뒤 공백을 제거한 뒤 역슬래시로 나누고, 첫 조각(보통 빈 문자열)은
/// 건너뜁니다. 짝이 없는 마지막 키는 버리며 중복 키는 나중 값이 남습니다.
///
/// ```
/// use gamelog_events::parser::parse_key_values;
///
/// let data = parse_key_values(r" \mapname\mp_crash\g_gametype\war ");
/// assert_eq!(data["mapname"], "mp_crash");
/// assert_eq!(data["g_gametype"], "war");
/// ```
pub fn parse_key_values(s: &str) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    let s = s.trim();
    if s.is_empty() {
        return data;
    }

    let parts: Vec<&str> = s.split('\\').collect();
    let mut i = 1;
    while i + 1 < parts.len() {
        data.insert(parts[i].to_owned(), parts[i + 1].to_owned());
        i += 2;
    }
    data
}
