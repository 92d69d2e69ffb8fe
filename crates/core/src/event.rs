//! 이벤트 모델 — 로그 라인 한 줄이 분류된 결과
//!
//! [`Event`]는 닫힌 합 타입입니다. 모든 변형은 공통 헤더
//! (`command`, `raw`, `timestamp`)를 가지며, 소비자는 `match`로
//! 네 가지 종류를 빠짐없이 처리합니다.
//!
//! | 변형 | 원본 라인 예시 |
//! |------|----------------|
//! | [`BaseEvent`] | 알 수 없는 라인 전체 |
//! | [`PlayerEvent`] | `J;<xuid>;<slot>;<name>`, `say <name> <msg>` |
//! | [`ServerEvent`] | `InitGame: \key\value`, `ShutdownGame:` |
//! | [`KillEvent`] | `K;...` (13개 필드) |

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::strip_color_codes;

/// 이벤트 종류 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// 구조 없는 라인
    Base,
    /// 플레이어 행동 (접속, 채팅 등)
    Player,
    /// 서버 수명 주기 (InitGame, ShutdownGame)
    Server,
    /// 킬 로그
    Kill,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Player => write!(f, "player"),
            Self::Server => write!(f, "server"),
            Self::Kill => write!(f, "kill"),
        }
    }
}

/// 분류된 로그 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Event {
    Base(BaseEvent),
    Player(PlayerEvent),
    Server(ServerEvent),
    Kill(KillEvent),
}

impl Event {
    /// 분류된 명령어 (예: "J", "say", "InitGame")
    pub fn command(&self) -> &str {
        &self.header().command
    }

    /// 줄바꿈이 제거된 원본 라인
    pub fn raw(&self) -> &str {
        &self.header().raw
    }

    /// 로그 시작 기준 경과 시간 (라인에 시각 접두사가 있었던 경우)
    pub fn timestamp(&self) -> Option<Duration> {
        self.header().timestamp
    }

    /// 이벤트 종류 태그
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Base(_) => EventKind::Base,
            Self::Player(_) => EventKind::Player,
            Self::Server(_) => EventKind::Server,
            Self::Kill(_) => EventKind::Kill,
        }
    }

    fn header(&self) -> &BaseEvent {
        match self {
            Self::Base(base) => base,
            Self::Player(ev) => &ev.base,
            Self::Server(ev) => &ev.base,
            Self::Kill(ev) => &ev.base,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ts) = self.timestamp() {
            write!(f, "[{}] ", format_clock(ts))?;
        }
        match self {
            Self::Base(ev) => write!(f, "{}", ev.command),
            Self::Player(ev) => {
                write!(
                    f,
                    "{} slot={} player={}",
                    ev.base.command,
                    ev.client_slot,
                    strip_color_codes(&ev.player)
                )?;
                if !ev.xuid.is_empty() {
                    write!(f, " xuid={}", ev.xuid)?;
                }
                if !ev.message.is_empty() {
                    write!(f, " message={:?}", ev.message)?;
                }
                Ok(())
            }
            Self::Server(ev) => {
                write!(f, "{}", ev.base.command)?;
                for (key, value) in &ev.data {
                    write!(f, " {key}={value}")?;
                }
                Ok(())
            }
            Self::Kill(ev) => write!(
                f,
                "K {} -> {} weapon={} damage={} mod={} hit={}",
                strip_color_codes(&ev.killer.name),
                strip_color_codes(&ev.victim.name),
                ev.weapon,
                ev.damage,
                ev.means_of_death,
                ev.hit_location,
            ),
        }
    }
}

/// 모든 이벤트의 공통 헤더이자 구조 없는 라인의 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEvent {
    /// 로그 시작 기준 경과 시간
    pub timestamp: Option<Duration>,
    /// 분류된 명령어. 구조 없는 라인은 라인 전체
    pub command: String,
    /// 원본 라인
    pub raw: String,
}

impl BaseEvent {
    /// 새 헤더를 생성합니다.
    pub fn new(
        command: impl Into<String>,
        raw: impl Into<String>,
        timestamp: Option<Duration>,
    ) -> Self {
        Self {
            timestamp,
            command: command.into(),
            raw: raw.into(),
        }
    }
}

/// 플레이어 이벤트 (접속, 채팅, 기타 세미콜론 구분 명령)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    /// 네트워크 ID. 채팅 라인은 빈 문자열
    pub xuid: String,
    /// 클라이언트 슬롯 번호. 채팅 라인은 0
    pub client_slot: i32,
    /// 표시 이름 (색상 코드 포함 가능)
    pub player: String,
    /// 채팅 메시지. 채팅이 아닌 명령은 빈 문자열
    pub message: String,
}

/// 서버 수명 주기 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    /// `\key\value` 블롭에서 추출한 서버 변수
    pub data: BTreeMap<String, String>,
}

/// 킬 로그의 한쪽 당사자
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub xuid: String,
    /// 월드/낙사 킬은 -1
    pub client_slot: i32,
    pub team: String,
    pub name: String,
}

/// 킬 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KillEvent {
    #[serde(flatten)]
    pub base: BaseEvent,
    pub killer: Combatant,
    pub victim: Combatant,
    pub weapon: String,
    pub damage: String,
    pub means_of_death: String,
    pub hit_location: String,
}

/// 경과 시간을 `H:MM:SS` 형식으로 표시합니다.
fn format_clock(ts: Duration) -> String {
    let total = ts.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> Event {
        Event::Player(PlayerEvent {
            base: BaseEvent::new("J", "1:02:03 J;ABCDEF;7;PlayerOne", Some(Duration::from_secs(3723))),
            xuid: "ABCDEF".to_owned(),
            client_slot: 7,
            player: "PlayerOne".to_owned(),
            message: String::new(),
        })
    }

    #[test]
    fn accessors_read_shared_header() {
        let event = sample_player();
        assert_eq!(event.command(), "J");
        assert_eq!(event.raw(), "1:02:03 J;ABCDEF;7;PlayerOne");
        assert_eq!(event.timestamp(), Some(Duration::from_secs(3723)));
        assert_eq!(event.kind(), EventKind::Player);
    }

    #[test]
    fn display_includes_clock_prefix() {
        let shown = sample_player().to_string();
        assert!(shown.starts_with("[1:02:03] J slot=7 player=PlayerOne"));
        assert!(shown.contains("xuid=ABCDEF"));
    }

    #[test]
    fn display_strips_color_codes_from_names() {
        let event = Event::Player(PlayerEvent {
            base: BaseEvent::new("say", "say ^1Red^7Baron hi", None),
            xuid: String::new(),
            client_slot: 0,
            player: "^1Red^7Baron".to_owned(),
            message: "hi".to_owned(),
        });
        assert_eq!(event.to_string(), "say slot=0 player=RedBaron message=\"hi\"");
    }

    #[test]
    fn server_display_lists_sorted_keys() {
        let mut data = BTreeMap::new();
        data.insert("sv_hostname".to_owned(), "MyServer".to_owned());
        data.insert("mapname".to_owned(), "mp_citystreets".to_owned());
        let event = Event::Server(ServerEvent {
            base: BaseEvent::new("InitGame", "InitGame: ...", None),
            data,
        });
        assert_eq!(
            event.to_string(),
            "InitGame mapname=mp_citystreets sv_hostname=MyServer"
        );
    }

    #[test]
    fn json_carries_kind_tag() {
        let json = serde_json::to_value(sample_player()).unwrap();
        assert_eq!(json["kind"], "player");
        assert_eq!(json["command"], "J");
        assert_eq!(json["client_slot"], 7);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_player());
    }

    #[test]
    fn kind_display() {
        assert_eq!(EventKind::Kill.to_string(), "kill");
        assert_eq!(EventKind::Base.to_string(), "base");
    }
}
