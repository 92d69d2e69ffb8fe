//! 플레이어 관련 라인 문법 (접속, 킬, 일반 세미콜론 명령, 채팅)

use std::time::Duration;

use gamelog_core::event::{BaseEvent, Combatant, Event, KillEvent, PlayerEvent};
use regex::Regex;

use super::{parse_signed_slot, parse_slot};
use crate::error::EventsError;

/// 킬 라인 필드 수
const KILL_FIELDS: usize = 13;

/// `J;<xuid>;<slot>;<name>`
pub(crate) fn parse_join(
    pattern: &Regex,
    line: &str,
    raw: &str,
    ts: Option<Duration>,
) -> Result<Event, EventsError> {
    let caps = pattern
        .captures(line)
        .ok_or_else(|| EventsError::format("join", "not a join line"))?;

    let client_slot = parse_slot("join", "slot", &caps[3])?;

    Ok(Event::Player(PlayerEvent {
        base: BaseEvent::new(&caps[1], raw, ts),
        xuid: caps[2].to_owned(),
        client_slot,
        player: caps[4].to_owned(),
        message: String::new(),
    }))
}

/// `K;kxuid;kslot;kteam;kname;vxuid;vslot;vteam;vname;weapon;damage;mod;hitloc`
///
/// 필드는 공백 제거 없이 그대로 사용합니다. 슬롯은 부호 있는 정수입니다
/// (월드 킬의 슬롯은 `-1`).
pub(crate) fn parse_kill(line: &str, raw: &str, ts: Option<Duration>) -> Result<Event, EventsError> {
    let parts: Vec<&str> = line.split(';').collect();
    if parts.len() != KILL_FIELDS {
        return Err(EventsError::format(
            "kill",
            format!("expected {KILL_FIELDS} fields, got {}", parts.len()),
        ));
    }
    if parts[0] != "K" {
        return Err(EventsError::format("kill", "not a kill line"));
    }

    let killer = Combatant {
        xuid: parts[1].to_owned(),
        client_slot: parse_signed_slot("kill", "killer slot", parts[2])?,
        team: parts[3].to_owned(),
        name: parts[4].to_owned(),
    };
    let victim = Combatant {
        xuid: parts[5].to_owned(),
        client_slot: parse_signed_slot("kill", "victim slot", parts[6])?,
        team: parts[7].to_owned(),
        name: parts[8].to_owned(),
    };

    Ok(Event::Kill(KillEvent {
        base: BaseEvent::new("K", raw, ts),
        killer,
        victim,
        weapon: parts[9].to_owned(),
        damage: parts[10].to_owned(),
        means_of_death: parts[11].to_owned(),
        hit_location: parts[12].to_owned(),
    }))
}

/// `cmd;xuid;slot;name[;message]`
///
/// 최대 5개 필드로 나누므로 메시지에는 세미콜론이 남을 수 있습니다.
/// 모든 필드는 앞뒤 공백을 제거하며, 명령 필드가 비면 실패합니다.
/// 슬롯은 부호 있는 정수입니다.
pub(crate) fn parse_generic(
    line: &str,
    raw: &str,
    ts: Option<Duration>,
) -> Result<Event, EventsError> {
    let parts: Vec<&str> = line.splitn(5, ';').map(str::trim).collect();
    if parts.len() < 4 {
        return Err(EventsError::format(
            "player",
            format!("expected at least 4 fields, got {}: {line:?}", parts.len()),
        ));
    }

    if parts[0].is_empty() {
        return Err(EventsError::format("player", format!("empty command: {line:?}")));
    }

    let client_slot = parse_signed_slot("player", "slot", parts[2])?;

    Ok(Event::Player(PlayerEvent {
        base: BaseEvent::new(parts[0], raw, ts),
        xuid: parts[1].to_owned(),
        client_slot,
        player: parts[3].to_owned(),
        message: parts.get(4).copied().unwrap_or_default().to_owned(),
    }))
}

/// `say|sayteam <name> <message...>`
///
/// 메시지는 세 번째 토큰부터 공백 하나로 이어 붙입니다.
pub(crate) fn parse_chat(line: &str, raw: &str, ts: Option<Duration>) -> Result<Event, EventsError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(EventsError::format(
            "chat",
            format!("expected at least 3 tokens, got {}: {line:?}", fields.len()),
        ));
    }

    Ok(Event::Player(PlayerEvent {
        base: BaseEvent::new(fields[0], raw, ts),
        xuid: String::new(),
        client_slot: 0,
        player: fields[1].to_owned(),
        message: fields[2..].join(" "),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JOIN_PATTERN;

    fn join_regex() -> Regex {
        Regex::new(JOIN_PATTERN).unwrap()
    }

    const KILL_LINE: &str =
        "K;1100001;3;axis;Alice;1100002;5;allies;Bob;kar98k_mp;135;MOD_HEAD_SHOT;head";

    #[test]
    fn join_accepts_bot_and_zero_xuids() {
        let re = join_regex();
        for xuid in ["bot12", "0", "-1a2b", "dead_beef"] {
            let line = format!("J;{xuid};4;Someone");
            let Event::Player(ev) = parse_join(&re, &line, &line, None).unwrap() else {
                panic!("expected player event");
            };
            assert_eq!(ev.xuid, xuid);
            assert_eq!(ev.client_slot, 4);
        }
    }

    #[test]
    fn join_rejects_long_xuid() {
        let re = join_regex();
        let line = format!("J;{};1;Someone", "a".repeat(33));
        assert!(parse_join(&re, &line, &line, None).is_err());
    }

    #[test]
    fn join_name_may_contain_semicolons() {
        let re = join_regex();
        let Event::Player(ev) = parse_join(&re, "J;0;2;odd;name", "J;0;2;odd;name", None).unwrap()
        else {
            panic!("expected player event");
        };
        assert_eq!(ev.player, "odd;name");
    }

    #[test]
    fn join_slot_overflow_is_format_error() {
        let re = join_regex();
        let line = "J;0;99999999999;Someone";
        let err = parse_join(&re, line, line, None).unwrap_err();
        assert!(matches!(err, EventsError::Format { ref grammar, .. } if grammar == "join"));
    }

    #[test]
    fn kill_fields_are_positional() {
        let Event::Kill(ev) = parse_kill(KILL_LINE, KILL_LINE, None).unwrap() else {
            panic!("expected kill event");
        };
        assert_eq!(ev.base.command, "K");
        assert_eq!(ev.killer.xuid, "1100001");
        assert_eq!(ev.killer.client_slot, 3);
        assert_eq!(ev.killer.team, "axis");
        assert_eq!(ev.killer.name, "Alice");
        assert_eq!(ev.victim.xuid, "1100002");
        assert_eq!(ev.victim.client_slot, 5);
        assert_eq!(ev.victim.team, "allies");
        assert_eq!(ev.victim.name, "Bob");
        assert_eq!(ev.weapon, "kar98k_mp");
        assert_eq!(ev.damage, "135");
        assert_eq!(ev.means_of_death, "MOD_HEAD_SHOT");
        assert_eq!(ev.hit_location, "head");
    }

    #[test]
    fn kill_requires_exact_field_count() {
        let short = "K;1;2;axis;A;3;4;allies;B;weapon;10;MOD";
        assert!(parse_kill(short, short, None).is_err());
        let long = format!("{KILL_LINE};extra");
        assert!(parse_kill(&long, &long, None).is_err());
    }

    #[test]
    fn kill_requires_k_command() {
        let line = KILL_LINE.replacen('K', "D", 1);
        assert!(parse_kill(&line, &line, None).is_err());
    }

    #[test]
    fn kill_bad_victim_slot() {
        let line = "K;1;3;axis;A;2;x;allies;B;w;1;MOD;head";
        let err = parse_kill(line, line, None).unwrap_err();
        assert!(err.to_string().contains("victim slot"));
    }

    #[test]
    fn generic_trims_fields_and_keeps_message_semicolons() {
        let line = " Q ; abc ; 3 ; Name ; hello; world ";
        let Event::Player(ev) = parse_generic(line, line, None).unwrap() else {
            panic!("expected player event");
        };
        assert_eq!(ev.base.command, "Q");
        assert_eq!(ev.xuid, "abc");
        assert_eq!(ev.client_slot, 3);
        assert_eq!(ev.player, "Name");
        assert_eq!(ev.message, "hello; world");
    }

    #[test]
    fn generic_without_message() {
        let Event::Player(ev) = parse_generic("Weapon;x;1;Y", "Weapon;x;1;Y", None).unwrap() else {
            panic!("expected player event");
        };
        assert_eq!(ev.message, "");
    }

    #[test]
    fn generic_errors() {
        assert!(parse_generic("a;b;c", "a;b;c", None).is_err());
        assert!(parse_generic("a;b;slot;d", "a;b;slot;d", None).is_err());
    }

    #[test]
    fn generic_rejects_blank_command() {
        let err = parse_generic(" ;abc;3;Name", " ;abc;3;Name", None).unwrap_err();
        assert!(err.to_string().contains("empty command"));
    }

    #[test]
    fn generic_accepts_signed_slots() {
        for (line, slot) in [("Weapon;abc;-1;Name", -1), ("Q;abc; +3 ;Name", 3)] {
            let Event::Player(ev) = parse_generic(line, line, None).unwrap() else {
                panic!("expected player event");
            };
            assert_eq!(ev.client_slot, slot);
        }
    }

    #[test]
    fn kill_accepts_world_killer_slot() {
        let line = "K;0;-1;world;;0;4;allies;Bob;none;100000;MOD_FALLING;none";
        let Event::Kill(ev) = parse_kill(line, line, None).unwrap() else {
            panic!("expected kill event");
        };
        assert_eq!(ev.killer.client_slot, -1);
        assert_eq!(ev.killer.name, "");
        assert_eq!(ev.victim.client_slot, 4);
    }

    #[test]
    fn join_rejects_signed_slot() {
        let re = join_regex();
        let line = "J;0;-1;Someone";
        assert!(parse_join(&re, line, line, None).is_err());
    }

    #[test]
    fn chat_collapses_whitespace() {
        let line = "sayteam  Bob   go  go   go";
        let Event::Player(ev) = parse_chat(line, line, None).unwrap() else {
            panic!("expected player event");
        };
        assert_eq!(ev.base.command, "sayteam");
        assert_eq!(ev.player, "Bob");
        assert_eq!(ev.message, "go go go");
    }
}
