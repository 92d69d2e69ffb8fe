//! 통합 테스트 -- 공개 API로 라인 문법 검증

use std::time::Duration;

use gamelog_core::event::{Event, EventKind};
use gamelog_events::parser::{parse_key_values, parse_timestamp};
use gamelog_events::{EventsError, LineGrammar, classify};
use proptest::prelude::*;

#[test]
fn documented_line_forms() {
    let cases = [
        (r"InitGame: \g_gametype\sd\mapname\mp_harbor", EventKind::Server, "InitGame"),
        ("ShutdownGame:", EventKind::Server, "ShutdownGame"),
        ("J;1a2b3c;11;Some Player", EventKind::Player, "J"),
        (
            "K;1;2;axis;A;3;4;allies;B;thompson_mp;25;MOD_PISTOL_BULLET;left_arm_upper",
            EventKind::Kill,
            "K",
        ),
        ("Weapon;5566;2;Gunner;kar98k_mp", EventKind::Player, "Weapon"),
        ("sayteam Medic need ammo", EventKind::Player, "sayteam"),
        ("------------------------------------", EventKind::Base, "------------------------------------"),
    ];

    for (line, kind, command) in cases {
        let event = classify(line).unwrap_or_else(|e| panic!("{line:?}: {e}"));
        assert_eq!(event.kind(), kind, "{line}");
        assert_eq!(event.command(), command, "{line}");
        assert_eq!(event.raw(), line);
    }
}

#[test]
fn kill_with_bad_slot_falls_back_to_generic() {
    // 킬 문법은 피해자 슬롯 때문에 실패하지만 일반 문법은 3번째 필드만 숫자로 봄
    let line = "K;1;2;axis;A;3;x;allies;B;w;1;MOD;head";
    let Event::Player(ev) = classify(line).unwrap() else {
        panic!("expected generic player event");
    };
    assert_eq!(ev.base.command, "K");
    assert_eq!(ev.xuid, "1");
    assert_eq!(ev.client_slot, 2);
    assert_eq!(ev.player, "axis");
    assert_eq!(ev.message, "A;3;x;allies;B;w;1;MOD;head");
}

#[test]
fn unclassifiable_semicolon_line_reports_generic_failure() {
    let err = classify("K;1;notanumber;axis").unwrap_err();
    match err {
        EventsError::Format { grammar, .. } => assert_eq!(grammar, "player"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn grammar_value_and_helpers() {
    let grammar = LineGrammar::new().unwrap();
    assert_eq!(grammar.format_name(), "gamelog");
    assert_eq!(
        grammar.classify("3:07 ShutdownGame:").unwrap().timestamp(),
        Some(Duration::from_secs(187))
    );
    assert_eq!(parse_timestamp("3:07"), Some(Duration::from_secs(187)));
    assert_eq!(parse_key_values(r"\a\b").len(), 1);
}

proptest! {
    #[test]
    fn init_game_preserves_pairs(
        pairs in proptest::collection::btree_map("[a-z_]{1,12}", "[A-Za-z0-9_ ]{0,12}", 0..8)
    ) {
        let mut line = String::from("InitGame: ");
        for (k, v) in &pairs {
            line.push('\\');
            line.push_str(k);
            line.push('\\');
            line.push_str(v);
        }

        let Event::Server(ev) = classify(&line).unwrap() else {
            panic!("expected server event");
        };
        // 마지막 값의 끝 공백은 라인 trim으로 잘릴 수 있음
        prop_assert_eq!(ev.data.len(), pairs.len());
        for (k, v) in &pairs {
            prop_assert_eq!(ev.data[k].trim_end(), v.trim_end());
        }
    }

    #[test]
    fn join_roundtrips_fields(xuid in "[a-f0-9]{1,32}", slot in 0i32..64, name in "[A-Za-z][A-Za-z0-9 ]{0,15}[A-Za-z]") {
        let line = format!("J;{xuid};{slot};{name}");
        let Event::Player(ev) = classify(&line).unwrap() else {
            panic!("expected player event");
        };
        prop_assert_eq!(ev.xuid, xuid);
        prop_assert_eq!(ev.client_slot, slot);
        prop_assert_eq!(ev.player, name);
    }
}
