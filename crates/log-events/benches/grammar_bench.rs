//! 라인 문법 벤치마크
//!
//! 분류 단계별(서버, 접속, 킬, 일반, 채팅, 기본) 처리량을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gamelog_events::parser::{LineGrammar, parse_key_values, parse_timestamp};

const INIT_GAME: &str = r"  0:00 InitGame: \g_gametype\sd\gamename\Call of Duty 2\mapname\mp_toujane\protocol\118\shortversion\1.3\sv_allowAnonymous\0\sv_floodProtect\1\sv_hostname\^1Clan^7Server\sv_maxclients\20\sv_maxPing\0\sv_maxRate\25000\sv_minPing\0\sv_privateClients\2\sv_punkbuster\1\sv_pure\1\sv_voice\0";
const JOIN: &str = "  0:05 J;0110000100000001;3;^2Player^7Three";
const KILL: &str = " 12:41 K;0110000100000001;3;allies;^2Player^7Three;0110000100000002;7;axis;Enemy;kar98k_sniper_mp;135;MOD_HEAD_SHOT;head";
const GENERIC: &str = " 12:42 Weapon;0110000100000001;3;^2Player^7Three;thompson_mp";
const CHAT: &str = " 12:43 say ^2Player^7Three nice shot everyone";
const BASE: &str = " 12:44 ExitLevel: executed";

fn bench_classify(c: &mut Criterion) {
    let grammar = LineGrammar::new().unwrap();
    let mut group = c.benchmark_group("classify");
    group.throughput(Throughput::Elements(1));

    for (name, line) in [
        ("init_game", INIT_GAME),
        ("join", JOIN),
        ("kill", KILL),
        ("generic", GENERIC),
        ("chat", CHAT),
        ("base", BASE),
    ] {
        group.bench_with_input(BenchmarkId::new("grammar", name), &line, |b, &line| {
            b.iter(|| grammar.classify(black_box(line)).unwrap())
        });
    }

    group.finish();
}

fn bench_mixed_stream(c: &mut Criterion) {
    let grammar = LineGrammar::new().unwrap();
    let lines: Vec<&str> = [JOIN, KILL, GENERIC, CHAT, BASE]
        .iter()
        .cycle()
        .take(1000)
        .copied()
        .collect();

    let mut group = c.benchmark_group("mixed_stream");
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("throughput_1000", |b| {
        b.iter(|| {
            for line in &lines {
                let _ = grammar.classify(black_box(line));
            }
        })
    });
    group.finish();
}

fn bench_helpers(c: &mut Criterion) {
    c.bench_function("parse_timestamp", |b| {
        b.iter(|| parse_timestamp(black_box("10:12:41")))
    });
    c.bench_function("parse_key_values", |b| {
        b.iter(|| parse_key_values(black_box(r"\mapname\mp_toujane\g_gametype\sd\sv_maxclients\20")))
    });
}

criterion_group!(benches, bench_classify, bench_mixed_stream, bench_helpers);
criterion_main!(benches);
