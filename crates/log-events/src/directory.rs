//! TTL 캐시를 둔 플레이어 디렉토리
//!
//! [`PlayerDirectory`]는 외부 [`PlayerSource`]의 플레이어 목록을 TTL 동안
//! 캐시하고, 이름/슬롯/GUID로 플레이어를 찾습니다.
//!
//! # 동시성
//! 캐시(목록과 만료 시각)는 하나의 `RwLock`으로 보호합니다.
//! - TTL 안의 조회는 읽기 락만 사용합니다.
//! - 소스 호출은 락 없이 수행하고, 결과 반영 시에만 쓰기 락을 잡습니다.
//!
//! 따라서 만료를 동시에 관찰한 여러 호출자는 각각 소스를 호출할 수 있습니다
//! (요청 병합 없음). 단일 호출이 필요하면 호출자가 외부에서 직렬화해야 합니다.
//!
//! # 캐시 적중 조건
//! 캐시된 목록이 비어 있지 않고 TTL 안일 때만 적중입니다. 빈 목록은 캐시하지 않은
//! 것과 같아서, 빈 서버에 들어온 플레이어가 TTL을 기다리지 않고 바로 보입니다.
//!
//! # 실패 처리
//! 소스 호출이 실패하면 에러를 그대로 돌려주고 기존 캐시는 건드리지 않습니다.

use std::time::Duration;

use gamelog_core::metrics as m;
use gamelog_core::pipeline::PlayerSource;
use gamelog_core::types::{Player, strip_color_codes};
use metrics::counter;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::EventsError;

/// 기본 캐시 TTL
pub const DEFAULT_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct CacheState {
    players: Vec<Player>,
    /// `None`이면 아직 조회한 적 없거나 무효화됨
    expires: Option<Instant>,
}

impl CacheState {
    fn fresh(&self, now: Instant) -> bool {
        !self.players.is_empty() && self.expires.is_some_and(|expires| now < expires)
    }
}

/// TTL 캐시 플레이어 디렉토리
pub struct PlayerDirectory<S> {
    source: S,
    ttl: Duration,
    cache: RwLock<CacheState>,
}

impl<S: PlayerSource> PlayerDirectory<S> {
    /// 새 디렉토리를 생성합니다. `ttl`이 0이면 [`DEFAULT_TTL`]을 사용합니다.
    pub fn new(source: S, ttl: Duration) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        Self {
            source,
            ttl,
            cache: RwLock::new(CacheState::default()),
        }
    }

    /// 기본 TTL로 디렉토리를 생성합니다.
    pub fn with_default_ttl(source: S) -> Self {
        Self::new(source, DEFAULT_TTL)
    }

    /// 적용된 캐시 TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 현재 플레이어 목록의 복사본을 반환합니다.
    ///
    /// 캐시된 목록이 비어 있지 않고 TTL 안이면 소스를 호출하지 않습니다.
    ///
    /// # Errors
    ///
    /// 갱신이 필요한데 소스 호출이 실패하면 [`EventsError::Source`]를 반환합니다.
    pub async fn snapshot(&self) -> Result<Vec<Player>, EventsError> {
        {
            let cache = self.cache.read().await;
            if cache.fresh(Instant::now()) {
                debug!(count = cache.players.len(), "player directory cache hit");
                return Ok(cache.players.clone());
            }
        }

        let players = match self.source.status().await {
            Ok(players) => players,
            Err(e) => {
                counter!(m::DIRECTORY_SOURCE_ERRORS_TOTAL).increment(1);
                warn!(error = %e, "player source failed, keeping cached players");
                return Err(e.into());
            }
        };

        {
            let mut cache = self.cache.write().await;
            cache.players = players.clone();
            cache.expires = Some(Instant::now() + self.ttl);
        }
        counter!(m::DIRECTORY_REFRESHES_TOTAL).increment(1);
        debug!(count = players.len(), "player directory refreshed");

        Ok(players)
    }

    /// 이름 일부로 플레이어를 찾습니다.
    ///
    /// 질의와 플레이어 이름 모두 색상 코드를 제거하고 대소문자를 무시하여
    /// 부분 문자열로 비교합니다. 목록 순서상 첫 일치를 반환합니다.
    /// 색상 코드와 공백을 제거한 질의가 비어 있으면 소스를 호출하지 않고 `None`입니다.
    pub async fn find_by_name(&self, query: &str) -> Result<Option<Player>, EventsError> {
        let needle = strip_color_codes(query).trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }

        let players = self.snapshot().await?;
        Ok(players
            .into_iter()
            .find(|p| strip_color_codes(&p.name).to_lowercase().contains(&needle)))
    }

    /// 클라이언트 슬롯으로 플레이어를 찾습니다.
    pub async fn find_by_slot(&self, slot: u32) -> Result<Option<Player>, EventsError> {
        let players = self.snapshot().await?;
        Ok(players.into_iter().find(|p| p.client_slot == slot))
    }

    /// GUID로 플레이어를 찾습니다 (앞뒤 공백 무시, 대소문자 무시, 완전 일치).
    ///
    /// 공백을 제거한 질의가 비어 있으면 소스를 호출하지 않고 `None`입니다.
    pub async fn find_by_guid(&self, guid: &str) -> Result<Option<Player>, EventsError> {
        let wanted = guid.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(None);
        }

        let players = self.snapshot().await?;
        Ok(players
            .into_iter()
            .find(|p| p.guid.trim().to_lowercase() == wanted))
    }

    /// 캐시를 비웁니다. 다음 조회는 반드시 소스를 호출합니다.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        cache.players.clear();
        cache.expires = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelog_core::error::SourceError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 호출 횟수를 세고 실패를 주입할 수 있는 소스
    #[derive(Clone, Default)]
    struct MockSource {
        players: Arc<Mutex<Vec<Player>>>,
        calls: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl MockSource {
        fn with_players(players: Vec<Player>) -> Self {
            let source = Self::default();
            *source.players.lock().unwrap() = players;
            source
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn set_players(&self, players: Vec<Player>) {
            *self.players.lock().unwrap() = players;
        }
    }

    impl PlayerSource for MockSource {
        async fn status(&self) -> Result<Vec<Player>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(SourceError::Unavailable("mock offline".to_owned()));
            }
            Ok(self.players.lock().unwrap().clone())
        }
    }

    fn roster() -> Vec<Player> {
        vec![
            Player::new(0, "^1Red^7Baron", "ABCDEF01"),
            Player::new(3, "Bob", " 1234abcd "),
            Player::new(7, "bobby", "feedface"),
        ]
    }

    #[tokio::test]
    async fn zero_ttl_uses_default() {
        let dir = PlayerDirectory::new(MockSource::default(), Duration::ZERO);
        assert_eq!(dir.ttl(), DEFAULT_TTL);
        let dir = PlayerDirectory::with_default_ttl(MockSource::default());
        assert_eq!(dir.ttl(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_is_cached_within_ttl() {
        let source = MockSource::with_players(roster());
        let dir = PlayerDirectory::new(source.clone(), Duration::from_secs(2));

        assert_eq!(dir.snapshot().await.unwrap().len(), 3);
        assert_eq!(dir.snapshot().await.unwrap().len(), 3);
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(2100)).await;
        dir.snapshot().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn snapshot_returns_independent_copy() {
        let dir = PlayerDirectory::with_default_ttl(MockSource::with_players(roster()));
        let mut first = dir.snapshot().await.unwrap();
        first.clear();
        assert_eq!(dir.snapshot().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_roster_is_refetched_every_time() {
        let source = MockSource::default();
        let dir = PlayerDirectory::with_default_ttl(source.clone());
        assert!(dir.snapshot().await.unwrap().is_empty());
        assert!(dir.snapshot().await.unwrap().is_empty());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn player_joining_empty_server_is_seen_within_ttl() {
        let source = MockSource::default();
        let dir = PlayerDirectory::with_default_ttl(source.clone());
        assert!(dir.find_by_slot(4).await.unwrap().is_none());

        source.set_players(vec![Player::new(4, "Latecomer", "beef")]);
        let found = dir.find_by_slot(4).await.unwrap().unwrap();
        assert_eq!(found.name, "Latecomer");

        // 비어 있지 않은 목록은 다시 캐시됨
        dir.snapshot().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_stale_cache() {
        let source = MockSource::with_players(roster());
        let dir = PlayerDirectory::new(source.clone(), Duration::from_secs(1));
        dir.snapshot().await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        source.set_fail(true);
        let err = dir.snapshot().await.unwrap_err();
        assert!(matches!(err, EventsError::Source(_)));

        // 캐시가 남아 있는지 내부 상태로 확인
        let cache = dir.cache.read().await;
        assert_eq!(cache.players.len(), 3);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let source = MockSource::with_players(roster());
        let dir = PlayerDirectory::with_default_ttl(source.clone());
        dir.snapshot().await.unwrap();

        source.set_players(vec![Player::new(9, "Newcomer", "00")]);
        dir.invalidate().await;
        let players = dir.snapshot().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Newcomer");
    }

    #[tokio::test]
    async fn find_by_name_strips_colors_and_ignores_case() {
        let dir = PlayerDirectory::with_default_ttl(MockSource::with_players(roster()));

        let found = dir.find_by_name("^2redbaron").await.unwrap().unwrap();
        assert_eq!(found.client_slot, 0);

        // 순서상 첫 일치
        let found = dir.find_by_name("BOB").await.unwrap().unwrap();
        assert_eq!(found.client_slot, 3);

        assert!(dir.find_by_name("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_name_query_skips_source() {
        let source = MockSource::with_players(roster());
        let dir = PlayerDirectory::with_default_ttl(source.clone());
        assert!(dir.find_by_name("  ^1 ").await.unwrap().is_none());
        assert!(dir.find_by_name("^").await.unwrap().is_none());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn find_by_slot_exact_match() {
        let dir = PlayerDirectory::with_default_ttl(MockSource::with_players(roster()));
        assert_eq!(dir.find_by_slot(7).await.unwrap().unwrap().name, "bobby");
        assert!(dir.find_by_slot(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_guid_trims_and_ignores_case() {
        let source = MockSource::with_players(roster());
        let dir = PlayerDirectory::with_default_ttl(source.clone());

        let found = dir.find_by_guid(" abcdef01 ").await.unwrap().unwrap();
        assert_eq!(found.client_slot, 0);
        let found = dir.find_by_guid("1234ABCD").await.unwrap().unwrap();
        assert_eq!(found.client_slot, 3);
        assert!(dir.find_by_guid("1234").await.unwrap().is_none());

        let calls = source.calls();
        assert!(dir.find_by_guid("   ").await.unwrap().is_none());
        assert_eq!(source.calls(), calls);
    }

    #[tokio::test]
    async fn find_propagates_source_error() {
        let source = MockSource::default();
        source.set_fail(true);
        let dir = PlayerDirectory::with_default_ttl(source);
        assert!(dir.find_by_slot(0).await.is_err());
        assert!(dir.find_by_name("x").await.is_err());
    }
}
