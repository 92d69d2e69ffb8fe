//! 확장 포인트 trait 정의

use std::future::Future;

use crate::error::SourceError;
use crate::types::Player;

/// 현재 접속 중인 플레이어 목록을 제공하는 외부 소스
///
/// 임베딩 애플리케이션이 구현합니다 (예: 원격 상태 질의 프로토콜).
/// `PlayerDirectory`는 이 trait만 알고 구체 구현에 의존하지 않습니다.
pub trait PlayerSource: Send + Sync + 'static {
    /// 현재 플레이어 목록을 조회합니다.
    ///
    /// # Errors
    ///
    /// 소스 연결 또는 조회에 실패하면 [`SourceError`]를 반환합니다.
    fn status(&self) -> impl Future<Output = Result<Vec<Player>, SourceError>> + Send;
}

/// 고정된 플레이어 목록을 반환하는 인메모리 소스
///
/// 테스트와 오프라인 도구에서 사용합니다.
#[derive(Debug, Clone, Default)]
pub struct StaticPlayerSource {
    players: Vec<Player>,
}

impl StaticPlayerSource {
    /// 주어진 목록으로 소스를 생성합니다.
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }
}

impl PlayerSource for StaticPlayerSource {
    async fn status(&self) -> Result<Vec<Player>, SourceError> {
        Ok(self.players.clone())
    }
}
