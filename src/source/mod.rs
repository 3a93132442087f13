//! Source 모듈 - 정책 카탈로그 어댑터
//!
//! 각 어댑터는 업스트림 하나를 호출해 원본 아이템을 받아오고,
//! 자기 스키마가 지원하는 조건으로만 걸러서 `PolicyRecord`를 만듭니다.
//!
//! - 온통청년: 나이 범위, 지역, 키워드, 분야
//! - 기업마당 / 알리오플러스: 키워드만 (대소문자 무시)
//!
//! 전송 실패, 비정상 상태 코드, 파싱 실패는 모두 "결과 0건"으로 흡수됩니다.

mod alioplus;
mod bizinfo;
mod youth;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::config::MAX_PAGE_SIZE;
use crate::error::SourceResult;
use crate::intent::QueryIntent;
use crate::policy::{PolicyRecord, RawItem, SourceKind};

pub use alioplus::AlioPlusSource;
pub use bizinfo::BizInfoSource;
pub use youth::YouthSource;

// ============================================================================
// PolicySource Trait
// ============================================================================

/// 정책 카탈로그 어댑터 트레이트
#[async_trait]
pub trait PolicySource: Send + Sync {
    /// 출처
    fn kind(&self) -> SourceKind;

    /// 최종 결과 수 대비 요청 배수 (중복 제거로 줄어들 몫)
    fn overfetch_factor(&self) -> usize;

    /// 업스트림 호출 (에러 그대로 반환)
    async fn fetch_raw(&self, max_count: usize) -> SourceResult<Vec<RawItem>>;

    /// 원본 아이템을 레코드로 변환하고 조건으로 필터링
    fn filter(&self, items: Vec<RawItem>, intent: &QueryIntent) -> Vec<PolicyRecord>;

    /// 후보 수집 (실패는 빈 목록으로 흡수)
    async fn fetch_candidates(&self, max_count: usize) -> Vec<RawItem> {
        let max_count = max_count.clamp(1, MAX_PAGE_SIZE);

        match self.fetch_raw(max_count).await {
            Ok(items) => {
                tracing::debug!("{}: fetched {} raw items", self.kind(), items.len());
                items
            }
            Err(e) => {
                tracing::warn!(
                    source = %self.kind(),
                    timeout = e.is_timeout(),
                    "Source unavailable, treating as zero results: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    /// 필터링 후 `limit`을 넘으면 무작위로 섞어서 자름
    fn select(
        &self,
        items: Vec<RawItem>,
        intent: &QueryIntent,
        limit: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<PolicyRecord> {
        let mut records = self.filter(items, intent);
        sample_capped(&mut records, limit, rng);
        records
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 목록이 `limit`보다 길면 균등 무작위로 섞고 `limit`개만 남김
pub fn sample_capped<T, R: Rng + ?Sized>(items: &mut Vec<T>, limit: usize, rng: &mut R) {
    if items.len() > limit {
        items.shuffle(rng);
        items.truncate(limit);
    }
}

/// 대소문자 무시 부분 문자열 검사
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 제목 또는 요약에 키워드가 있는지 (대소문자 무시)
pub(crate) fn keyword_matches_ignore_case(record: &PolicyRecord, keyword: &str) -> bool {
    contains_ignore_case(&record.title, keyword)
        || record
            .summary
            .as_deref()
            .is_some_and(|s| contains_ignore_case(s, keyword))
}

/// HTTP 클라이언트 생성
pub(crate) fn build_client(timeout: std::time::Duration) -> anyhow::Result<reqwest::Client> {
    use anyhow::Context;

    reqwest::Client::builder()
        .user_agent(concat!("policy-finder/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("HTTP 클라이언트 생성 실패")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_capped_truncates_to_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..10).collect();
        sample_capped(&mut items, 4, &mut rng);
        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|i| *i < 10));

        let mut dedup = items.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 4);
    }

    #[test]
    fn test_sample_capped_keeps_order_when_under_limit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items = vec![3, 1, 2];
        sample_capped(&mut items, 3, &mut rng);
        assert_eq!(items, vec![3, 1, 2]);
    }

    #[test]
    fn test_sample_capped_is_deterministic_for_seed() {
        let mut a: Vec<u32> = (0..50).collect();
        let mut b = a.clone();
        sample_capped(&mut a, 5, &mut StdRng::seed_from_u64(42));
        sample_capped(&mut b, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("중소기업 R&D 지원", "r&d"));
        assert!(contains_ignore_case("Startup Grant", "STARTUP"));
        assert!(!contains_ignore_case("창업 지원", "취업"));
    }
}
