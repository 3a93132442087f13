//! 연합 검색 - 여러 정책 카탈로그를 한 번에 조회
//!
//! 1. 대상 구분과 나이로 조회할 소스를 고름 (segment gating)
//! 2. 고른 소스를 동시에 호출하고, 소스별로 필터링 + 무작위 상한 적용
//! 3. URL 기준 중복 제거 (URL 없는 레코드는 항상 유지)
//! 4. 요청 개수를 넘으면 무작위로 섞어서 자름
//!
//! 무작위 추출 때문에 같은 조건이라도 호출마다 결과가 달라질 수 있습니다.
//! 테스트에서는 `FederatedSearch::with_seed`로 고정합니다.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{AppConfig, MAX_PAGE_SIZE};
use crate::intent::{QueryIntent, TargetSegment};
use crate::policy::{PolicyRecord, SourceKind};
use crate::source::{sample_capped, AlioPlusSource, BizInfoSource, PolicySource, YouthSource};

/// 온통청년 소스가 다룰 수 있는 최대 나이
pub const YOUTH_AGE_CEILING: u8 = 39;

/// 소스별 최소 후보 수
pub const MIN_SOURCE_BUDGET: usize = 3;

// ============================================================================
// Types
// ============================================================================

/// 검색 결과
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// 1건 이상 (최대 `max_results`)
    Found(Vec<PolicyRecord>),
    /// 결과 없음
    NoResults(EmptyReason),
}

/// 결과가 비었을 때의 맥락
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// 조회한 소스 모두 후보가 없었음
    NoCandidates,
    /// 나이가 청년 소스 상한을 넘어 청년 정책을 조회하지 않았음
    AgeAboveYouthCeiling { age: u8 },
}

impl SearchOutcome {
    pub fn records(&self) -> &[PolicyRecord] {
        match self {
            SearchOutcome::Found(records) => records,
            SearchOutcome::NoResults(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

// ============================================================================
// Segment gating
// ============================================================================

/// 이 소스를 조회해야 하는지
pub fn consults(kind: SourceKind, intent: &QueryIntent) -> bool {
    match kind {
        SourceKind::Youth => {
            matches!(
                intent.target_segment,
                TargetSegment::Youth | TargetSegment::Both
            ) && (intent.all_ages || intent.age.map_or(true, |age| age <= YOUTH_AGE_CEILING))
        }
        SourceKind::BizInfo | SourceKind::AlioPlus => matches!(
            intent.target_segment,
            TargetSegment::Business | TargetSegment::Both | TargetSegment::Senior
        ),
    }
}

/// 청년 대상 요청인데 나이 때문에 청년 소스를 건너뛰는지
fn youth_excluded_by_age(intent: &QueryIntent) -> Option<u8> {
    let wants_youth = matches!(
        intent.target_segment,
        TargetSegment::Youth | TargetSegment::Both
    );
    match intent.age {
        Some(age) if wants_youth && !intent.all_ages && age > YOUTH_AGE_CEILING => Some(age),
        _ => None,
    }
}

/// 소스별 후보 상한 = max(3, max_results * 배수)
pub fn source_budget(max_results: usize, overfetch_factor: usize) -> usize {
    MIN_SOURCE_BUDGET.max(max_results.saturating_mul(overfetch_factor))
}

/// URL 기준 중복 제거 (먼저 나온 것 유지, URL 없는 레코드는 모두 유지)
pub fn dedup_by_url(records: Vec<PolicyRecord>) -> Vec<PolicyRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| match record.dedup_key() {
            Some(key) => seen.insert(key.to_string()),
            None => true,
        })
        .collect()
}

// ============================================================================
// FederatedSearch
// ============================================================================

/// 연합 검색기
///
/// 시작 시 한 번 만들어 요청 핸들러 간에 공유합니다.
pub struct FederatedSearch {
    sources: Vec<Arc<dyn PolicySource>>,
    rng: Mutex<StdRng>,
}

impl FederatedSearch {
    /// 소스 목록으로 생성 (앞에 있는 소스가 중복 제거에서 우선)
    pub fn new(sources: Vec<Arc<dyn PolicySource>>) -> Self {
        Self {
            sources,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 시드를 고정해 생성
    pub fn with_seed(sources: Vec<Arc<dyn PolicySource>>, seed: u64) -> Self {
        Self {
            sources,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 설정에서 온통청년 / 기업마당 / 알리오플러스 순으로 구성
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let sources: Vec<Arc<dyn PolicySource>> = vec![
            Arc::new(YouthSource::new(config.youth.clone())?),
            Arc::new(BizInfoSource::new(config.bizinfo.clone())?),
            Arc::new(AlioPlusSource::new(config.alioplus.clone())?),
        ];
        Ok(Self::new(sources))
    }

    pub fn sources(&self) -> &[Arc<dyn PolicySource>] {
        &self.sources
    }

    /// 연합 검색
    ///
    /// 소스 실패는 빈 후보로 흡수되므로 에러를 반환하지 않습니다.
    pub async fn search(&self, intent: &QueryIntent) -> SearchOutcome {
        let consulted: Vec<&Arc<dyn PolicySource>> = self
            .sources
            .iter()
            .filter(|source| consults(source.kind(), intent))
            .collect();

        tracing::debug!(
            "Consulting sources: {:?}",
            consulted.iter().map(|s| s.kind()).collect::<Vec<_>>()
        );

        // 소스별 타임아웃은 각 클라이언트가 가짐. 모두 끝날 때까지 기다림.
        let fetched = join_all(consulted.iter().map(|source| async move {
            let items = source.fetch_candidates(MAX_PAGE_SIZE).await;
            (*source, items)
        }))
        .await;

        let records = {
            let mut rng = self.lock_rng();

            let mut candidates = Vec::new();
            for (source, items) in fetched {
                let budget = source_budget(intent.max_results, source.overfetch_factor());
                let selected = source.select(items, intent, budget, &mut *rng);
                tracing::debug!(
                    "{}: {} candidates (budget {})",
                    source.kind(),
                    selected.len(),
                    budget
                );
                candidates.extend(selected);
            }

            let total = candidates.len();
            let mut unique = dedup_by_url(candidates);
            tracing::debug!("Dedup: {} -> {} records", total, unique.len());

            sample_capped(&mut unique, intent.max_results, &mut *rng);
            unique
        };

        tracing::info!(
            "Federated search: {} sources consulted, {} results",
            consulted.len(),
            records.len()
        );

        if records.is_empty() {
            let reason = match youth_excluded_by_age(intent) {
                Some(age) => EmptyReason::AgeAboveYouthCeiling { age },
                None => EmptyReason::NoCandidates,
            };
            SearchOutcome::NoResults(reason)
        } else {
            SearchOutcome::Found(records)
        }
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Tests
// ============================================================================
