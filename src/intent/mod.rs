//! Intent 모듈 - 자연어 요청을 구조화된 검색 조건으로 변환
//!
//! "25살 창원 취업 정책 찾아줘" 같은 메시지에서 나이, 지역, 키워드,
//! 결과 개수, 검색 의도를 뽑아냅니다. 분류기가 아니라 고정된 규칙 테이블을
//! 순서대로 적용하는 결정적 패턴 매처입니다.
//!
//! ## 사용법
//! ```rust
//! use policy_finder::intent::extract;
//!
//! let intent = extract("25살 창원 취업 정책 찾아줘");
//! assert_eq!(intent.age, Some(25));
//! assert!(intent.explicit_search);
//! ```

pub mod rules;

use serde::Serialize;

use crate::policy::MAX_VALID_AGE;

use rules::{
    contains_any, decide_explicit_search, first_match, SearchSignals, ACTION_VERBS, AGE_RULES,
    ALL_AGES_PHRASES, CATEGORIES, COUNT_PATTERN, DEFAULT_MAX_RESULTS, EXPLANATION_TERMS,
    GENERAL_QUESTION_VERBS, GREETINGS, KEYWORDS, LOCAL_GOVERNMENTS, MAX_RESULTS_LIMIT,
    POLICY_TERMS, REGIONS, REGION_FALLBACK_PATTERN, REQUEST_ENDINGS, SEGMENT_VOCABULARIES,
};

// ============================================================================
// Types
// ============================================================================

/// 검색 대상 구분
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetSegment {
    /// 청년 정책만
    Youth,
    /// 기업/일반 지원사업만
    Business,
    /// 어르신 (청년 소스는 제외)
    Senior,
    /// 구분 없음
    Both,
}

/// 구조화된 검색 조건
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryIntent {
    /// 나이 (0~120)
    pub age: Option<u8>,
    /// 연령 무관 요청 (나이 필터 대신 나이 범위 폭 필터)
    pub all_ages: bool,
    pub region: Option<String>,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub target_segment: TargetSegment,
    /// false면 검색 대신 대화 폴백으로 넘어감
    pub explicit_search: bool,
    /// 최종 결과 개수 (1~20)
    pub max_results: usize,
}

impl Default for QueryIntent {
    fn default() -> Self {
        Self {
            age: None,
            all_ages: false,
            region: None,
            category: None,
            keyword: None,
            target_segment: TargetSegment::Both,
            explicit_search: false,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// 메시지에서 검색 조건 추출
///
/// 순수 함수입니다. 해석할 수 없는 입력은 기본값(검색 안 함)을 돌려줍니다.
pub fn extract(message: &str) -> QueryIntent {
    let age = extract_age(message);
    let region = extract_region(message);
    let keyword = first_match(message, KEYWORDS).map(str::to_string);

    let signals = SearchSignals {
        policy: contains_any(message, POLICY_TERMS),
        action: contains_any(message, ACTION_VERBS),
        general_question: contains_any(message, GENERAL_QUESTION_VERBS),
        request_ending: contains_any(message, REQUEST_ENDINGS),
        explanation: contains_any(message, EXPLANATION_TERMS),
        greeting: GREETINGS.contains(&message.trim()),
        has_criteria: age.is_some() || region.is_some() || keyword.is_some(),
    };

    let intent = QueryIntent {
        age,
        all_ages: contains_any(message, ALL_AGES_PHRASES),
        region,
        category: extract_category(message),
        keyword,
        target_segment: extract_segment(message),
        explicit_search: decide_explicit_search(&signals),
        max_results: extract_max_results(message),
    };

    tracing::debug!(?intent, "extracted intent");
    intent
}

/// "N개" (1~20만 인정)
fn extract_max_results(message: &str) -> usize {
    COUNT_PATTERN
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| (1..=MAX_RESULTS_LIMIT).contains(n))
        .unwrap_or(DEFAULT_MAX_RESULTS)
}

/// 우선순위대로 나이 규칙을 적용, 처음 유효한 값에서 멈춤
fn extract_age(message: &str) -> Option<u8> {
    for rule in AGE_RULES.iter() {
        let Some(raw) = rule
            .pattern
            .captures(message)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        else {
            continue;
        };

        match (rule.to_age)(raw) {
            Some(age) if age <= MAX_VALID_AGE as u32 => {
                tracing::trace!("age rule '{}' matched: {}", rule.name, age);
                return Some(age as u8);
            }
            _ => {
                tracing::trace!("age rule '{}' rejected value {}", rule.name, raw);
            }
        }
    }
    None
}

fn extract_region(message: &str) -> Option<String> {
    if let Some(region) = first_match(message, REGIONS) {
        return Some(region.to_string());
    }

    // "신도시", "반드시" 같은 일반 단어는 목록에 없으므로 걸러짐
    REGION_FALLBACK_PATTERN
        .captures_iter(message)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|name| LOCAL_GOVERNMENTS.contains(name))
        .map(str::to_string)
}

fn extract_category(message: &str) -> Option<String> {
    CATEGORIES
        .iter()
        .find(|(trigger, _)| message.contains(trigger))
        .map(|(_, category)| category.to_string())
}

fn extract_segment(message: &str) -> TargetSegment {
    SEGMENT_VOCABULARIES
        .iter()
        .find(|(_, terms)| contains_any(message, terms))
        .map(|(segment, _)| *segment)
        .unwrap_or(TargetSegment::Both)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_youth_request() {
        let intent = extract("25살 창원 취업 정책 찾아줘");
        assert_eq!(intent.age, Some(25));
        assert_eq!(intent.region.as_deref(), Some("창원"));
        assert_eq!(intent.keyword.as_deref(), Some("취업"));
        assert!(intent.explicit_search);
        assert_eq!(intent.max_results, 3);
        assert_eq!(intent.target_segment, TargetSegment::Both);
        assert!(!intent.all_ages);
    }

    #[test]
    fn test_all_ages_with_count() {
        let intent = extract("전연령 지원 정책 5개 찾아줘");
        assert!(intent.all_ages);
        assert_eq!(intent.max_results, 5);
        assert!(intent.explicit_search);
        assert_eq!(intent.age, None);
    }

    #[test]
    fn test_general_question_goes_to_fallback() {
        let intent = extract("연봉 협상 잘하는 법 알려줘");
        assert!(!intent.explicit_search);
    }

    #[test]
    fn test_count_out_of_range_keeps_default() {
        assert_eq!(extract("정책 30개 찾아줘").max_results, 3);
        assert_eq!(extract("정책 0개 찾아줘").max_results, 3);
        assert_eq!(extract("정책 20개 찾아줘").max_results, 20);
        assert_eq!(extract("정책 1개 찾아줘").max_results, 1);
    }

    #[test]
    fn test_decade_age_wins_over_exact() {
        assert_eq!(extract("20대 청년 정책").age, Some(25));
        // 10대와 나이 표현이 같이 있어도 10대 규칙이 먼저
        assert_eq!(extract("10대 동생 17살 정책").age, Some(15));
    }

    #[test]
    fn test_exact_age_patterns() {
        assert_eq!(extract("31세 지원 정책").age, Some(31));
        assert_eq!(extract("제 나이는 29 입니다").age, Some(29));
        assert_eq!(extract("27 살 청년").age, Some(27));
    }

    #[test]
    fn test_invalid_age_falls_through_to_next_pattern() {
        // 130대 -> 13 (무효), 다음 규칙으로
        assert_eq!(extract("130대 아니고 35살").age, Some(35));
        // 150살 무효, 세 규칙으로
        assert_eq!(extract("150살 말고 40세").age, Some(40));
        assert_eq!(extract("150살").age, None);
    }

    #[test]
    fn test_region_first_match_in_table_order() {
        // 창원이 경남보다 앞
        assert_eq!(extract("경남 창원 정책").region.as_deref(), Some("창원"));
        assert_eq!(extract("부산 서울 정책").region.as_deref(), Some("서울"));
    }

    #[test]
    fn test_region_fallback_token() {
        assert_eq!(extract("김해시에 사는데 정책").region.as_deref(), Some("김해"));
        assert_eq!(extract("정책 알려줘").region, None);
        assert_eq!(extract("남양주시 청년 주거").region.as_deref(), Some("남양주"));
    }

    #[test]
    fn test_region_fallback_ignores_common_words() {
        let intent = extract("신도시에 사는 청년 주거 정책");
        assert_eq!(intent.region, None);
        assert_eq!(intent.keyword.as_deref(), Some("주거"));

        assert_eq!(extract("대도시에 사는 청년").region, None);
        assert_eq!(extract("사무직군 취업 정책").region, None);
        // 이름 중간에서 잘린 토큰은 인정하지 않음
        assert_eq!(extract("해남김해시에 정책").region, None);
    }

    #[test]
    fn test_common_word_does_not_force_search() {
        let intent = extract("반드시 청년 정책");
        assert_eq!(intent.region, None);
        assert!(!intent.explicit_search);
    }

    #[test]
    fn test_target_segment_priority() {
        assert_eq!(extract("어르신 기업 지원").target_segment, TargetSegment::Senior);
        assert_eq!(extract("소상공인 청년 지원").target_segment, TargetSegment::Business);
        assert_eq!(extract("대학생 지원").target_segment, TargetSegment::Youth);
        assert_eq!(extract("지원 사업").target_segment, TargetSegment::Both);
    }

    #[test]
    fn test_category_and_keyword() {
        let intent = extract("청년 문화 창업 정책 찾아줘");
        assert_eq!(intent.category.as_deref(), Some("복지문화"));
        assert_eq!(intent.keyword.as_deref(), Some("창업"));
    }

    #[test]
    fn test_policy_with_criteria_without_verb() {
        assert!(extract("서울 청년 주거 정책").explicit_search);
        // 일반 질문 동사가 있으면 조건만으로는 검색하지 않음
        assert!(!extract("서울 청년 주거 정책 궁금해").explicit_search);
    }

    #[test]
    fn test_request_ending_forces_search() {
        assert!(extract("지원 사업 좀 줘").explicit_search);
        assert!(extract("창업 정책 궁금한데 알려주세요").explicit_search);
    }

    #[test]
    fn test_explanation_override_wins_last() {
        assert!(!extract("취업 정책 찾아줘 이유도 설명해줘").explicit_search);
        assert!(!extract("청년 정책이 뭐야").explicit_search);
    }

    #[test]
    fn test_greetings_never_search() {
        assert!(!extract("안녕").explicit_search);
        assert!(!extract("  안녕하세요 ").explicit_search);
    }

    #[test]
    fn test_empty_input_yields_default() {
        assert_eq!(extract(""), QueryIntent::default());
    }

    #[test]
    fn test_extract_is_pure() {
        let msg = "30세 경남 자격증 지원 프로그램 7개 보여줘";
        assert_eq!(extract(msg), extract(msg));
    }
}
