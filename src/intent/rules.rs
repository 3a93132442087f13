//! 추출 규칙 테이블
//!
//! 모든 규칙은 고정된 순서로 평가됩니다. 테이블 순서를 바꾸면 추출 결과가
//! 달라지므로 주의하세요.

use once_cell::sync::Lazy;
use regex::Regex;

use super::TargetSegment;

/// 기본 결과 개수
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// 요청 가능한 최대 결과 개수
pub const MAX_RESULTS_LIMIT: usize = 20;

// ============================================================================
// Regex rules
// ============================================================================

/// "N개" 결과 개수
pub static COUNT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)개").unwrap());

/// 시/군 단위 지역 토큰 (고정 지역 목록에 없을 때)
///
/// 단어 첫머리에서만 잡고, 이름이 `LOCAL_GOVERNMENTS`에 있어야 지역으로 인정합니다.
pub static REGION_FALLBACK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^가-힣])([가-힣]{2,3})(?:시|군)(?:에서|에|\s|$)").unwrap()
});

/// 나이 추출 규칙
pub struct AgeRule {
    pub name: &'static str,
    pub pattern: Regex,
    /// 캡처된 숫자를 나이로 변환 (유효하지 않으면 None)
    pub to_age: fn(u32) -> Option<u32>,
}

/// 나이 규칙 (우선순위 순)
pub static AGE_RULES: Lazy<Vec<AgeRule>> = Lazy::new(|| {
    vec![
        AgeRule {
            name: "decade",
            pattern: Regex::new(r"(?:^|\D)(\d{1,2})0대").unwrap(),
            to_age: decade_midpoint,
        },
        AgeRule {
            name: "sal",
            pattern: Regex::new(r"(?:^|\D)(\d{1,3})\s?살").unwrap(),
            to_age: exact_age,
        },
        AgeRule {
            name: "se",
            pattern: Regex::new(r"(?:^|\D)(\d{1,3})\s?세").unwrap(),
            to_age: exact_age,
        },
        AgeRule {
            name: "naineun",
            pattern: Regex::new(r"나이는\s*(\d{1,3})").unwrap(),
            to_age: exact_age,
        },
    ]
});

/// "20대" -> 25
fn decade_midpoint(decade: u32) -> Option<u32> {
    if (1..=12).contains(&decade) {
        Some(decade * 10 + 5)
    } else {
        None
    }
}

fn exact_age(age: u32) -> Option<u32> {
    Some(age)
}

// ============================================================================
// Vocabularies
// ============================================================================

/// 연령 무관 표현
pub const ALL_AGES_PHRASES: &[&str] = &[
    "전연령",
    "전 연령",
    "모든 연령",
    "모든연령",
    "연령무관",
    "연령 무관",
    "나이무관",
    "나이 무관",
    "나이 상관없",
];

/// 지역 키워드 (앞에 있을수록 우선)
pub const REGIONS: &[&str] = &[
    "서울", "부산", "대구", "창원", "경남", "경기", "제주", "인천", "광주", "대전", "울산", "세종",
    "경북", "강원", "충북", "충남", "전북", "전남",
];

/// 시/군 이름 ("시"/"군" 제외). 고정 지역 목록에 없는 기초자치단체만
pub const LOCAL_GOVERNMENTS: &[&str] = &[
    // 경기
    "수원", "성남", "고양", "용인", "부천", "안산", "안양", "남양주", "화성", "평택", "의정부",
    "시흥", "파주", "김포", "광명", "군포", "하남", "오산", "이천", "안성", "의왕", "양주",
    "구리", "포천", "여주", "동두천", "과천", "가평", "양평", "연천",
    // 강원
    "춘천", "원주", "강릉", "동해", "속초", "삼척", "태백", "홍천", "횡성", "평창", "정선",
    "철원", "화천", "양구", "인제", "고성", "양양", "영월",
    // 충청
    "청주", "충주", "제천", "보은", "옥천", "영동", "진천", "괴산", "음성", "단양", "증평",
    "천안", "공주", "보령", "아산", "서산", "논산", "계룡", "당진", "금산", "부여", "서천",
    "청양", "홍성", "예산", "태안",
    // 전라
    "전주", "군산", "익산", "정읍", "남원", "김제", "완주", "진안", "무주", "장수", "임실",
    "순창", "고창", "부안", "목포", "여수", "순천", "나주", "광양", "담양", "곡성", "구례",
    "고흥", "보성", "화순", "장흥", "강진", "해남", "영암", "무안", "함평", "영광", "장성",
    "완도", "진도", "신안",
    // 경상
    "포항", "경주", "김천", "안동", "구미", "영주", "영천", "상주", "문경", "경산", "의성",
    "청송", "영양", "영덕", "청도", "고령", "성주", "칠곡", "예천", "봉화", "울진", "울릉",
    "진주", "통영", "사천", "김해", "밀양", "거제", "양산", "의령", "함안", "창녕", "남해",
    "하동", "산청", "함양", "거창", "합천",
    // 제주
    "서귀포",
];

/// 지역 키워드 -> 기관명에 나타나는 표기
pub const REGION_SYNONYMS: &[(&str, &[&str])] = &[
    ("서울", &["서울"]),
    ("부산", &["부산"]),
    ("대구", &["대구"]),
    ("창원", &["창원"]),
    ("경남", &["경상남도", "경남"]),
    ("경북", &["경상북도", "경북"]),
    ("경기", &["경기도", "경기"]),
    ("제주", &["제주특별자치도", "제주"]),
    ("강원", &["강원특별자치도", "강원도", "강원"]),
    ("충북", &["충청북도", "충북"]),
    ("충남", &["충청남도", "충남"]),
    ("전북", &["전북특별자치도", "전라북도", "전북"]),
    ("전남", &["전라남도", "전남"]),
];

/// 정책 분야 키워드
pub const KEYWORDS: &[&str] = &[
    "창업", "취업", "주거", "자격증", "대출", "교육", "R&D", "일자리",
];

/// 분야(대분류) 트리거 -> 카테고리 이름
pub const CATEGORIES: &[(&str, &str)] = &[
    ("복지", "복지문화"),
    ("문화", "복지문화"),
    ("참여", "참여권리"),
    ("권리", "참여권리"),
];

/// 대상 구분 키워드 (앞에 있을수록 우선)
pub const SEGMENT_VOCABULARIES: &[(TargetSegment, &[&str])] = &[
    (
        TargetSegment::Senior,
        &["어르신", "노인", "시니어", "노년", "고령"],
    ),
    (
        TargetSegment::Business,
        &["기업", "사업자", "소상공인", "자영업", "스타트업"],
    ),
    (
        TargetSegment::Youth,
        &["청년", "대학생", "취준생", "사회초년생"],
    ),
];

// ============================================================================
// Explicit-search signals
// ============================================================================

/// 정책 도메인 키워드
pub const POLICY_TERMS: &[&str] = &["정책", "지원", "사업", "프로그램"];

/// 검색 동사
pub const ACTION_VERBS: &[&str] = &["찾아", "검색", "뽑아", "추천", "보여"];

/// 일반 질문 동사
pub const GENERAL_QUESTION_VERBS: &[&str] = &["알려", "궁금", "이유", "뭐야", "설명"];

/// 요청 어미
pub const REQUEST_ENDINGS: &[&str] = &["줘", "주세요"];

/// 설명 요청 (마지막에 적용되어 항상 검색을 끔)
pub const EXPLANATION_TERMS: &[&str] = &["이유", "뭐야", "설명"];

/// 인사말 (메시지 전체가 일치할 때)
pub const GREETINGS: &[&str] = &["안녕", "안녕하세요"];

pub fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

pub fn first_match<'a>(text: &str, terms: &[&'a str]) -> Option<&'a str> {
    terms.iter().copied().find(|t| text.contains(t))
}

/// 검색 여부 판단에 쓰이는 신호
#[derive(Debug, Clone, Copy)]
pub struct SearchSignals {
    pub policy: bool,
    pub action: bool,
    pub general_question: bool,
    pub request_ending: bool,
    pub explanation: bool,
    pub greeting: bool,
    /// 나이/지역/키워드 중 하나라도 추출됨
    pub has_criteria: bool,
}

/// 검색 여부 규칙: 일치하면 값을 덮어씀
pub struct DecisionRule {
    pub name: &'static str,
    pub apply: fn(&SearchSignals) -> Option<bool>,
}

/// 평가 순서대로. 마지막으로 일치한 규칙이 이깁니다.
pub const DECISION_RULES: &[DecisionRule] = &[
    DecisionRule {
        name: "policy+action",
        apply: policy_with_action,
    },
    DecisionRule {
        name: "policy+criteria",
        apply: policy_with_criteria,
    },
    DecisionRule {
        name: "policy+request",
        apply: policy_with_request,
    },
    DecisionRule {
        name: "explanation",
        apply: explanation_request,
    },
    DecisionRule {
        name: "greeting",
        apply: greeting,
    },
];

fn policy_with_action(s: &SearchSignals) -> Option<bool> {
    (s.policy && s.action).then_some(true)
}

fn policy_with_criteria(s: &SearchSignals) -> Option<bool> {
    (s.policy && s.has_criteria && !s.general_question).then_some(true)
}

fn policy_with_request(s: &SearchSignals) -> Option<bool> {
    (s.policy && s.request_ending).then_some(true)
}

fn explanation_request(s: &SearchSignals) -> Option<bool> {
    s.explanation.then_some(false)
}

fn greeting(s: &SearchSignals) -> Option<bool> {
    s.greeting.then_some(false)
}

pub fn decide_explicit_search(signals: &SearchSignals) -> bool {
    let mut decision = false;
    for rule in DECISION_RULES {
        if let Some(verdict) = (rule.apply)(signals) {
            tracing::trace!("explicit-search rule '{}' -> {}", rule.name, verdict);
            decision = verdict;
        }
    }
    decision
}
