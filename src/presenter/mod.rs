//! 결과 표시 - 레코드와 응답을 사용자용 텍스트로

use crate::chat::ChatReply;
use crate::federation::{EmptyReason, YOUTH_AGE_CEILING};
use crate::policy::{PolicyRecord, SourceKind, NOT_AVAILABLE};

const SEPARATOR_WIDTH: usize = 80;

pub const GREETING_TEXT: &str =
    "안녕하세요! 😊 청년 및 기업 정책 추천 챗봇입니다.\n무엇을 도와드릴까요?";
pub const FOUND_HEADER: &str = "관련 정책을 찾아드렸습니다!";
pub const NO_RESULTS_TEXT: &str = "조건에 맞는 정책을 찾지 못했습니다.";

/// 정책 하나를 출처별 형식으로
pub fn render_policy(record: &PolicyRecord) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);

    match record.source {
        SourceKind::Youth => {
            let age = |v: Option<u8>| v.map(|a| a.to_string()).unwrap_or_else(|| "?".to_string());
            let agency = if record.agency == NOT_AVAILABLE {
                "정보 없음"
            } else {
                record.agency.as_str()
            };
            format!(
                "\n📌 **{}** [{}]\n\n🏢 주관기관: {}\n📅 신청기간: {}\n👥 나이: {}세 ~ {}세\n\n🔗 상세정보: {}\n{}\n",
                record.title,
                record.source.label(),
                agency,
                record.apply_period.as_deref().unwrap_or("상시 신청 가능"),
                age(record.min_age),
                age(record.max_age),
                record.url.as_deref().unwrap_or("링크 없음"),
                separator
            )
        }
        SourceKind::BizInfo => format!(
            "\n🏢 **{}** [{}]\n\n기관: {}\n\n🔗 상세 보기: {}\n{}\n",
            record.title,
            record.source.label(),
            record.agency,
            record.url.as_deref().unwrap_or("링크 없음"),
            separator
        ),
        SourceKind::AlioPlus => format!(
            "\n🛍️ **{}** [{}]\n\n기관: {}\n\n🔗 상세 보기: {}\n{}\n",
            record.title,
            record.source.label(),
            record.agency,
            record.url.as_deref().unwrap_or("정보 없음"),
            separator
        ),
    }
}

/// 결과 목록
pub fn render_policies(records: &[PolicyRecord]) -> String {
    let mut text = format!("\n\n✨ **관련 정책 {}개:**\n", records.len());
    for record in records {
        text.push_str(&render_policy(record));
    }
    text
}

/// 빈 결과 안내
pub fn render_empty(reason: EmptyReason) -> String {
    match reason {
        EmptyReason::NoCandidates => NO_RESULTS_TEXT.to_string(),
        EmptyReason::AgeAboveYouthCeiling { age } => format!(
            "{}\n(온통청년 정책은 {}세 이하 대상이라 {}세 조건으로는 청년 정책을 조회하지 않았습니다.)",
            NO_RESULTS_TEXT, YOUTH_AGE_CEILING, age
        ),
    }
}

/// 챗봇 응답 전체
pub fn render_reply(reply: &ChatReply) -> String {
    match reply {
        ChatReply::Greeting => GREETING_TEXT.to_string(),
        ChatReply::Policies(records) => format!("{}{}", FOUND_HEADER, render_policies(records)),
        ChatReply::NoResults(reason) => render_empty(*reason),
        ChatReply::Conversation(text) => text.clone(),
    }
}
