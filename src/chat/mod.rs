//! Chat 모듈 - 메시지 라우팅
//!
//! 인사말은 바로 응답하고, 검색 의도가 있으면 연합 검색을,
//! 없으면 대화 폴백으로 넘깁니다.

use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::federation::{EmptyReason, FederatedSearch, SearchOutcome};
use crate::intent::rules::GREETINGS;
use crate::intent::{extract, QueryIntent};
use crate::llm::{ConversationFallback, KullmClient, NoFallback};
use crate::policy::PolicyRecord;

/// 챗봇 응답
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Greeting,
    Policies(Vec<PolicyRecord>),
    NoResults(EmptyReason),
    /// 대화 폴백 응답 (그대로 전달)
    Conversation(String),
}

/// 정책 추천 챗봇
pub struct PolicyChatbot {
    search: FederatedSearch,
    fallback: Arc<dyn ConversationFallback>,
}

impl PolicyChatbot {
    pub fn new(search: FederatedSearch, fallback: Arc<dyn ConversationFallback>) -> Self {
        Self { search, fallback }
    }

    /// 설정으로 생성 (`use_llm`이 false면 대화 폴백 없음)
    pub fn from_config(config: &AppConfig, use_llm: bool) -> Result<Self> {
        let search = FederatedSearch::from_config(config)?;
        let fallback: Arc<dyn ConversationFallback> = if use_llm {
            Arc::new(KullmClient::new(&config.llm)?)
        } else {
            Arc::new(NoFallback)
        };
        Ok(Self::new(search, fallback))
    }

    pub fn search_engine(&self) -> &FederatedSearch {
        &self.search
    }

    /// 메시지 하나에 응답
    pub async fn respond(&self, message: &str) -> ChatReply {
        if GREETINGS.contains(&message.trim()) {
            return ChatReply::Greeting;
        }

        let intent = extract(message);

        if intent.explicit_search {
            return match self.search.search(&intent).await {
                SearchOutcome::Found(records) => ChatReply::Policies(records),
                SearchOutcome::NoResults(reason) => ChatReply::NoResults(reason),
            };
        }

        tracing::debug!("No explicit search intent, using {} fallback", self.fallback.name());
        let text = self.fallback.generate(&build_prompt(message)).await;
        ChatReply::Conversation(text)
    }

    /// 검색 의도와 관계없이 연합 검색 실행
    pub async fn search_text(&self, message: &str) -> (QueryIntent, SearchOutcome) {
        let intent = extract(message);
        let outcome = self.search.search(&intent).await;
        (intent, outcome)
    }
}

/// 대화 폴백 프롬프트
pub fn build_prompt(message: &str) -> String {
    format!(
        "너는 한국어로 자연스럽게 답하는 정책 안내 AI다. \
         자문자답이나 역할 표시 없이, 완전한 문장으로 답해라.\n\n\
         질문: {}\n\n답변:",
        message
    )
}
