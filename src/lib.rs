//! policy-finder - 청년·기업 정책 통합 검색 챗봇
//!
//! 자연어 요청에서 검색 조건을 뽑아내고, 온통청년 / 기업마당 / 알리오플러스
//! 세 카탈로그를 동시에 조회해 중복을 제거한 뒤 무작위로 골라 돌려줍니다.

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod federation;
pub mod intent;
pub mod llm;
pub mod policy;
pub mod presenter;
pub mod source;

// Re-exports
pub use chat::{ChatReply, PolicyChatbot};
pub use config::{AppConfig, SourceSettings};
pub use error::{SourceError, SourceResult};
pub use federation::{EmptyReason, FederatedSearch, SearchOutcome};
pub use intent::{extract, QueryIntent, TargetSegment};
pub use llm::{ConversationFallback, KullmClient, NoFallback};
pub use policy::{PolicyRecord, RawItem, SourceKind};
pub use source::{AlioPlusSource, BizInfoSource, PolicySource, YouthSource};
