//! 대화 폴백 모듈 - 검색 의도가 없는 메시지에 대한 일반 응답
//!
//! Hugging Face Inference API로 KULLM 모델을 호출합니다.
//! 실패해도 에러를 올리지 않고 사용자에게 보여줄 안내 문구를 돌려줍니다.
//!
//! ## 사용법
//! ```rust,ignore
//! let fallback = KullmClient::new(&config.llm)?;
//! let text = fallback.generate("질문: 청년이란?\n\n답변:").await;
//! ```

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;

// ============================================================================
// ConversationFallback Trait
// ============================================================================

/// 대화 폴백 트레이트
#[async_trait]
pub trait ConversationFallback: Send + Sync {
    /// 프롬프트로 응답 생성 (실패 시 안내 문구)
    async fn generate(&self, prompt: &str) -> String;

    /// 폴백 이름
    fn name(&self) -> &str;
}

// ============================================================================
// Hugging Face Inference (KULLM)
// ============================================================================

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models";

/// 최대 시도 횟수
const MAX_ATTEMPTS: u32 = 2;
/// 모델 로딩(503) 시 대기 시간
const MODEL_LOADING_WAIT: Duration = Duration::from_secs(20);
/// 기본 생성 토큰 수
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 120;

const MSG_MODEL_LOADING: &str = "⏳ 모델이 로딩 중입니다. 잠시 후 다시 시도해주세요.";
const MSG_TIMEOUT: &str = "⏱️ 응답 시간이 초과되었습니다.";
const MSG_ERROR: &str = "죄송합니다. 응답 생성 중 문제가 발생했습니다.";
const MSG_NO_OUTPUT: &str = "응답을 생성하지 못했습니다.";
const MSG_FAILED: &str = "응답 생성에 실패했습니다.";
const MSG_EMPTY: &str = "더 구체적으로 질문해주시면 도움을 드리겠습니다.";

/// Inference API 요청 본문
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
    repetition_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// KULLM 대화 클라이언트
#[derive(Debug)]
pub struct KullmClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    max_new_tokens: u32,
}

impl KullmClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!("KULLM Inference API: {}", settings.model);

        Ok(Self {
            client,
            api_url: format!("{}/{}", HF_INFERENCE_URL, settings.model),
            token: settings.token.clone(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        })
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: 0.6,
                top_p: 0.9,
                do_sample: true,
                return_full_text: false,
                repetition_penalty: 1.12,
            },
        }
    }
}

#[async_trait]
impl ConversationFallback for KullmClient {
    async fn generate(&self, prompt: &str) -> String {
        let body = self.request_body(prompt);

        for attempt in 0..MAX_ATTEMPTS {
            let is_last = attempt + 1 == MAX_ATTEMPTS;

            let mut request = self.client.post(&self.api_url).json(&body);
            if let Some(ref token) = self.token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) if e.is_timeout() => {
                    if is_last {
                        return MSG_TIMEOUT.to_string();
                    }
                    tracing::warn!("Timeout, retrying (attempt {}/{})", attempt + 1, MAX_ATTEMPTS);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("KULLM request failed: {}", e);
                    return MSG_ERROR.to_string();
                }
            };

            let status = response.status();

            // 503: 모델 로딩 중
            if status.as_u16() == 503 {
                if is_last {
                    return MSG_MODEL_LOADING.to_string();
                }
                tracing::warn!(
                    "Model loading, waiting {:?} (attempt {}/{})",
                    MODEL_LOADING_WAIT,
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(MODEL_LOADING_WAIT).await;
                continue;
            }

            if !status.is_success() {
                tracing::warn!("KULLM API error: {}", status);
                return MSG_ERROR.to_string();
            }

            return match response.json::<Vec<GeneratedText>>().await {
                Ok(generated) => match generated.into_iter().next() {
                    Some(first) => clean_response(&first.generated_text),
                    None => MSG_NO_OUTPUT.to_string(),
                },
                Err(e) => {
                    tracing::warn!("Failed to parse KULLM response: {}", e);
                    MSG_NO_OUTPUT.to_string()
                }
            };
        }

        MSG_FAILED.to_string()
    }

    fn name(&self) -> &str {
        "kullm"
    }
}

// ============================================================================
// NoFallback
// ============================================================================

/// 대화 기능을 끈 경우
#[derive(Debug, Default)]
pub struct NoFallback;

const MSG_DISABLED: &str = "일반 대화 기능이 꺼져 있습니다. \
     \"25살 창원 취업 정책 찾아줘\"처럼 정책 검색을 요청해주세요.";

#[async_trait]
impl ConversationFallback for NoFallback {
    async fn generate(&self, _prompt: &str) -> String {
        MSG_DISABLED.to_string()
    }

    fn name(&self) -> &str {
        "none"
    }
}

// ============================================================================
// Response cleaning
// ============================================================================

static USER_TURN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\b(User|사용자)\s*:\s*.*?\n").unwrap());
static ASSISTANT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(Assistant|Chatbot|챗봇)\s*:\s*").unwrap());
static EXTRA_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// 역할 표시 제거, 빈 줄 정리
pub fn clean_response(text: &str) -> String {
    let text = USER_TURN.replace_all(text, "");
    let text = ASSISTANT_PREFIX.replace_all(&text, "");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    let text = text.trim();

    if text.is_empty() {
        MSG_EMPTY.to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
