//! CLI 모듈
//!
//! policy-finder CLI 명령어 정의 및 구현

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::chat::PolicyChatbot;
use crate::config::AppConfig;
use crate::federation::SearchOutcome;
use crate::intent::extract;
use crate::presenter::{render_empty, render_policies, render_reply};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "policy-finder")]
#[command(version, about = "청년·기업 정책 통합 검색 챗봇", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 챗봇과 대화 (메시지가 없으면 표준 입력에서 한 줄씩)
    Chat {
        /// 보낼 메시지
        message: Option<String>,

        /// 일반 대화 폴백(KULLM) 사용 안 함
        #[arg(long)]
        no_llm: bool,
    },

    /// 검색 의도 판단 없이 바로 정책 검색
    Search {
        /// 검색 요청 문장
        message: String,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 메시지에서 추출한 검색 조건 확인
    Intent {
        /// 분석할 메시지
        message: String,
    },

    /// 설정 상태 확인
    Status,
}

// ============================================================================
// CLI Runner
// ============================================================================

/// CLI 명령어 실행
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chat { message, no_llm } => cmd_chat(message, no_llm).await,
        Commands::Search { message, json } => cmd_search(&message, json).await,
        Commands::Intent { message } => cmd_intent(&message),
        Commands::Status => cmd_status(),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// 대화 명령어 (chat)
async fn cmd_chat(message: Option<String>, no_llm: bool) -> Result<()> {
    let config = AppConfig::from_env();
    warn_missing_keys(&config);

    let bot = PolicyChatbot::from_config(&config, !no_llm).context("챗봇 초기화 실패")?;

    if let Some(message) = message {
        let reply = bot.respond(&message).await;
        println!("{}", render_reply(&reply));
        return Ok(());
    }

    println!("[*] 메시지를 입력하세요 (종료: 빈 줄 또는 Ctrl-D)");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("표준 출력 쓰기 실패")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("입력 읽기 실패")?;
        if line.trim().is_empty() {
            break;
        }

        let reply = bot.respond(&line).await;
        println!("{}\n", render_reply(&reply));
    }

    Ok(())
}

/// 검색 명령어 (search)
async fn cmd_search(message: &str, json: bool) -> Result<()> {
    let config = AppConfig::from_env();
    warn_missing_keys(&config);

    let bot = PolicyChatbot::from_config(&config, false).context("챗봇 초기화 실패")?;

    if !json {
        println!("[*] 검색 중: \"{}\"", message);
    }
    let (intent, outcome) = bot.search_text(message).await;

    if json {
        let output = serde_json::json!({
            "intent": intent,
            "count": outcome.len(),
            "policies": outcome.records(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("JSON 직렬화 실패")?
        );
        return Ok(());
    }

    match outcome {
        SearchOutcome::Found(records) => {
            println!("\n[OK] 검색 결과 ({} 건):", records.len());
            println!("{}", render_policies(&records));
        }
        SearchOutcome::NoResults(reason) => {
            println!("\n[!] {}", render_empty(reason));
        }
    }

    Ok(())
}

/// 조건 추출 명령어 (intent)
fn cmd_intent(message: &str) -> Result<()> {
    let intent = extract(message);
    println!(
        "{}",
        serde_json::to_string_pretty(&intent).context("JSON 직렬화 실패")?
    );
    Ok(())
}

/// 상태 명령어 (status)
fn cmd_status() -> Result<()> {
    println!("policy-finder v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let config = AppConfig::from_env();

    for (name, settings) in [
        ("온통청년", &config.youth),
        ("기업마당", &config.bizinfo),
        ("알리오플러스", &config.alioplus),
    ] {
        let state = if settings.has_api_key() { "[OK]" } else { "[!] " };
        let key = if settings.has_api_key() { "설정됨" } else { "미설정" };
        println!(
            "{} {}: API 키 {} (timeout {}s)",
            state,
            name,
            key,
            settings.timeout.as_secs()
        );
        println!("     {}", settings.endpoint);
    }

    println!();
    println!("[*] 대화 모델: {}", config.llm.model);
    if config.llm.token.is_some() {
        println!("[OK] HF_TOKEN: 설정됨");
    } else {
        println!("[!] HF_TOKEN: 미설정 (익명 호출)");
    }

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn warn_missing_keys(config: &AppConfig) {
    if config.configured_sources().is_empty() {
        tracing::warn!(
            "No source API keys configured. \
             Set YOUTH_API_KEY, BIZINFO_API_KEY or ALIOPLUS_API_KEY."
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search_command() {
        let cli = Cli::parse_from(["policy-finder", "search", "창업 지원 찾아줘", "--json"]);
        match cli.command {
            Commands::Search { message, json } => {
                assert_eq!(message, "창업 지원 찾아줘");
                assert!(json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_parse_chat_without_message() {
        let cli = Cli::parse_from(["policy-finder", "chat", "--no-llm"]);
        assert!(matches!(
            cli.command,
            Commands::Chat {
                message: None,
                no_llm: true
            }
        ));
    }

    #[test]
    fn test_intent_command_runs() {
        assert!(cmd_intent("25살 창원 취업 정책 찾아줘").is_ok());
    }
}
