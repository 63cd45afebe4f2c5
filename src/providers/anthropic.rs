use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::http_errors::{request_error, status_error};
use super::{NO_TEXT_PLACEHOLDER, ProviderError};
use crate::config::Config;
use crate::model::{Provider, Transcript, TurnResult};
use crate::session::SessionConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4000;
const THINKING_MAX_TOKENS: u32 = 20000;
// Must stay below THINKING_MAX_TOKENS.
const THINKING_BUDGET_TOKENS: u32 = 16000;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking: Option<ThinkingParam>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ThinkingParam {
    Enabled { budget_tokens: u32 },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Thinking {
        thinking: String,
    },
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

fn messages_url(base_url: &str) -> String {
    format!("{}/v1/messages", base_url.trim_end_matches('/'))
}

fn build_request<'a>(
    session: &'a SessionConfig,
    transcript: &'a Transcript,
) -> MessagesRequest<'a> {
    let (max_tokens, thinking) = if session.thinking {
        (
            THINKING_MAX_TOKENS,
            Some(ThinkingParam::Enabled {
                budget_tokens: THINKING_BUDGET_TOKENS,
            }),
        )
    } else {
        (DEFAULT_MAX_TOKENS, None)
    };

    MessagesRequest {
        model: &session.model,
        max_tokens,
        system: &session.system_prompt,
        messages: transcript
            .non_system()
            .map(|msg| RequestMessage {
                role: msg.role.as_str(),
                content: &msg.content,
            })
            .collect(),
        thinking,
    }
}

/// Later blocks of the same kind replace earlier ones.
fn collect_turn(blocks: Vec<ContentBlock>) -> TurnResult {
    let mut answer = None;
    let mut reasoning = None;

    for block in blocks {
        match block {
            ContentBlock::Thinking { thinking } => reasoning = Some(thinking),
            ContentBlock::Text { text } => answer = Some(text),
            ContentBlock::Other => {}
        }
    }

    TurnResult {
        answer: answer
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_TEXT_PLACEHOLDER.to_string()),
        reasoning,
    }
}

pub async fn chat(
    client: &Client,
    cfg: &Config,
    session: &SessionConfig,
    transcript: &Transcript,
) -> Result<TurnResult, ProviderError> {
    let api_url = messages_url(&cfg.anthropic_base_url);
    let body = build_request(session, transcript);
    debug!(
        api_url = %api_url,
        model = %session.model,
        message_count = body.messages.len(),
        max_tokens = body.max_tokens,
        thinking = body.thinking.is_some(),
        "sending anthropic messages request"
    );

    let response = client
        .post(&api_url)
        .header("x-api-key", &cfg.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .timeout(Duration::from_secs(cfg.model_timeout_secs))
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            warn!(
                api_url = %api_url,
                model = %session.model,
                error = %err,
                "anthropic request failed"
            );
            request_error(err, &api_url, cfg.model_timeout_secs)
        })?;

    let status = response.status();
    if !status.is_success() {
        let response_body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());
        warn!(
            api_url = %api_url,
            model = %session.model,
            status = %status,
            response_body_len = response_body.len(),
            "anthropic returned non-success status"
        );
        return Err(status_error(Provider::Anthropic, status, &response_body));
    }

    let parsed: MessagesResponse = response
        .json()
        .await
        .map_err(|err| request_error(err, &api_url, cfg.model_timeout_secs))?;
    let block_count = parsed.content.len();
    let result = collect_turn(parsed.content);
    debug!(
        model = %session.model,
        block_count,
        response_len = result.answer.len(),
        has_reasoning = result.reasoning.is_some(),
        "received anthropic messages response"
    );
    Ok(result)
}
