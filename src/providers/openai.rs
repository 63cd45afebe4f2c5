use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::http_errors::{request_error, status_error};
use super::{NO_TEXT_PLACEHOLDER, ProviderError};
use crate::config::Config;
use crate::model::{Provider, Transcript, TurnResult};

// Sampling parameters are left at the server defaults; some reasoning models reject overrides.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn chat_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn build_request<'a>(model: &'a str, transcript: &'a Transcript) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: transcript
            .messages()
            .iter()
            .map(|msg| ChatMessage {
                role: msg.role.as_str(),
                content: &msg.content,
            })
            .collect(),
    }
}

fn into_turn_result(response: ChatCompletionResponse) -> Result<TurnResult, ProviderError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        ProviderError::Unexpected("chat completion response contained no choices".to_string())
    })?;

    Ok(TurnResult {
        answer: choice
            .message
            .content
            .unwrap_or_else(|| NO_TEXT_PLACEHOLDER.to_string()),
        reasoning: None,
    })
}

pub async fn chat(
    client: &Client,
    cfg: &Config,
    model: &str,
    transcript: &Transcript,
) -> Result<TurnResult, ProviderError> {
    let api_url = chat_url(&cfg.openai_base_url);
    let body = build_request(model, transcript);
    debug!(
        api_url = %api_url,
        model = %model,
        message_count = body.messages.len(),
        "sending openai chat completion request"
    );

    let response = client
        .post(&api_url)
        .bearer_auth(&cfg.api_key)
        .timeout(Duration::from_secs(cfg.model_timeout_secs))
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            warn!(api_url = %api_url, model = %model, error = %err, "openai request failed");
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
            model = %model,
            status = %status,
            response_body_len = response_body.len(),
            "openai returned non-success status"
        );
        return Err(status_error(Provider::OpenAi, status, &response_body));
    }

    let parsed: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|err| request_error(err, &api_url, cfg.model_timeout_secs))?;
    let result = into_turn_result(parsed)?;
    debug!(
        model = %model,
        response_len = result.answer.len(),
        "received openai chat completion response"
    );
    Ok(result)
}
