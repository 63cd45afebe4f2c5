use reqwest::StatusCode;
use serde::Deserialize;
use std::error::Error as StdError;
use std::io::ErrorKind;

use super::ProviderError;
use crate::model::Provider;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_chain_has_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == ErrorKind::TimedOut
        {
            return true;
        }

        if source
            .to_string()
            .to_ascii_lowercase()
            .contains("timed out")
        {
            return true;
        }

        current = source.source();
    }

    false
}

fn root_cause(err: &(dyn StdError + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

pub(crate) fn request_error(
    err: reqwest::Error,
    api_url: &str,
    timeout_secs: u64,
) -> ProviderError {
    if err.is_timeout() || error_chain_has_timeout(&err) {
        return ProviderError::Timeout { timeout_secs };
    }

    if err.is_connect() {
        return ProviderError::Connection {
            url: api_url.to_string(),
            detail: root_cause(&err),
        };
    }

    if err.is_decode() {
        return ProviderError::Unexpected(format!(
            "failed to parse response from '{}': {}",
            api_url, err
        ));
    }

    ProviderError::Unexpected(format!("failed to call '{}': {}", api_url, err))
}

/// Pulls the human-readable message out of a vendor error body, falling back to the raw body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

pub(crate) fn status_error(provider: Provider, status: StatusCode, body: &str) -> ProviderError {
    let message = error_message(status, body);
    match status {
        StatusCode::BAD_REQUEST => ProviderError::BadRequest { message },
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimit { message },
        _ => ProviderError::Api {
            provider,
            status: status.as_u16(),
            message,
        },
    }
}
