pub mod anthropic;
mod http_errors;
pub mod openai;
#[cfg(test)]
mod test_server;

use thiserror::Error;

use crate::model::Provider;

/// Shown when a response carries no text content at all.
pub const NO_TEXT_PLACEHOLDER: &str = "[No text response from the model]";

/// Every way a single chat request can fail.
///
/// None of these end the session; the loop reports them and waits for the next input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("failed to connect to '{url}': {detail}")]
    Connection { url: String, detail: String },

    #[error("rate limit exceeded: {message}")]
    RateLimit { message: String },

    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("{provider} API returned status {status}: {message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("{0}")]
    Unexpected(String),
}
