use reqwest::Client;
use std::fmt;
use tracing::debug;

use crate::config::Config;
use crate::providers::{self, ProviderError};
use crate::session::SessionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Conversation history for one session.
///
/// Always starts with exactly one system message and only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Conversation turns without the system message, for APIs that take it out of band.
    pub fn non_system(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|msg| msg.role != MessageRole::System)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Models whose id mentions "claude" go to Anthropic, everything else to OpenAI.
    pub fn for_model(model: &str) -> Self {
        if model.to_lowercase().contains("claude") {
            Self::Anthropic
        } else {
            Self::OpenAi
        }
    }

    pub fn assistant_name(&self) -> &'static str {
        match self {
            Self::OpenAi => "GPT",
            Self::Anthropic => "Claude",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "OpenAI"),
            Self::Anthropic => write!(f, "Anthropic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResult {
    pub answer: String,
    pub reasoning: Option<String>,
}

pub async fn get_response(
    client: &Client,
    cfg: &Config,
    session: &SessionConfig,
    transcript: &Transcript,
) -> Result<TurnResult, ProviderError> {
    let provider = Provider::for_model(&session.model);
    debug!(
        provider = %provider,
        model = %session.model,
        message_count = transcript.len(),
        thinking = session.thinking,
        "dispatching model chat request"
    );

    match provider {
        Provider::OpenAi => providers::openai::chat(client, cfg, &session.model, transcript).await,
        Provider::Anthropic => providers::anthropic::chat(client, cfg, session, transcript).await,
    }
}
