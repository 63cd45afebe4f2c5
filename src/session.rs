use std::time::{Duration, Instant};
use tracing::debug;

use crate::model::{Provider, Transcript, TurnResult};
use crate::model_gateway::ModelGateway;
use crate::providers::ProviderError;

/// Choices made during setup. Fixed for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub model: String,
    pub thinking: bool,
    /// Only meaningful when `thinking` is set.
    pub show_reasoning: bool,
    pub persona_name: String,
    pub system_prompt: String,
}

impl SessionConfig {
    pub fn provider(&self) -> Provider {
        Provider::for_model(&self.model)
    }

    pub fn assistant_name(&self) -> &'static str {
        self.provider().assistant_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTurn {
    pub result: TurnResult,
    pub elapsed: Duration,
}

pub struct Session {
    config: SessionConfig,
    transcript: Transcript,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let transcript = Transcript::new(config.system_prompt.clone());
        Self { config, transcript }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Records the user message, then asks the gateway for a reply.
    ///
    /// A failed call keeps the user message so it stays in context for the next turn.
    pub async fn run_turn<G>(
        &mut self,
        gateway: &G,
        user_input: &str,
    ) -> Result<CompletedTurn, ProviderError>
    where
        G: ModelGateway + ?Sized,
    {
        self.transcript.push_user(user_input);

        let started = Instant::now();
        let result = gateway.respond(&self.config, &self.transcript).await?;
        let elapsed = started.elapsed();

        debug!(
            elapsed_ms = elapsed.as_millis() as u64,
            transcript_len = self.transcript.len() + 1,
            "turn completed"
        );
        self.transcript.push_assistant(result.answer.clone());
        Ok(CompletedTurn { result, elapsed })
    }
}
