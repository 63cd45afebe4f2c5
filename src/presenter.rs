use std::io::{self, Write};

use crate::model::Transcript;
use crate::providers::ProviderError;
use crate::session::{CompletedTurn, SessionConfig};

const SECTION_RULE_WIDTH: usize = 40;
const HISTORY_RULE_WIDTH: usize = 30;
const REASONING_DIVIDER_WIDTH: usize = 30;
const ENTRY_DIVIDER_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    ExitKeyword,
    EndOfInput,
    Interrupted,
}

pub fn print_turn(
    out: &mut impl Write,
    config: &SessionConfig,
    turn: &CompletedTurn,
) -> io::Result<()> {
    let name = config.assistant_name();

    if config.show_reasoning
        && let Some(reasoning) = &turn.result.reasoning
    {
        writeln!(out, "\n🧠 [Reasoning ({})]:", name)?;
        writeln!(out, "{}", reasoning)?;
        writeln!(out, "{}", "-".repeat(REASONING_DIVIDER_WIDTH))?;
    }

    writeln!(
        out,
        "\n🤖 {} ({:.1}s): {}",
        name,
        turn.elapsed.as_secs_f64(),
        turn.result.answer
    )?;
    out.flush()
}

pub fn error_message(err: &ProviderError) -> String {
    match err {
        ProviderError::Timeout { timeout_secs } => format!(
            "Error: the request timed out after {}s. The server did not respond in time.",
            timeout_secs
        ),
        ProviderError::Connection { detail, .. } => format!(
            "Error: connection problem ({}). Check your network connection.",
            detail
        ),
        ProviderError::RateLimit { message } => {
            format!("Error: rate limit exceeded. {}", message)
        }
        ProviderError::BadRequest { message } => format!("Request error (400): {}", message),
        ProviderError::Api {
            provider,
            status,
            message,
        } => format!("{} API error ({}): {}", provider, status, message),
        ProviderError::Unexpected(message) => format!("Unknown error: {}", message),
    }
}

pub fn print_error(out: &mut impl Write, err: &ProviderError) -> io::Result<()> {
    writeln!(out, "\n❌ {}", error_message(err))?;
    out.flush()
}

pub fn print_transcript(out: &mut impl Write, transcript: &Transcript) -> io::Result<()> {
    let rule = "=".repeat(HISTORY_RULE_WIDTH);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, "📜 CHAT HISTORY")?;
    writeln!(out, "{}", rule)?;
    for msg in transcript.messages() {
        writeln!(
            out,
            "[{}]: {}",
            msg.role.as_str().to_ascii_uppercase(),
            msg.content
        )?;
        writeln!(out, "{}", "-".repeat(ENTRY_DIVIDER_WIDTH))?;
    }
    out.flush()
}

pub fn print_farewell(out: &mut impl Write, reason: ExitReason) -> io::Result<()> {
    match reason {
        ExitReason::ExitKeyword | ExitReason::EndOfInput => writeln!(out, "\n👋 Goodbye!")?,
        ExitReason::Interrupted => writeln!(out, "\n\n👋 Interrupted, shutting down.")?,
    }
    out.flush()
}

pub fn print_chat_banner(out: &mut impl Write, exit_keywords: &[&str]) -> io::Result<()> {
    let quoted: Vec<String> = exit_keywords.iter().map(|kw| format!("'{}'", kw)).collect();
    writeln!(
        out,
        "💬 Chat started. Type {} to finish.",
        quoted.join(", ")
    )?;
    out.flush()
}

pub fn print_user_prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "\n👤 You: ")?;
    out.flush()
}

pub fn print_section_header(out: &mut impl Write, title: &str) -> io::Result<()> {
    let rule = "=".repeat(SECTION_RULE_WIDTH);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, " {}", title)?;
    writeln!(out, "{}", rule)
}

pub fn print_setup_summary(out: &mut impl Write, config: &SessionConfig) -> io::Result<()> {
    let rule = "-".repeat(SECTION_RULE_WIDTH);
    writeln!(out, "\n{}", rule)?;
    writeln!(out, "✅ Setup complete!")?;
    writeln!(out, "🤖 Model: {}", config.model)?;
    writeln!(out, "🎭 Persona: {}", config.persona_name)?;
    if config.thinking {
        writeln!(
            out,
            "🧠 Thinking mode: ON (show reasoning: {})",
            if config.show_reasoning { "yes" } else { "no" }
        )?;
    }
    writeln!(out, "{}\n", rule)?;
    out.flush()
}
