use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::AsyncBufRead;
use tracing::info;

use crate::model::Provider;
use crate::presenter;
use crate::repl::read_input_line;
use crate::session::SessionConfig;

pub const DEFAULT_MODEL: &str = "gpt-5-mini";

pub const MODELS: &[(&str, &str)] = &[
    ("1", DEFAULT_MODEL),
    ("2", "gpt-5.2"),
    ("3", "o4-mini"),
    ("4", "o3"),
    ("5", "claude-sonnet-4-5"),
    ("6", "claude-opus-4-5"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub key: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const PERSONAS: &[Persona] = &[
    Persona {
        key: "1",
        name: "Polite assistant",
        prompt: "You are a helpful and polite assistant.",
    },
    Persona {
        key: "2",
        name: "Python expert",
        prompt: "You are a senior Python developer. Answer with technical precision, use the \
                 language's idioms, and give code examples that follow PEP 8. Don't waste time \
                 on empty politeness.",
    },
    Persona {
        key: "3",
        name: "Grumpy old-timer",
        prompt: "You are a grumpy old man who dislikes everything and hates stupid questions. \
                 Answer rudely and sarcastically, but make sure the answer is correct.",
    },
    Persona {
        key: "4",
        name: "Five-year-old",
        prompt: "You are a five-year-old child. Answer in simple words and use emoji 🍭.",
    },
];

pub fn default_persona() -> &'static Persona {
    &PERSONAS[0]
}

/// Menu key, free-text model id, or the default on empty input.
pub fn resolve_model(choice: &str) -> String {
    let choice = choice.trim();
    if let Some((_, model)) = MODELS.iter().find(|(key, _)| *key == choice) {
        return (*model).to_string();
    }
    if choice.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        choice.to_string()
    }
}

pub fn resolve_persona(choice: &str) -> &'static Persona {
    let choice = choice.trim();
    PERSONAS
        .iter()
        .find(|persona| persona.key == choice)
        .unwrap_or_else(default_persona)
}

async fn ask<R, W>(input: &mut R, out: &mut W, prompt: &str) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{}", prompt).context("Failed to write prompt")?;
    out.flush().context("Failed to flush stdout")?;
    let answer = read_input_line(input)
        .await
        .context("Failed to read stdin")?
        .unwrap_or_default();
    Ok(answer.trim().to_string())
}

/// Walks the user through model, thinking mode and persona selection.
///
/// Unrecognized answers fall back to defaults; nothing here fails on bad input.
pub async fn collect_session_config<R, W>(input: &mut R, out: &mut W) -> Result<SessionConfig>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    presenter::print_section_header(out, "CHAT SETUP").context("Failed to write menu")?;

    writeln!(out, "\n[1] Choose a model:").context("Failed to write menu")?;
    for (key, model) in MODELS {
        writeln!(out, "  {}. {}", key, model).context("Failed to write menu")?;
    }
    writeln!(out, "  Or type a model name.").context("Failed to write menu")?;
    let model = resolve_model(
        &ask(
            input,
            out,
            &format!("  > Your choice (Enter for {}): ", DEFAULT_MODEL),
        )
        .await?,
    );

    let mut thinking = false;
    let mut show_reasoning = false;
    if Provider::for_model(&model) == Provider::Anthropic {
        writeln!(out, "\n  ℹ️ Anthropic model detected: {}", model)
            .context("Failed to write menu")?;
        let answer = ask(input, out, "  ? Enable thinking mode? (y/n): ").await?;
        if answer.eq_ignore_ascii_case("y") {
            thinking = true;
            let answer = ask(input, out, "  ? Show the reasoning? (y/n, default y): ").await?;
            show_reasoning = !answer.eq_ignore_ascii_case("n");
        }
    }

    writeln!(out, "\n[2] Choose a persona:").context("Failed to write menu")?;
    for persona in PERSONAS {
        writeln!(out, "  {}. {}", persona.key, persona.name).context("Failed to write menu")?;
    }
    let persona = resolve_persona(
        &ask(
            input,
            out,
            &format!("  > Your choice (Enter for {}): ", default_persona().name),
        )
        .await?,
    );

    let config = SessionConfig {
        model,
        thinking,
        show_reasoning,
        persona_name: persona.name.to_string(),
        system_prompt: persona.prompt.to_string(),
    };
    info!(
        model = %config.model,
        provider = %config.provider(),
        persona = %config.persona_name,
        thinking = config.thinking,
        show_reasoning = config.show_reasoning,
        "session configured"
    );
    presenter::print_setup_summary(out, &config).context("Failed to write summary")?;
    Ok(config)
}
