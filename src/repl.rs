use anyhow::{Context, Result};
use std::future::Future;
use std::io::{self, Write};
use std::pin::pin;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::model_gateway::ModelGateway;
use crate::presenter::{self, ExitReason};
use crate::session::Session;

pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "выход"];

pub struct LoopOutcome {
    pub session: Session,
    pub reason: ExitReason,
}

/// Reads one line, without its line terminator. `None` once the input is closed.
pub(crate) async fn read_input_line<R>(input: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

fn is_exit_keyword(input: &str) -> bool {
    let lowered = input.to_lowercase();
    EXIT_KEYWORDS.contains(&lowered.as_str())
}

/// Runs the chat until an exit keyword, closed input, or `interrupt` resolves.
///
/// Whatever the reason, the transcript is printed once before returning.
pub async fn run_repl<G, R, W, S>(
    gateway: &G,
    mut session: Session,
    input: &mut R,
    out: &mut W,
    interrupt: S,
) -> Result<LoopOutcome>
where
    G: ModelGateway + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    let mut interrupt = pin!(interrupt);
    presenter::print_chat_banner(out, EXIT_KEYWORDS).context("Failed to write to stdout")?;

    let reason = loop {
        presenter::print_user_prompt(out).context("Failed to write to stdout")?;

        let read = tokio::select! {
            line = read_input_line(input) => Some(line),
            () = &mut interrupt => None,
        };
        let Some(read) = read else {
            break ExitReason::Interrupted;
        };
        let Some(line) = read.context("Failed to read stdin")? else {
            break ExitReason::EndOfInput;
        };

        let prompt = line.trim();
        if prompt.is_empty() {
            continue;
        }
        if is_exit_keyword(prompt) {
            break ExitReason::ExitKeyword;
        }

        let outcome = tokio::select! {
            outcome = session.run_turn(gateway, prompt) => Some(outcome),
            () = &mut interrupt => None,
        };
        match outcome {
            None => break ExitReason::Interrupted,
            Some(Ok(turn)) => presenter::print_turn(out, session.config(), &turn)
                .context("Failed to write to stdout")?,
            Some(Err(err)) => {
                warn!(
                    model = %session.config().model,
                    error = %err,
                    "chat turn failed"
                );
                presenter::print_error(out, &err).context("Failed to write to stdout")?;
            }
        }
    };

    info!(
        reason = ?reason,
        transcript_len = session.transcript().len(),
        "chat session ended"
    );
    presenter::print_transcript(out, session.transcript()).context("Failed to write to stdout")?;
    presenter::print_farewell(out, reason).context("Failed to write to stdout")?;

    Ok(LoopOutcome { session, reason })
}
