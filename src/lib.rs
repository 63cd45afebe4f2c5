pub mod config;
pub mod logging;
pub mod model;
pub mod model_gateway;
pub mod presenter;
pub mod providers;
pub mod repl;
pub mod session;
pub mod setup;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::io::BufReader;
use tracing::{info, warn};

use config::Config;
use model_gateway::HostModelGateway;
use repl::run_repl;
use session::Session;

async fn interrupt_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(
            error = %err,
            "failed to listen for Ctrl+C; interrupts will not end the chat cleanly"
        );
        std::future::pending::<()>().await;
    }
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let cfg = Config::from_env()?;
    info!(
        openai_base_url = %cfg.openai_base_url,
        anthropic_base_url = %cfg.anthropic_base_url,
        model_timeout_secs = cfg.model_timeout_secs,
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .build()
        .context("Failed to initialize HTTP client")?;
    let gateway = HostModelGateway::new(&client, &cfg);

    let mut input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();

    let session_config = setup::collect_session_config(&mut input, &mut out).await?;
    run_repl(
        &gateway,
        Session::new(session_config),
        &mut input,
        &mut out,
        interrupt_signal(),
    )
    .await?;
    Ok(())
}
