use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

use crate::config::Config;
use crate::model::{self, Transcript, TurnResult};
use crate::providers::ProviderError;
use crate::session::SessionConfig;

pub type TurnFuture<'a> = Pin<Box<dyn Future<Output = Result<TurnResult, ProviderError>> + 'a>>;

/// Produces one assistant reply for the current transcript.
pub trait ModelGateway {
    fn respond<'a>(&'a self, session: &'a SessionConfig, transcript: &'a Transcript)
    -> TurnFuture<'a>;
}

pub struct HostModelGateway<'a> {
    client: &'a Client,
    cfg: &'a Config,
}

impl<'a> HostModelGateway<'a> {
    pub fn new(client: &'a Client, cfg: &'a Config) -> Self {
        Self { client, cfg }
    }
}

impl ModelGateway for HostModelGateway<'_> {
    fn respond<'b>(
        &'b self,
        session: &'b SessionConfig,
        transcript: &'b Transcript,
    ) -> TurnFuture<'b> {
        Box::pin(model::get_response(
            self.client,
            self.cfg,
            session,
            transcript,
        ))
    }
}
