use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::LineConfig;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("LINE_CHANNEL_ACCESS_TOKEN is empty")]
    MissingToken,

    #[error("LINE push failed: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("LINE push request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Outbound delivery of messages to a single user.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn push(&self, user_id: &str, messages: Vec<Value>) -> Result<(), PushError>;
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<Value>,
}

#[derive(Clone)]
pub struct LineClient {
    client: Client,
    config: LineConfig,
}

impl LineClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: LineConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl MessagePusher for LineClient {
    async fn push(&self, user_id: &str, messages: Vec<Value>) -> Result<(), PushError> {
        let token = self
            .config
            .channel_access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(PushError::MissingToken)?;

        debug!(user_id = %user_id, count = messages.len(), "Pushing LINE messages");

        let response = self
            .client
            .post(&self.config.push_url)
            .bearer_auth(token)
            .json(&PushRequest {
                to: user_id,
                messages,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
