use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::OpenAiConfig;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("OPENAI_API_KEY is missing")]
    MissingApiKey,

    #[error("OpenAI API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("OpenAI request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Condenses a handful of review texts into one short line.
#[async_trait]
pub trait ReviewSummarizer: Send + Sync {
    async fn summarize(&self, reviews: &[String]) -> Result<Option<String>, SummarizeError>;
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: String,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputContent {
    #[serde(rename = "type", default)]
    kind: String,
    text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenated `output_text` parts, trimmed; `None` when nothing was said.
    fn output_text(&self) -> Option<String> {
        let text: String = self
            .output
            .iter()
            .flat_map(|item| &item.content)
            .filter(|c| c.kind == "output_text")
            .filter_map(|c| c.text.as_deref())
            .collect();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn build_prompt(reviews: &[String]) -> String {
    let mut prompt = String::from(
        "次の口コミを日本語で30字程度に要約して。出力は1文のみで、客観的な文体にする。\n\n",
    );
    let bullets: Vec<String> = reviews.iter().map(|r| format!("- {r}")).collect();
    prompt.push_str(&bullets.join("\n"));
    prompt
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ReviewSummarizer for OpenAiClient {
    async fn summarize(&self, reviews: &[String]) -> Result<Option<String>, SummarizeError> {
        if reviews.is_empty() {
            return Ok(None);
        }

        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SummarizeError::MissingApiKey)?;

        debug!(count = reviews.len(), model = %self.config.model, "Summarizing reviews");

        let response = self
            .client
            .post(&self.config.responses_url)
            .bearer_auth(api_key)
            .json(&ResponsesRequest {
                model: &self.config.model,
                input: build_prompt(reviews),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, body });
        }

        let body: ResponsesResponse = response.json().await?;
        Ok(body.output_text())
    }
}
