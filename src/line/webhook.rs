//! Inbound LINE webhook payloads.
//!
//! Only the parts the bot reacts to are modelled; anything else deserializes
//! into the catch-all variants.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Events stay raw until [`WebhookBody::into_events`] so that one bad event
/// does not cost the rest of the batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub events: Vec<Value>,
}

impl WebhookBody {
    /// Parses each event on its own, skipping the ones that do not fit.
    #[must_use]
    pub fn into_events(self) -> Vec<WebhookEvent> {
        self.events
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<WebhookEvent>(raw) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed webhook event");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,

    pub source: Option<EventSource>,

    pub message: Option<IncomingMessage>,
}

impl WebhookEvent {
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSource {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingMessage {
    Text {
        #[serde(default)]
        text: String,
    },
    Location { latitude: f64, longitude: f64 },
    #[serde(other)]
    Other,
}
