//! Conversation handling for inbound LINE events.
//!
//! A user first sends a text containing the trigger word, then shares a
//! location; the bot answers with a carousel of nearby shops.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::clients::line::MessagePusher;
use crate::config::SearchConfig;
use crate::line::flex::build_carousel;
use crate::line::messages;
use crate::line::{ConversationState, ConversationStore, IncomingMessage, WebhookEvent};
use crate::services::enrichment::ReviewEnricher;
use crate::services::shop_search::{SearchOutcome, ShopSearchService};

pub struct BotService {
    search_config: SearchConfig,
    public_base_url: Option<String>,
    conversations: Arc<ConversationStore>,
    search: Arc<ShopSearchService>,
    enricher: Arc<ReviewEnricher>,
    pusher: Arc<dyn MessagePusher>,
}

impl BotService {
    #[must_use]
    pub fn new(
        search_config: SearchConfig,
        public_base_url: Option<String>,
        conversations: Arc<ConversationStore>,
        search: Arc<ShopSearchService>,
        enricher: Arc<ReviewEnricher>,
        pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            search_config,
            public_base_url,
            conversations,
            search,
            enricher,
            pusher,
        }
    }

    pub async fn handle_event(&self, event: &WebhookEvent) {
        let Some(user_id) = event.user_id() else {
            debug!(kind = %event.kind, "Ignoring event without a user");
            return;
        };

        match &event.message {
            Some(IncomingMessage::Text { text }) => self.handle_text(user_id, text).await,
            Some(IncomingMessage::Location {
                latitude,
                longitude,
                ..
            }) => self.handle_location(user_id, *latitude, *longitude).await,
            _ => debug!(kind = %event.kind, "Ignoring unsupported event"),
        }
    }

    async fn handle_text(&self, user_id: &str, text: &str) {
        if text.contains(&self.search_config.trigger_word) {
            self.conversations
                .set(user_id, ConversationState::WaitingLocation)
                .await;
            self.send(user_id, vec![messages::location_request()]).await;
        } else {
            self.send(user_id, vec![messages::text(messages::USAGE_HINT)])
                .await;
        }
    }

    async fn handle_location(&self, user_id: &str, lat: f64, lng: f64) {
        if self.conversations.get(user_id).await != ConversationState::WaitingLocation {
            self.send(user_id, vec![messages::text(messages::TRIGGER_FIRST_HINT)])
                .await;
            return;
        }

        let outcome = self
            .search
            .find_nearby(
                lat,
                lng,
                &self.search_config.keyword,
                self.search_config.item_limit,
            )
            .await;

        info!(user_id = %user_id, outcome = outcome.label(), "Location search finished");

        let reply = match outcome {
            SearchOutcome::Found(mut items) => {
                self.enricher.enrich(&mut items).await;
                build_carousel(&items, self.public_base_url.as_deref())
            }
            SearchOutcome::NotFound => messages::text(messages::NOT_FOUND),
            SearchOutcome::Unavailable => messages::text(messages::UNAVAILABLE),
        };

        self.send(user_id, vec![reply]).await;
        self.conversations.reset(user_id).await;
    }

    async fn send(&self, user_id: &str, messages: Vec<Value>) {
        if let Err(e) = self.pusher.push(user_id, messages).await {
            error!(user_id = %user_id, error = %e, "Failed to push LINE message");
        }
    }
}
