use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::PlacesCache;
use crate::clients::line::{LineClient, MessagePusher};
use crate::clients::openai::{OpenAiClient, ReviewSummarizer};
use crate::clients::places::{GooglePlacesClient, PlacesProvider};
use crate::config::Config;
use crate::line::ConversationStore;
use crate::services::{BotService, ReviewEnricher, ShopSearchService};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all HTTP-based services to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("ramen-bot/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub cache: Arc<PlacesCache>,

    pub conversations: Arc<ConversationStore>,

    pub places: Arc<dyn PlacesProvider>,

    pub search_service: Arc<ShopSearchService>,

    pub bot: Arc<BotService>,
}

impl SharedState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.places.request_timeout_seconds)?;

        let places = Arc::new(GooglePlacesClient::with_shared_client(
            http_client.clone(),
            config.places.clone(),
        ));
        let pusher = Arc::new(LineClient::with_shared_client(
            http_client.clone(),
            config.line.clone(),
        ));

        if config.places.api_key.is_none() {
            warn!("GOOGLE_PLACES_API_KEY is not set; searches will report unavailable");
        }
        if config.line.channel_access_token.is_none() {
            warn!("LINE_CHANNEL_ACCESS_TOKEN is not set; replies cannot be delivered");
        }

        let summarizer: Option<Arc<dyn ReviewSummarizer>> =
            if config.openai.enabled && config.openai.api_key.is_some() {
                Some(Arc::new(OpenAiClient::with_shared_client(
                    http_client,
                    config.openai.clone(),
                )))
            } else {
                info!("Review summaries disabled");
                None
            };

        Ok(Self::with_collaborators(config, places, pusher, summarizer))
    }

    /// Wires the services around the given external collaborators.
    pub fn with_collaborators(
        config: Config,
        places: Arc<dyn PlacesProvider>,
        pusher: Arc<dyn MessagePusher>,
        summarizer: Option<Arc<dyn ReviewSummarizer>>,
    ) -> Self {
        let cache = Arc::new(PlacesCache::new());
        let conversations = Arc::new(ConversationStore::new());

        let search_service = Arc::new(ShopSearchService::new(cache.clone(), places.clone()));
        let enricher = Arc::new(ReviewEnricher::new(
            places.clone(),
            summarizer,
            &config.search,
        ));

        let bot = Arc::new(BotService::new(
            config.search.clone(),
            config.public_base_url().map(ToString::to_string),
            conversations.clone(),
            search_service.clone(),
            enricher,
            pusher,
        ));

        Self {
            config: Arc::new(config),
            cache,
            conversations,
            places,
            search_service,
            bot,
        }
    }
}
