use async_trait::async_trait;
use reqwest::{Client, header};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::PlacesConfig;
use crate::models::place::{
    NearbySearchResponse, PlaceDetailsResponse, PlaceReview, PlacesStatus,
};
use crate::models::shop::SearchQuery;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Places API returned {status}: {}", .message.as_deref().unwrap_or("-"))]
    Upstream {
        status: String,
        message: Option<String>,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

// Request URLs carry the API key as a query pair; never keep them.
impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.without_url())
    }
}

impl PlacesError {
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[derive(Debug, Clone)]
pub struct PhotoData {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Everything the bot needs from a places provider.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn search_nearby(
        &self,
        query: &SearchQuery,
    ) -> Result<NearbySearchResponse, PlacesError>;

    async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<PlaceReview>, PlacesError>;

    async fn fetch_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
    ) -> Result<PhotoData, PlacesError>;
}

#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    config: PlacesConfig,
}

impl GooglePlacesClient {
    #[must_use]
    pub const fn with_shared_client(client: Client, config: PlacesConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> Result<&str, PlacesError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PlacesError::Config("GOOGLE_PLACES_API_KEY is missing".to_string()))
    }

    async fn send(&self, url: Url) -> Result<reqwest::Response, PlacesError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlacesError::Http { status, body });
        }

        Ok(response)
    }
}

/// `OK` and `ZERO_RESULTS` are successes; every other status is an error.
pub fn check_status(status: &str, message: Option<&str>) -> Result<(), PlacesError> {
    if status == PlacesStatus::OK || status == PlacesStatus::ZERO_RESULTS {
        return Ok(());
    }

    Err(PlacesError::Upstream {
        status: status.to_string(),
        message: message.map(ToString::to_string),
    })
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn search_nearby(
        &self,
        query: &SearchQuery,
    ) -> Result<NearbySearchResponse, PlacesError> {
        let key = self.api_key()?;

        let mut url = Url::parse(&self.config.nearby_url)?;
        url.query_pairs_mut()
            .append_pair(
                "location",
                &format!("{},{}", query.latitude, query.longitude),
            )
            .append_pair("radius", &query.radius_meters.to_string())
            .append_pair("keyword", &query.keyword)
            .append_pair("language", &self.config.language)
            .append_pair("key", key);

        debug!(
            radius = query.radius_meters,
            keyword = %query.keyword,
            "Calling Places nearby search"
        );

        let response: NearbySearchResponse = self.send(url).await?.json().await?;
        check_status(&response.status, response.error_message.as_deref())?;

        Ok(response)
    }

    async fn fetch_reviews(&self, place_id: &str) -> Result<Vec<PlaceReview>, PlacesError> {
        let key = self.api_key()?;

        let mut url = Url::parse(&self.config.details_url)?;
        url.query_pairs_mut()
            .append_pair("place_id", place_id)
            .append_pair("fields", "reviews")
            .append_pair("language", &self.config.language)
            .append_pair("key", key);

        debug!(place_id = %place_id, "Fetching place reviews");

        let response: PlaceDetailsResponse = self.send(url).await?.json().await?;
        check_status(&response.status, response.error_message.as_deref())?;

        Ok(response.result.map(|r| r.reviews).unwrap_or_default())
    }

    async fn fetch_photo(
        &self,
        photo_reference: &str,
        max_width: u32,
    ) -> Result<PhotoData, PlacesError> {
        let key = self.api_key()?;

        let mut url = Url::parse(&self.config.photo_url)?;
        url.query_pairs_mut()
            .append_pair("photo_reference", photo_reference)
            .append_pair("maxwidth", &max_width.to_string())
            .append_pair("key", key);

        let response = self.send(url).await?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        Ok(PhotoData {
            content_type,
            bytes,
        })
    }
}
