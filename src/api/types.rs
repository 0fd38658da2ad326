use serde::{Deserialize, Serialize};

use crate::models::shop::ShopItem;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShopSearchParams {
    pub lat: f64,
    pub lng: f64,
    pub q: String,
    pub radius: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShopSearchResults {
    pub items: Vec<ShopItem>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct PhotoParams {
    #[serde(rename = "ref")]
    pub reference: String,
    pub maxwidth: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub cached_searches: usize,
    pub uptime_seconds: u64,
}
