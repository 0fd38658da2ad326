use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub latitude: f64,

    pub longitude: f64,

    pub keyword: String,

    pub radius_meters: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, keyword: impl Into<String>, radius_meters: u32) -> Self {
        Self {
            latitude,
            longitude,
            keyword: keyword.into(),
            radius_meters,
        }
    }
}

/// A display-ready shop, independent of the provider's raw schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopItem {
    pub name: String,

    pub vicinity: String,

    pub lat: f64,

    pub lng: f64,

    /// `None` when the provider did not report opening hours.
    pub open_now: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,

    pub distance_meters: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_summary: Option<String>,
}
