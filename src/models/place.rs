//! Wire types for the Google Places web service.
//!
//! Every field is optional: the provider omits keys freely and a missing key
//! must never fail the whole payload.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub results: Vec<RawPlace>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl NearbySearchResponse {
    #[must_use]
    pub fn from_results(results: Vec<RawPlace>) -> Self {
        let status = if results.is_empty() {
            PlacesStatus::ZERO_RESULTS
        } else {
            PlacesStatus::OK
        };

        Self {
            status: status.to_string(),
            results,
            error_message: None,
        }
    }
}

/// Status strings the Places API puts in the response body.
pub struct PlacesStatus;

impl PlacesStatus {
    pub const OK: &'static str = "OK";
    pub const ZERO_RESULTS: &'static str = "ZERO_RESULTS";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawPlace {
    pub name: Option<String>,

    pub vicinity: Option<String>,

    pub geometry: Option<Geometry>,

    pub opening_hours: Option<OpeningHours>,

    pub rating: Option<f64>,

    pub user_ratings_total: Option<u32>,

    #[serde(default)]
    pub photos: Vec<PlacePhoto>,

    pub place_id: Option<String>,
}

impl RawPlace {
    /// Both coordinates, or nothing.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let location = self.geometry.as_ref()?.location.as_ref()?;
        Some((location.lat?, location.lng?))
    }

    #[must_use]
    pub fn open_now(&self) -> Option<bool> {
        self.opening_hours.as_ref().and_then(|h| h.open_now)
    }

    #[must_use]
    pub fn first_photo_reference(&self) -> Option<&str> {
        self.photos
            .first()
            .and_then(|p| p.photo_reference.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: Option<f64>,

    pub lng: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacePhoto {
    pub photo_reference: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetailsResponse {
    #[serde(default)]
    pub status: String,

    pub result: Option<PlaceDetails>,

    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlaceReview {
    pub rating: Option<f64>,

    pub text: Option<String>,
}
