//! Flex carousel rendering for shop results.

use serde_json::{Value, json};

use crate::constants::limits::{DEFAULT_PHOTO_MAX_WIDTH, MAX_CAROUSEL_BUBBLES};
use crate::models::shop::ShopItem;

const ALT_TEXT: &str = "近くのラーメン店";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/600x338?text=No+Image";
const GENERIC_MAP_URL: &str = "https://www.google.com/maps";
const MUTED_COLOR: &str = "#6B7280";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStatus {
    Open,
    Closed,
    Unknown,
}

impl OpenStatus {
    #[must_use]
    pub const fn from_open_now(open_now: Option<bool>) -> Self {
        match open_now {
            Some(true) => Self::Open,
            Some(false) => Self::Closed,
            None => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "営業中",
            Self::Closed => "時間外",
            Self::Unknown => "不明",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Open => "#16A34A",
            Self::Closed | Self::Unknown => MUTED_COLOR,
        }
    }
}

/// Image URL LINE can fetch: our photo proxy when possible, otherwise a
/// placeholder.
#[must_use]
pub fn photo_url(photo_reference: Option<&str>, public_base_url: Option<&str>) -> String {
    match (photo_reference, public_base_url) {
        (Some(reference), Some(base)) => format!(
            "{base}/shops/photo?ref={}&maxwidth={DEFAULT_PHOTO_MAX_WIDTH}",
            urlencoding::encode(reference)
        ),
        (None, Some(base)) => format!("{base}/static/no-image.jpg"),
        (_, None) => PLACEHOLDER_IMAGE.to_string(),
    }
}

#[must_use]
pub fn map_url(place_id: Option<&str>, lat: Option<f64>, lng: Option<f64>) -> String {
    match (place_id, lat, lng) {
        (Some(id), lat, lng) => {
            let query = match (lat, lng) {
                (Some(lat), Some(lng)) => format!("{lat},{lng}"),
                _ => "ramen".to_string(),
            };
            format!(
                "https://www.google.com/maps/search/?api=1&query={}&query_place_id={}",
                urlencoding::encode(&query),
                urlencoding::encode(id)
            )
        }
        (None, Some(lat), Some(lng)) => {
            format!("https://www.google.com/maps/search/?api=1&query={lat},{lng}")
        }
        _ => GENERIC_MAP_URL.to_string(),
    }
}

fn summary_line(item: &ShopItem) -> String {
    format!("{}｜{}m", item.vicinity, item.distance_meters)
}

fn rating_line(item: &ShopItem) -> Option<String> {
    let rating = item.rating?;
    Some(match item.rating_count {
        Some(count) => format!("★{rating}（{count}）"),
        None => format!("★{rating}"),
    })
}

fn text(text: &str, size: &str, color: &str) -> Value {
    json!({
        "type": "text",
        "text": text,
        "size": size,
        "color": color,
        "wrap": true,
    })
}

#[must_use]
pub fn shop_bubble(item: &ShopItem, public_base_url: Option<&str>) -> Value {
    let status = OpenStatus::from_open_now(item.open_now);
    let name = if item.name.is_empty() { "-" } else { item.name.as_str() };

    let mut body = vec![
        json!({
            "type": "box",
            "layout": "horizontal",
            "contents": [{
                "type": "text",
                "text": status.label(),
                "size": "xxs",
                "weight": "bold",
                "color": "#FFFFFF",
                "align": "center",
                "gravity": "center",
                "flex": 0,
            }],
            "justifyContent": "center",
            "alignItems": "center",
            "backgroundColor": status.color(),
            "cornerRadius": "999px",
            "paddingAll": "4px",
            "paddingStart": "10px",
            "paddingEnd": "10px",
            "flex": 0,
            "maxWidth": "55px",
        }),
        json!({
            "type": "text",
            "text": name,
            "weight": "bold",
            "size": "lg",
            "wrap": true,
        }),
        text(&summary_line(item), "sm", MUTED_COLOR),
    ];

    if let Some(rating) = rating_line(item) {
        body.push(text(&rating, "sm", "#111827"));
    }

    if let Some(summary) = item.review_summary.as_deref().filter(|s| !s.is_empty()) {
        body.push(text(summary, "sm", "#374151"));
    }

    json!({
        "type": "bubble",
        "hero": {
            "type": "image",
            "url": photo_url(item.photo_reference.as_deref(), public_base_url),
            "size": "full",
            "aspectRatio": "16:9",
            "aspectMode": "cover",
        },
        "body": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": body,
        },
        "footer": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": [{
                "type": "button",
                "style": "secondary",
                "action": {
                    "type": "uri",
                    "label": "地図アプリを開く",
                    "uri": map_url(item.place_id.as_deref(), Some(item.lat), Some(item.lng)),
                },
            }],
        },
    })
}

/// Flex message with one bubble per shop, capped at the carousel limit.
#[must_use]
pub fn build_carousel(items: &[ShopItem], public_base_url: Option<&str>) -> Value {
    let bubbles: Vec<Value> = items
        .iter()
        .take(MAX_CAROUSEL_BUBBLES)
        .map(|item| shop_bubble(item, public_base_url))
        .collect();

    json!({
        "type": "flex",
        "altText": ALT_TEXT,
        "contents": {
            "type": "carousel",
            "contents": bubbles,
        },
    })
}
