use crate::geo::estimate_distance;
use crate::models::place::{NearbySearchResponse, RawPlace};
use crate::models::shop::ShopItem;

/// Maps the first `limit` raw results to shops, in provider order.
///
/// The cap applies to raw entries: results without coordinates are dropped
/// afterwards, so fewer than `limit` shops may come back.
#[must_use]
pub fn normalize(
    payload: &NearbySearchResponse,
    user_lat: f64,
    user_lng: f64,
    limit: usize,
) -> Vec<ShopItem> {
    payload
        .results
        .iter()
        .take(limit)
        .filter_map(|raw| to_shop_item(raw, user_lat, user_lng))
        .collect()
}

fn to_shop_item(raw: &RawPlace, user_lat: f64, user_lng: f64) -> Option<ShopItem> {
    let (lat, lng) = raw.coordinates()?;

    Some(ShopItem {
        name: raw.name.clone().unwrap_or_default(),
        vicinity: raw.vicinity.clone().unwrap_or_default(),
        lat,
        lng,
        open_now: raw.open_now(),
        rating: raw.rating,
        rating_count: raw.user_ratings_total,
        photo_reference: raw.first_photo_reference().map(ToString::to_string),
        place_id: raw.place_id.clone(),
        distance_meters: estimate_distance(user_lat, user_lng, lat, lng),
        review_summary: None,
    })
}
