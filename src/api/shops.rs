//! Shop search endpoints backed by the Places cache.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::validation::{
    validate_coordinates, validate_photo_reference, validate_photo_width, validate_radius,
    validate_search_query,
};
use super::{ApiError, ApiResponse, AppState, PhotoParams, ShopSearchParams, ShopSearchResults};
use crate::constants::limits::MAX_SEARCH_RESULTS;
use crate::models::shop::SearchQuery;
use crate::services::ranking::sort_recommended;

/// `GET /shops/search?lat=..&lng=..&q=..&radius=..&sort=recommended`
pub async fn search_shops(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShopSearchParams>,
) -> Result<Json<ApiResponse<ShopSearchResults>>, ApiError> {
    let (lat, lng) = validate_coordinates(params.lat, params.lng)?;
    let keyword = validate_search_query(&params.q)?;
    let radius = validate_radius(params.radius)?;

    let query = SearchQuery::new(lat, lng, keyword, radius);
    let mut items = state
        .search_service()
        .search_radius(&query, MAX_SEARCH_RESULTS)
        .await?;

    if params.sort.as_deref() == Some("recommended") {
        sort_recommended(&mut items);
    }

    let count = items.len();
    Ok(Json(ApiResponse::success(ShopSearchResults { items, count })))
}

/// `GET /shops/photo?ref=..&maxwidth=..`
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PhotoParams>,
) -> Result<Response, ApiError> {
    let reference = validate_photo_reference(&params.reference)?;
    let max_width = validate_photo_width(params.maxwidth)?;

    let photo = state.places().fetch_photo(reference, max_width).await?;

    Ok((
        [
            (header::CONTENT_TYPE, photo.content_type),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        photo.bytes,
    )
        .into_response())
}
