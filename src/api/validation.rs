use super::ApiError;
use crate::constants::limits::{DEFAULT_PHOTO_MAX_WIDTH, MAX_PHOTO_MAX_WIDTH};
use crate::constants::search::{DEFAULT_RADIUS_METERS, MAX_RADIUS_METERS};

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(f64, f64), ApiError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ApiError::validation(format!(
            "Invalid latitude: {lat}. Must be between -90 and 90"
        )));
    }

    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(ApiError::validation(format!(
            "Invalid longitude: {lng}. Must be between -180 and 180"
        )));
    }

    Ok((lat, lng))
}

pub fn validate_radius(radius: Option<u32>) -> Result<u32, ApiError> {
    let radius = radius.unwrap_or(DEFAULT_RADIUS_METERS);

    if !(1..=MAX_RADIUS_METERS).contains(&radius) {
        return Err(ApiError::validation(format!(
            "Invalid radius: {radius}. Radius must be between 1 and {MAX_RADIUS_METERS}"
        )));
    }
    Ok(radius)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }

    if trimmed.chars().count() > 100 {
        return Err(ApiError::validation(
            "Search query must be 100 characters or less",
        ));
    }

    Ok(trimmed)
}

pub fn validate_photo_width(width: Option<u32>) -> Result<u32, ApiError> {
    let width = width.unwrap_or(DEFAULT_PHOTO_MAX_WIDTH);

    if !(1..=MAX_PHOTO_MAX_WIDTH).contains(&width) {
        return Err(ApiError::validation(format!(
            "Invalid maxwidth: {width}. Must be between 1 and {MAX_PHOTO_MAX_WIDTH}"
        )));
    }
    Ok(width)
}

pub fn validate_photo_reference(reference: &str) -> Result<&str, ApiError> {
    if reference.is_empty() {
        return Err(ApiError::validation("Photo reference cannot be empty"));
    }
    Ok(reference)
}
