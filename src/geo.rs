//! Flat-earth distance estimate for short, sub-city ranges.

const KM_PER_DEGREE: f64 = 111.0;

/// Approximate distance in meters between two coordinates.
///
/// Treats the area around the origin as a plane: a degree of latitude is
/// `111 km`, a degree of longitude is shrunk by `cos(lat1)`. Only the origin
/// latitude is used for the correction.
#[must_use]
pub fn estimate_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> u32 {
    let km_per_deg_lng = KM_PER_DEGREE * lat1.to_radians().cos();

    let dx = (lng2 - lng1) * km_per_deg_lng;
    let dy = (lat2 - lat1) * KM_PER_DEGREE;

    let meters = dx.hypot(dy) * 1000.0;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = meters.round().clamp(0.0, f64::from(u32::MAX)) as u32;
    rounded
}
