pub mod cache {
    pub const PLACES_TTL_SECS: i64 = 180;
}

pub mod search {
    /// Radii tried in order until one yields at least one usable shop.
    pub const RADIUS_TIERS_METERS: [u32; 3] = [1000, 2000, 3000];

    pub const DEFAULT_RADIUS_METERS: u32 = 1000;

    pub const MAX_RADIUS_METERS: u32 = 50_000;
}

pub mod limits {
    pub const MAX_CAROUSEL_BUBBLES: usize = 10;

    pub const MAX_SEARCH_RESULTS: usize = 10;

    pub const DEFAULT_PHOTO_MAX_WIDTH: u32 = 600;

    pub const MAX_PHOTO_MAX_WIDTH: u32 = 1600;
}
