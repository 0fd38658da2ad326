//! Nearby shop search: cache first, widening the radius until something
//! usable turns up.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheLookup, PlacesCache};
use crate::clients::places::{PlacesError, PlacesProvider};
use crate::constants::search::RADIUS_TIERS_METERS;
use crate::models::place::NearbySearchResponse;
use crate::models::shop::{SearchQuery, ShopItem};
use crate::services::normalize::normalize;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<ShopItem>),

    /// Every tier answered and none had a usable shop.
    NotFound,

    /// Nothing usable, and at least one tier failed upstream with no cache to
    /// fall back on.
    Unavailable,
}

impl SearchOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not_found",
            Self::Unavailable => "unavailable",
        }
    }
}

/// How one radius tier got (or failed to get) its payload.
#[derive(Debug)]
enum TierPayload {
    Cached(Arc<NearbySearchResponse>),
    Fresh(Arc<NearbySearchResponse>),
    /// Upstream failed but another request had filled the cache meanwhile.
    Fallback(Arc<NearbySearchResponse>),
    Failed(PlacesError),
}

impl TierPayload {
    const fn source(&self) -> &'static str {
        match self {
            Self::Cached(_) => "cache",
            Self::Fresh(_) => "upstream",
            Self::Fallback(_) => "cache_fallback",
            Self::Failed(_) => "failed",
        }
    }

    fn into_payload(self) -> Result<Arc<NearbySearchResponse>, PlacesError> {
        match self {
            Self::Cached(p) | Self::Fresh(p) | Self::Fallback(p) => Ok(p),
            Self::Failed(e) => Err(e),
        }
    }
}

pub struct ShopSearchService {
    cache: Arc<PlacesCache>,
    places: Arc<dyn PlacesProvider>,
}

impl ShopSearchService {
    #[must_use]
    pub fn new(cache: Arc<PlacesCache>, places: Arc<dyn PlacesProvider>) -> Self {
        Self { cache, places }
    }

    /// Tries 1000 m, 2000 m, 3000 m in turn and returns the first non-empty
    /// tier as-is. Tiers are never merged.
    pub async fn find_nearby(
        &self,
        user_lat: f64,
        user_lng: f64,
        keyword: &str,
        item_limit: usize,
    ) -> SearchOutcome {
        let mut upstream_failed = false;

        for radius in RADIUS_TIERS_METERS {
            let query = SearchQuery::new(user_lat, user_lng, keyword, radius);
            let tier = self.fetch_tier(&query).await;
            let source = tier.source();

            let payload = match tier.into_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    upstream_failed = true;
                    warn!(radius, error = %e, "Tier skipped after upstream failure");
                    continue;
                }
            };

            let items = normalize(&payload, user_lat, user_lng, item_limit);
            if !items.is_empty() {
                info!(radius, source, count = items.len(), "Found nearby shops");
                return record(SearchOutcome::Found(items));
            }

            debug!(radius, source, "No usable shops in tier, widening");
        }

        if upstream_failed {
            record(SearchOutcome::Unavailable)
        } else {
            record(SearchOutcome::NotFound)
        }
    }

    /// One radius, with the same cache and fallback rules as a tier.
    pub async fn search_radius(
        &self,
        query: &SearchQuery,
        item_limit: usize,
    ) -> Result<Vec<ShopItem>, PlacesError> {
        let payload = self.fetch_tier(query).await.into_payload()?;
        Ok(normalize(
            &payload,
            query.latitude,
            query.longitude,
            item_limit,
        ))
    }

    async fn fetch_tier(&self, query: &SearchQuery) -> TierPayload {
        let stale = match self.cache.lookup(query).await {
            CacheLookup::Hit(payload) => {
                metrics::counter!("places_cache_hits_total").increment(1);
                return TierPayload::Cached(payload);
            }
            CacheLookup::Expired(payload) => Some(payload),
            CacheLookup::Miss => None,
        };
        metrics::counter!("places_cache_misses_total").increment(1);

        match self.places.search_nearby(query).await {
            Ok(response) => {
                let payload = Arc::new(response);
                self.cache.put(query, payload.clone()).await;
                TierPayload::Fresh(payload)
            }
            Err(e) => {
                metrics::counter!("places_upstream_errors_total").increment(1);
                if e.is_config() {
                    error!(error = %e, "Places search is not configured");
                }

                // Prefer an entry a concurrent request stored meanwhile over
                // the expired one this tier evicted.
                match self.cache.get(query).await.or(stale) {
                    Some(payload) => {
                        warn!(
                            radius = query.radius_meters,
                            error = %e,
                            "Places search failed, serving cached result"
                        );
                        TierPayload::Fallback(payload)
                    }
                    None => TierPayload::Failed(e),
                }
            }
        }
    }
}

fn record(outcome: SearchOutcome) -> SearchOutcome {
    metrics::counter!("shop_search_outcomes_total", "outcome" => outcome.label()).increment(1);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::places::PhotoData;
    use crate::models::place::{Geometry, LatLng, PlaceReview, RawPlace};
    use async_trait::async_trait;
    use chrono::{TimeDelta, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    const USER: (f64, f64) = (35.681, 139.767);

    /// Answers per radius; a missing radius is an upstream failure.
    #[derive(Default)]
    struct FakePlaces {
        by_radius: HashMap<u32, NearbySearchResponse>,
        calls: Mutex<Vec<u32>>,
        /// Simulates a concurrent request filling the cache while ours fails.
        fill_on_failure: Option<(Arc<PlacesCache>, NearbySearchResponse)>,
    }

    impl FakePlaces {
        fn with(mut self, radius: u32, response: NearbySearchResponse) -> Self {
            self.by_radius.insert(radius, response);
            self
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlacesProvider for FakePlaces {
        async fn search_nearby(
            &self,
            query: &SearchQuery,
        ) -> Result<NearbySearchResponse, PlacesError> {
            self.calls.lock().unwrap().push(query.radius_meters);

            if let Some(response) = self.by_radius.get(&query.radius_meters) {
                return Ok(response.clone());
            }

            if let Some((cache, response)) = &self.fill_on_failure {
                cache.put(query, Arc::new(response.clone())).await;
            }

            Err(PlacesError::Http {
                status: 503,
                body: "unavailable".to_string(),
            })
        }

        async fn fetch_reviews(&self, _place_id: &str) -> Result<Vec<PlaceReview>, PlacesError> {
            Ok(vec![])
        }

        async fn fetch_photo(&self, _: &str, _: u32) -> Result<PhotoData, PlacesError> {
            Err(PlacesError::Config("no photos in tests".to_string()))
        }
    }

    fn shop(name: &str, lat: f64, lng: f64) -> RawPlace {
        RawPlace {
            name: Some(name.to_string()),
            geometry: Some(Geometry {
                location: Some(LatLng {
                    lat: Some(lat),
                    lng: Some(lng),
                }),
            }),
            ..Default::default()
        }
    }

    fn no_location(name: &str) -> RawPlace {
        RawPlace {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn results(places: Vec<RawPlace>) -> NearbySearchResponse {
        NearbySearchResponse::from_results(places)
    }

    fn service(places: FakePlaces) -> (ShopSearchService, Arc<FakePlaces>, Arc<PlacesCache>) {
        let cache = Arc::new(PlacesCache::new());
        let places = Arc::new(places);
        (
            ShopSearchService::new(cache.clone(), places.clone()),
            places,
            cache,
        )
    }

    fn names(outcome: &SearchOutcome) -> Vec<&str> {
        match outcome {
            SearchOutcome::Found(items) => items.iter().map(|i| i.name.as_str()).collect(),
            other => panic!("expected shops, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_first_tier_hit_stops_widening() {
        let (svc, places, _) = service(
            FakePlaces::default()
                .with(1000, results(vec![shop("Near", 35.682, 139.768)]))
                .with(2000, results(vec![shop("Far", 35.69, 139.77)])),
        );

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Near"]);
        assert_eq!(places.calls(), [1000]);
    }

    #[tokio::test]
    async fn test_widens_to_second_tier_without_merging() {
        let (svc, places, _) = service(
            FakePlaces::default()
                .with(1000, results(vec![no_location("Broken")]))
                .with(2000, results(vec![shop("Mid", 35.69, 139.77)]))
                .with(3000, results(vec![shop("Far", 35.70, 139.78)])),
        );

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Mid"]);
        assert_eq!(places.calls(), [1000, 2000]);
    }

    #[tokio::test]
    async fn test_all_tiers_empty_is_not_found() {
        let (svc, places, _) = service(
            FakePlaces::default()
                .with(1000, results(vec![]))
                .with(2000, results(vec![]))
                .with(3000, results(vec![])),
        );

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(places.calls(), [1000, 2000, 3000]);
    }

    #[tokio::test]
    async fn test_all_tiers_failing_is_unavailable() {
        let (svc, _, _) = service(FakePlaces::default());

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(outcome, SearchOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_failure_then_empty_tiers_is_unavailable() {
        let (svc, _, _) = service(
            FakePlaces::default()
                .with(2000, results(vec![]))
                .with(3000, results(vec![])),
        );

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(outcome, SearchOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_failed_tier_is_skipped() {
        let (svc, places, _) = service(
            FakePlaces::default().with(2000, results(vec![shop("Mid", 35.69, 139.77)])),
        );

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Mid"]);
        assert_eq!(places.calls(), [1000, 2000]);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let (svc, places, cache) = service(FakePlaces::default());
        let query = SearchQuery::new(USER.0, USER.1, "ラーメン", 1000);
        cache
            .put(&query, Arc::new(results(vec![shop("Cached", 35.682, 139.768)])))
            .await;

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Cached"]);
        assert!(places.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_result_is_cached() {
        let (svc, places, cache) = service(
            FakePlaces::default().with(1000, results(vec![shop("Near", 35.682, 139.768)])),
        );

        svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;
        svc.find_nearby(35.6812, 139.7668, "ラーメン", 10).await;

        assert_eq!(places.calls(), [1000]);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_fill_used_on_upstream_failure() {
        let cache = Arc::new(PlacesCache::new());
        let places = Arc::new(FakePlaces {
            fill_on_failure: Some((
                cache.clone(),
                results(vec![shop("Fallback", 35.682, 139.768)]),
            )),
            ..Default::default()
        });
        let svc = ShopSearchService::new(cache, places.clone());

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Fallback"]);
        assert_eq!(places.calls(), [1000]);
    }

    #[tokio::test]
    async fn test_expired_entry_served_when_upstream_fails() {
        let (svc, places, cache) = service(FakePlaces::default());
        let query = SearchQuery::new(USER.0, USER.1, "ラーメン", 1000);
        cache
            .put_at(
                &query,
                Arc::new(results(vec![shop("Stale", 35.682, 139.768)])),
                Utc::now() - TimeDelta::seconds(200),
            )
            .await;

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Stale"]);
        assert_eq!(places.calls(), [1000]);
    }

    #[tokio::test]
    async fn test_expired_entry_replaced_when_upstream_answers() {
        let (svc, _places, cache) = service(
            FakePlaces::default().with(1000, results(vec![shop("Fresh", 35.682, 139.768)])),
        );
        let query = SearchQuery::new(USER.0, USER.1, "ラーメン", 1000);
        cache
            .put_at(
                &query,
                Arc::new(results(vec![shop("Stale", 35.682, 139.768)])),
                Utc::now() - TimeDelta::seconds(200),
            )
            .await;

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 10).await;

        assert_eq!(names(&outcome), ["Fresh"]);
        let cached = cache.get(&query).await.unwrap();
        assert_eq!(cached.results[0].name.as_deref(), Some("Fresh"));
    }

    #[tokio::test]
    async fn test_item_limit_caps_raw_entries() {
        let (svc, _, _) = service(FakePlaces::default().with(
            1000,
            results(vec![
                shop("A", 35.682, 139.768),
                no_location("B"),
                shop("C", 35.683, 139.769),
            ]),
        ));

        let outcome = svc.find_nearby(USER.0, USER.1, "ラーメン", 2).await;

        assert_eq!(names(&outcome), ["A"]);
    }

    #[tokio::test]
    async fn test_search_radius_propagates_failure() {
        let (svc, _, _) = service(FakePlaces::default());
        let query = SearchQuery::new(USER.0, USER.1, "ラーメン", 1500);

        assert!(svc.search_radius(&query, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_tokyo_station_scenario() {
        let (svc, _, _) = service(
            FakePlaces::default().with(1000, results(vec![shop("Ramen Street", 35.682, 139.768)])),
        );

        let outcome = svc.find_nearby(35.681, 139.767, "ramen", 10).await;

        let SearchOutcome::Found(items) = outcome else {
            panic!("expected shops");
        };
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].open_now, None);
        assert_eq!(items[0].rating, None);
        assert!((130..=170).contains(&items[0].distance_meters));
    }
}
