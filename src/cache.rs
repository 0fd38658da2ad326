//! Short-lived, location-bucketed cache of nearby-search payloads.
//!
//! Keys round coordinates to three decimals (~100 m) so that users standing
//! next to each other share an entry. Expired entries are dropped lazily when
//! they are read; there is no background sweeper and no capacity bound, so
//! the key space grows with the number of distinct buckets seen within a TTL
//! window.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::constants::cache::PLACES_TTL_SECS;
use crate::models::place::NearbySearchResponse;
use crate::models::shop::SearchQuery;

const BUCKETS_PER_DEGREE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lat_bucket: i64,
    lng_bucket: i64,
    keyword: String,
    radius_meters: u32,
}

impl CacheKey {
    #[must_use]
    pub fn from_query(query: &SearchQuery) -> Self {
        Self {
            lat_bucket: bucket(query.latitude),
            lng_bucket: bucket(query.longitude),
            keyword: query.keyword.clone(),
            radius_meters: query.radius_meters,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn bucket(degrees: f64) -> i64 {
    (degrees * BUCKETS_PER_DEGREE).round() as i64
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        #[allow(clippy::cast_precision_loss)]
        let (lat, lng) = (
            self.lat_bucket as f64 / BUCKETS_PER_DEGREE,
            self.lng_bucket as f64 / BUCKETS_PER_DEGREE,
        );
        write!(f, "{lat:.3}:{lng:.3}:{}:{}", self.keyword, self.radius_meters)
    }
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Arc<NearbySearchResponse>),
    /// Past its TTL; already evicted.
    Expired(Arc<NearbySearchResponse>),
    Miss,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    inserted_at: DateTime<Utc>,
    payload: Arc<NearbySearchResponse>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        now - self.inserted_at > ttl
    }
}

pub struct PlacesCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: TimeDelta,
}

impl Default for PlacesCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacesCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: TimeDelta::seconds(PLACES_TTL_SECS),
        }
    }

    pub async fn get(&self, query: &SearchQuery) -> Option<Arc<NearbySearchResponse>> {
        self.get_at(query, Utc::now()).await
    }

    pub async fn put(&self, query: &SearchQuery, payload: Arc<NearbySearchResponse>) {
        self.put_at(query, payload, Utc::now()).await;
    }

    /// Lookup as of `now`; an entry older than the TTL is evicted and missed.
    pub async fn get_at(
        &self,
        query: &SearchQuery,
        now: DateTime<Utc>,
    ) -> Option<Arc<NearbySearchResponse>> {
        match self.lookup_at(query, now).await {
            CacheLookup::Hit(payload) => Some(payload),
            CacheLookup::Expired(_) | CacheLookup::Miss => None,
        }
    }

    pub async fn lookup(&self, query: &SearchQuery) -> CacheLookup {
        self.lookup_at(query, Utc::now()).await
    }

    /// Like [`Self::get_at`], but an evicted entry is handed back as
    /// [`CacheLookup::Expired`] so the caller can still fall back on it.
    pub async fn lookup_at(&self, query: &SearchQuery, now: DateTime<Utc>) -> CacheLookup {
        let key = CacheKey::from_query(query);

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => {
                    debug!(key = %key, "Places cache miss");
                    return CacheLookup::Miss;
                }
                Some(entry) if !entry.is_expired(now, self.ttl) => {
                    debug!(key = %key, "Places cache hit");
                    return CacheLookup::Hit(entry.payload.clone());
                }
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // A writer may have refreshed the entry between the two locks.
        if let Some(entry) = entries.get(&key)
            && !entry.is_expired(now, self.ttl)
        {
            return CacheLookup::Hit(entry.payload.clone());
        }

        debug!(key = %key, "Places cache entry expired");
        entries
            .remove(&key)
            .map_or(CacheLookup::Miss, |entry| CacheLookup::Expired(entry.payload))
    }

    pub async fn put_at(
        &self,
        query: &SearchQuery,
        payload: Arc<NearbySearchResponse>,
        now: DateTime<Utc>,
    ) {
        let key = CacheKey::from_query(query);
        debug!(key = %key, results = payload.results.len(), "Caching places payload");

        self.entries.write().await.insert(
            key,
            CacheEntry {
                inserted_at: now,
                payload,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
