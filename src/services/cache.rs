// src/services/cache.rs
// DOCUMENTATION: In-memory cache for reverse-geocoding results
// PURPOSE: Avoid repeat geocoding calls while the user stands still

use crate::models::PlaceRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cache entry with expiration
#[derive(Clone, Debug)]
struct CacheEntry<T> {
    data: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Reverse-geocode cache with TTL
/// DOCUMENTATION: Thread-safe; keyed by coordinates rounded to ~10m
pub struct GeocodeCache {
    store: Arc<RwLock<HashMap<String, CacheEntry<Vec<PlaceRecord>>>>>,
    default_ttl: Duration,
}

impl GeocodeCache {
    /// Create new cache with default TTL
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Generate cache key from coordinates
    pub fn generate_key(lat: f64, lon: f64) -> String {
        format!(
            "revgeo:{}:{}",
            (lat * 10000.0).round() as i64, // Round to ~10m precision
            (lon * 10000.0).round() as i64,
        )
    }

    /// Get cached places
    pub async fn get(&self, key: &str) -> Option<Vec<PlaceRecord>> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.data.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    /// Set cached places with default TTL
    pub async fn set(&self, key: String, places: Vec<PlaceRecord>) {
        self.set_with_ttl(key, places, self.default_ttl).await;
    }

    /// Set cached places with custom TTL
    pub async fn set_with_ttl(&self, key: String, places: Vec<PlaceRecord>, ttl: Duration) {
        let mut store = self.store.write().await;
        log::debug!("Cache SET for key: {} (TTL: {}s)", key, ttl.as_secs());
        store.insert(key, CacheEntry::new(places, ttl));
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before_count = store.len();
        store.retain(|_, entry| !entry.is_expired());
        let after_count = store.len();

        if before_count > after_count {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before_count - after_count,
                after_count
            );
        }
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<GeocodeCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places() -> Vec<PlaceRecord> {
        vec![PlaceRecord {
            name: Some("Tesco Express".to_string()),
            ..Default::default()
        }]
    }

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = GeocodeCache::new(60);
        let key = GeocodeCache::generate_key(51.5, -0.1);

        cache.set(key.clone(), places()).await;
        assert_eq!(cache.get(&key).await, Some(places()));
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = GeocodeCache::new(60);
        let key = "short".to_string();

        cache
            .set_with_ttl(key.clone(), places(), Duration::from_millis(50))
            .await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn test_generate_key() {
        let key1 = GeocodeCache::generate_key(51.50741, -0.12782);
        let key2 = GeocodeCache::generate_key(51.50739, -0.12778);
        let key3 = GeocodeCache::generate_key(51.5080, -0.1278);

        assert_eq!(key1, key2); // Within ~10m collapses to one key
        assert_ne!(key1, key3);
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = GeocodeCache::new(60);

        cache
            .set_with_ttl("a".to_string(), places(), Duration::from_millis(10))
            .await;
        cache.set("b".to_string(), places()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        cache.cleanup().await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.active_entries, 1);
    }
}
