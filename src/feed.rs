//! Cache policy for the default feed
//!
//! The startup feed is served from the cache while the cached record is
//! younger than the TTL, and fetched from the network otherwise. A failed
//! fetch is reported as-is: an expired record is never served as a fallback.
//!
//! `FeedService` is the only writer of the cache. If two services race on the
//! same storage, the last save wins.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::{CacheRecord, CacheStore};
use crate::data::{filter_images, FeedEntry};
use crate::error::FeedError;
use crate::range::DateRange;

/// Time-to-live of the cached default feed in hours
pub const CACHE_TTL_HOURS: i64 = 48;

/// Remote source of APOD entries
///
/// Every operation returns image entries only, in the order the source
/// produced them.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Entries for the fixed startup range
    async fn fetch_default_range(&self) -> Result<Vec<FeedEntry>, FeedError>;

    /// `count` entries picked by the remote service
    async fn fetch_random(&self, count: u32) -> Result<Vec<FeedEntry>, FeedError>;

    /// Entries between two dates, inclusive
    async fn fetch_range(&self, range: DateRange) -> Result<Vec<FeedEntry>, FeedError>;
}

/// Serves the default feed from cache or network
pub struct FeedService {
    source: Arc<dyn FeedSource>,
    cache: CacheStore,
    ttl: Duration,
}

impl FeedService {
    pub fn new(source: Arc<dyn FeedSource>, cache: CacheStore) -> Self {
        Self {
            source,
            cache,
            ttl: Duration::hours(CACHE_TTL_HOURS),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the default feed, using the cache while it is fresh
    pub async fn default_feed(&self) -> Result<Vec<FeedEntry>, FeedError> {
        self.default_feed_at(Utc::now()).await
    }

    /// Same as `default_feed` with an explicit notion of "now"
    pub async fn default_feed_at(&self, now: DateTime<Utc>) -> Result<Vec<FeedEntry>, FeedError> {
        let now_ms = now.timestamp_millis();

        if let Some(record) = self.cache.load() {
            let age_ms = now_ms - record.timestamp;
            if age_ms < self.ttl.num_milliseconds() {
                info!(
                    entries = record.payload.len(),
                    age_minutes = age_ms / 60_000,
                    "serving default feed from cache"
                );
                return Ok(record.payload);
            }
            debug!(age_minutes = age_ms / 60_000, "cached default feed is stale");
        }

        info!("fetching default feed from the network");
        let entries = filter_images(self.source.fetch_default_range().await?);

        let record = CacheRecord {
            timestamp: now_ms,
            payload: entries.clone(),
        };
        if let Err(e) = self.cache.save(&record) {
            warn!(error = %e, "failed to write default feed cache");
        }

        Ok(entries)
    }
}
