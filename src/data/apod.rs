//! NASA APOD API client
//!
//! Builds the three request shapes the viewer needs (fixed default range,
//! random batch, explicit date range) and normalizes responses into image-only
//! `FeedEntry` lists.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{FeedEntry, MediaType};
use crate::error::{ConfigError, FeedError, NetworkError};
use crate::feed::FeedSource;
use crate::range::{DateRange, DATE_FORMAT};

/// First day of the fixed default range
pub const DEFAULT_RANGE_START: NaiveDate = match NaiveDate::from_ymd_opt(2025, 8, 1) {
    Some(date) => date,
    None => panic!("invalid default range start"),
};

/// Last day of the fixed default range
pub const DEFAULT_RANGE_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 8, 3) {
    Some(date) => date,
    None => panic!("invalid default range end"),
};

/// Batch size for random reloads
pub const DEFAULT_RANDOM_COUNT: u32 = 5;

/// The fixed range loaded on startup
pub fn default_range() -> DateRange {
    DateRange::new(DEFAULT_RANGE_START, DEFAULT_RANGE_END)
        .expect("default range constants are ordered")
}

/// Shape of a feed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedRequest {
    /// The hardcoded startup range
    DefaultRange,
    /// `count` entries chosen by the server
    Random(u32),
    /// Inclusive date range
    Range(DateRange),
}

impl FeedRequest {
    /// Query parameters for this request, excluding the API key
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            FeedRequest::DefaultRange => range_params(&default_range()),
            FeedRequest::Random(count) => vec![("count", count.to_string())],
            FeedRequest::Range(range) => range_params(range),
        }
    }
}

impl std::fmt::Display for FeedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedRequest::DefaultRange => write!(f, "default range {}", default_range()),
            FeedRequest::Random(count) => write!(f, "random batch of {}", count),
            FeedRequest::Range(range) => write!(f, "range {}", range),
        }
    }
}

fn range_params(range: &DateRange) -> Vec<(&'static str, String)> {
    vec![
        ("start_date", range.start().format(DATE_FORMAT).to_string()),
        ("end_date", range.end().format(DATE_FORMAT).to_string()),
    ]
}

/// A record as returned by the API, before filtering
#[derive(Debug, Deserialize)]
struct ApodRecord {
    date: NaiveDate,
    #[serde(default)]
    title: String,
    #[serde(default)]
    explanation: String,
    url: Option<String>,
    hdurl: Option<String>,
    media_type: Option<MediaType>,
    copyright: Option<String>,
}

impl ApodRecord {
    /// Converts image records; everything else is dropped
    fn into_image_entry(self) -> Option<FeedEntry> {
        if self.media_type != Some(MediaType::Image) {
            return None;
        }
        let media_url = self.url?;
        Some(FeedEntry {
            date: self.date,
            title: self.title,
            explanation: self.explanation,
            media_url,
            hd_url: self.hdurl,
            media_type: MediaType::Image,
            copyright: self.copyright.map(|c| c.trim().to_string()),
        })
    }
}

/// Parses an APOD array response, keeping image entries in order
pub fn parse_feed(body: &str) -> Result<Vec<FeedEntry>, NetworkError> {
    let records: Vec<ApodRecord> = serde_json::from_str(body)?;
    let total = records.len();
    let entries: Vec<FeedEntry> = records
        .into_iter()
        .filter_map(ApodRecord::into_image_entry)
        .collect();

    if entries.len() < total {
        debug!(
            dropped = total - entries.len(),
            kept = entries.len(),
            "dropped non-image APOD entries"
        );
    }

    Ok(entries)
}

/// Any non-2xx answer is a `NetworkError::Status`
fn ensure_success(status: StatusCode) -> Result<(), NetworkError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(NetworkError::Status(status.as_u16()))
    }
}

/// Client for the NASA APOD API
#[derive(Debug, Clone)]
pub struct ApodClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl ApodClient {
    /// Creates a client against `base_url`, normally `config::DEFAULT_APOD_URL`
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            http_client: Client::new(),
            api_key,
            base_url,
        }
    }

    fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Builds the HTTP request for `request` without sending it
    ///
    /// Fails with `ConfigError::MissingApiKey` before anything touches the network.
    pub fn build_request(&self, request: &FeedRequest) -> Result<reqwest::Request, FeedError> {
        let api_key = self.api_key()?;
        let built = self
            .http_client
            .get(&self.base_url)
            .query(&request.query_params())
            .query(&[("api_key", api_key)])
            .build()?;
        Ok(built)
    }

    /// Sends a feed request and returns image entries only
    pub async fn fetch(&self, request: FeedRequest) -> Result<Vec<FeedEntry>, FeedError> {
        let http_request = self.build_request(&request)?;
        debug!(%request, "requesting APOD feed");

        let response = self
            .http_client
            .execute(http_request)
            .await
            .map_err(NetworkError::Transport)?;

        if let Err(e) = ensure_success(response.status()) {
            warn!(%request, error = %e, "APOD request failed");
            return Err(e.into());
        }

        let body = response.text().await.map_err(NetworkError::Transport)?;
        let entries = parse_feed(&body)?;
        debug!(%request, count = entries.len(), "APOD feed received");
        Ok(entries)
    }
}

#[async_trait]
impl FeedSource for ApodClient {
    async fn fetch_default_range(&self) -> Result<Vec<FeedEntry>, FeedError> {
        self.fetch(FeedRequest::DefaultRange).await
    }

    async fn fetch_random(&self, count: u32) -> Result<Vec<FeedEntry>, FeedError> {
        self.fetch(FeedRequest::Random(count)).await
    }

    async fn fetch_range(&self, range: DateRange) -> Result<Vec<FeedEntry>, FeedError> {
        self.fetch(FeedRequest::Range(range)).await
    }
}
