//! Runtime configuration loaded from the environment
//!
//! A `.env` file in the working directory is honoured before the process
//! environment is read.

use std::env;
use std::path::PathBuf;

/// Environment variable holding the NASA API key
pub const API_KEY_VAR: &str = "NASA_API_KEY";

/// Public APOD endpoint
pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
/// English Wikipedia REST summary endpoint
pub const DEFAULT_WIKIPEDIA_SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
/// English Wikipedia opensearch endpoint
pub const DEFAULT_WIKIPEDIA_SEARCH_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// NASA API key; `None` when unset or blank
    pub nasa_api_key: Option<String>,
    /// APOD endpoint
    pub apod_api_url: String,
    /// Wikipedia REST summary endpoint (title is appended as a path segment)
    pub wikipedia_summary_url: String,
    /// Wikipedia opensearch endpoint
    pub wikipedia_search_url: String,
    /// Overrides the XDG cache directory
    pub cache_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads configuration from `.env` and the process environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            nasa_api_key: non_blank(API_KEY_VAR).map(|v| v.trim().to_string()),
            apod_api_url: non_blank("APOD_API_URL").unwrap_or_else(|| DEFAULT_APOD_URL.to_string()),
            wikipedia_summary_url: non_blank("WIKIPEDIA_SUMMARY_URL")
                .unwrap_or_else(|| DEFAULT_WIKIPEDIA_SUMMARY_URL.to_string()),
            wikipedia_search_url: non_blank("WIKIPEDIA_SEARCH_URL")
                .unwrap_or_else(|| DEFAULT_WIKIPEDIA_SEARCH_URL.to_string()),
            cache_dir: non_blank("APODVIEW_CACHE_DIR").map(PathBuf::from),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
