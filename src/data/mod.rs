//! Core data models for the APOD viewer
//!
//! This module contains the feed entry type shared by the cache, the remote
//! clients and the UI, plus the enrichment result shown in the detail view.

pub mod apod;
pub mod wikipedia;

pub use apod::{ApodClient, FeedRequest};
pub use wikipedia::WikipediaClient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Media type of an APOD entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    /// Anything else the API may send (interactive pages, etc.)
    #[serde(other)]
    Other,
}

/// One Astronomy Picture of the Day record
///
/// Serialized with the API's own field names so a cached record looks like
/// the response it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Publication date, unique within a result set
    pub date: NaiveDate,
    /// Title of the picture
    pub title: String,
    /// Explanation written by the APOD editors
    pub explanation: String,
    /// Standard resolution image URL
    #[serde(rename = "url")]
    pub media_url: String,
    /// High definition image URL, if published
    #[serde(rename = "hdurl", default, skip_serializing_if = "Option::is_none")]
    pub hd_url: Option<String>,
    /// Media type discriminator
    pub media_type: MediaType,
    /// Image credit, when not public domain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl FeedEntry {
    /// Returns true for image entries
    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }

    /// Best available image location, preferring the high definition one
    pub fn best_url(&self) -> &str {
        self.hd_url.as_deref().unwrap_or(&self.media_url)
    }
}

/// Keeps only image entries, preserving their relative order
///
/// Video and other media types are dropped, never substituted.
pub fn filter_images(entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
    entries.into_iter().filter(FeedEntry::is_image).collect()
}

/// Encyclopedia summary for the title being viewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentResult {
    /// Article title the summary belongs to
    pub title: String,
    /// Plain text summary
    pub extract: String,
    /// Link to the full article
    pub article_url: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample_entry(date: &str, title: &str, media_type: MediaType) -> FeedEntry {
    FeedEntry {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        title: title.to_string(),
        explanation: format!("Explanation for {}", title),
        media_url: format!("https://apod.nasa.gov/apod/image/{}.jpg", date),
        hd_url: None,
        media_type,
        copyright: None,
    }
}

/// Serves one canned HTTP response to every connection on a loopback port
///
/// Returns the `http://127.0.0.1:<port>` base URL.
#[cfg(test)]
pub(crate) async fn serve_canned(status_line: &'static str, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            // Requests are bodiless GETs; read up to the end of the headers
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        request.extend_from_slice(&chunk[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}", addr)
}
