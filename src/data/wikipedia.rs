//! Wikipedia API client
//!
//! Uses the REST summary endpoint for direct lookups and the MediaWiki
//! opensearch action for the free-text fallback.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::EnrichmentResult;
use crate::enrich::Encyclopedia;
use crate::error::NetworkError;

/// Wikipedia asks API clients to identify themselves
const USER_AGENT: &str = concat!("apodview/", env!("CARGO_PKG_VERSION"));

/// Response from the page summary endpoint
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    extract: String,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<PageUrls>,
}

#[derive(Debug, Deserialize)]
struct PageUrls {
    page: Option<String>,
}

/// Parses a summary body; an empty extract counts as no summary
fn parse_summary(body: &str, requested_title: &str) -> Result<Option<EnrichmentResult>, NetworkError> {
    let response: SummaryResponse = serde_json::from_str(body)?;
    if response.extract.trim().is_empty() {
        return Ok(None);
    }

    let title = if response.title.is_empty() {
        requested_title.to_string()
    } else {
        response.title
    };
    let article_url = response
        .content_urls
        .and_then(|urls| urls.desktop)
        .and_then(|desktop| desktop.page);

    Ok(Some(EnrichmentResult {
        title,
        extract: response.extract,
        article_url,
    }))
}

/// Parses an opensearch body: `[query, [titles...], [descriptions...], [urls...]]`
fn parse_search(body: &str) -> Result<Vec<String>, NetworkError> {
    let value: Value = serde_json::from_str(body)?;
    let titles = value
        .get(1)
        .and_then(Value::as_array)
        .map(|hits| {
            hits.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(titles)
}

/// A missing or failing summary page is "no summary", never an error
fn summary_from_response(
    status: StatusCode,
    body: &str,
    requested_title: &str,
) -> Result<Option<EnrichmentResult>, NetworkError> {
    if !status.is_success() {
        debug!(title = requested_title, status = status.as_u16(), "no summary for title");
        return Ok(None);
    }
    parse_summary(body, requested_title)
}

fn search_from_response(status: StatusCode, body: &str) -> Result<Vec<String>, NetworkError> {
    if !status.is_success() {
        return Err(NetworkError::Status(status.as_u16()));
    }
    parse_search(body)
}

/// Client for the Wikipedia summary and search APIs
#[derive(Debug, Clone)]
pub struct WikipediaClient {
    http_client: Client,
    summary_base_url: String,
    search_url: String,
}

impl WikipediaClient {
    /// Creates a client against the given summary and search endpoints
    pub fn with_base_urls(summary_base_url: String, search_url: String) -> Self {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            summary_base_url,
            search_url,
        }
    }

    /// Summary URL for a title, with the title percent-encoded as one path segment
    fn summary_url(&self, title: &str) -> Result<Url, NetworkError> {
        let mut url = Url::parse(&self.summary_base_url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", self.summary_base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| NetworkError::InvalidUrl(self.summary_base_url.clone()))?
            .pop_if_empty()
            .push(title);
        Ok(url)
    }

    fn search_request(&self, query: &str) -> reqwest::RequestBuilder {
        self.http_client.get(&self.search_url).query(&[
            ("action", "opensearch"),
            ("search", query),
            ("limit", "1"),
            ("namespace", "0"),
            ("format", "json"),
        ])
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<Option<EnrichmentResult>, NetworkError> {
        let url = self.summary_url(title)?;
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        summary_from_response(status, &body, title)
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, NetworkError> {
        let response = self.search_request(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        search_from_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_WIKIPEDIA_SEARCH_URL, DEFAULT_WIKIPEDIA_SUMMARY_URL};
    use crate::data::serve_canned;

    fn english_client() -> WikipediaClient {
        WikipediaClient::with_base_urls(
            DEFAULT_WIKIPEDIA_SUMMARY_URL.to_string(),
            DEFAULT_WIKIPEDIA_SEARCH_URL.to_string(),
        )
    }

    fn client_for(base_url: &str) -> WikipediaClient {
        WikipediaClient::with_base_urls(
            format!("{}/summary", base_url),
            format!("{}/search", base_url),
        )
    }

    const SUMMARY_BODY: &str = r#"{
        "type": "standard",
        "title": "Andromeda Galaxy",
        "extract": "The Andromeda Galaxy is a barred spiral galaxy.",
        "content_urls": {
            "desktop": {"page": "https://en.wikipedia.org/wiki/Andromeda_Galaxy"},
            "mobile": {"page": "https://en.m.wikipedia.org/wiki/Andromeda_Galaxy"}
        }
    }"#;

    #[test]
    fn test_parse_summary() {
        let result = parse_summary(SUMMARY_BODY, "Andromeda Galaxy").unwrap().unwrap();

        assert_eq!(result.title, "Andromeda Galaxy");
        assert!(result.extract.starts_with("The Andromeda Galaxy"));
        assert_eq!(
            result.article_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Andromeda_Galaxy")
        );
    }

    #[test]
    fn test_parse_summary_without_links() {
        let body = r#"{"title": "M31", "extract": "Messier 31."}"#;
        let result = parse_summary(body, "M31").unwrap().unwrap();
        assert!(result.article_url.is_none());
    }

    #[test]
    fn test_parse_summary_blank_extract_is_none() {
        let body = r#"{"title": "Empty", "extract": "  "}"#;
        assert!(parse_summary(body, "Empty").unwrap().is_none());
    }

    #[test]
    fn test_parse_summary_falls_back_to_requested_title() {
        let body = r#"{"extract": "Something."}"#;
        let result = parse_summary(body, "Requested").unwrap().unwrap();
        assert_eq!(result.title, "Requested");
    }

    #[test]
    fn test_parse_search_hits() {
        let body = r#"["andromeda", ["Andromeda Galaxy"], [""], ["https://en.wikipedia.org/wiki/Andromeda_Galaxy"]]"#;
        assert_eq!(parse_search(body).unwrap(), vec!["Andromeda Galaxy"]);
    }

    #[test]
    fn test_parse_search_no_hits() {
        let body = r#"["zzzz", [], [], []]"#;
        assert!(parse_search(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_rejects_garbage() {
        assert!(matches!(parse_search("<html>"), Err(NetworkError::Decode(_))));
    }

    #[test]
    fn test_summary_url_encodes_title() {
        let client = english_client();
        let url = client.summary_url("Comet C/2023 A3 (Tsuchinshan–ATLAS)").unwrap();

        assert!(url
            .as_str()
            .starts_with("https://en.wikipedia.org/api/rest_v1/page/summary/Comet%20C%2F2023"));
        assert_eq!(url.path_segments().unwrap().count(), 5);
    }

    #[test]
    fn test_summary_url_handles_trailing_slash() {
        let client = WikipediaClient::with_base_urls(
            "http://localhost:9000/summary/".to_string(),
            "http://localhost:9000/search".to_string(),
        );
        let url = client.summary_url("M31").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/summary/M31");
    }

    #[test]
    fn test_search_request_parameters() {
        let client = english_client();
        let request = client.search_request("Great Galaxy").build().unwrap();
        let query: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(query.contains(&("action".to_string(), "opensearch".to_string())));
        assert!(query.contains(&("search".to_string(), "Great Galaxy".to_string())));
        assert!(query.contains(&("limit".to_string(), "1".to_string())));
        assert!(query.contains(&("format".to_string(), "json".to_string())));
    }

    #[test]
    fn test_summary_non_success_is_no_summary() {
        let result = summary_from_response(StatusCode::NOT_FOUND, "{}", "Nowhere").unwrap();
        assert!(result.is_none());
        let result =
            summary_from_response(StatusCode::SERVICE_UNAVAILABLE, "", "Nowhere").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_summary_success_is_parsed() {
        let result = summary_from_response(StatusCode::OK, SUMMARY_BODY, "Andromeda Galaxy")
            .unwrap()
            .unwrap();
        assert_eq!(result.title, "Andromeda Galaxy");
    }

    #[test]
    fn test_search_non_success_is_status_error() {
        assert!(matches!(
            search_from_response(StatusCode::INTERNAL_SERVER_ERROR, ""),
            Err(NetworkError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_summary_404_from_server_is_none() {
        let base_url = serve_canned("404 Not Found", r#"{"title": "Not found."}"#).await;
        let client = client_for(&base_url);

        assert!(client.summary("No Such Page").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_200_from_server_is_parsed() {
        let base_url = serve_canned("200 OK", SUMMARY_BODY).await;
        let client = client_for(&base_url);

        let result = client.summary("Andromeda Galaxy").await.unwrap().unwrap();
        assert!(result.extract.starts_with("The Andromeda Galaxy"));
    }

    #[tokio::test]
    async fn test_search_500_from_server_is_error() {
        let base_url = serve_canned("500 Internal Server Error", "").await;
        let client = client_for(&base_url);

        assert!(matches!(
            client.search("andromeda").await,
            Err(NetworkError::Status(500))
        ));
    }
}
