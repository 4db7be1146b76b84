//! Encyclopedia lookup for the entry being viewed
//!
//! APOD titles are descriptive phrases ("The Tails of Comet X") and rarely
//! match an article title. A direct summary lookup is tried first; if that
//! yields nothing, the title is run through a free-text search and the top hit
//! is looked up instead.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::data::EnrichmentResult;
use crate::error::NetworkError;

/// Encyclopedia endpoints the lookup needs
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Summary for an exact article title
    ///
    /// `Ok(None)` when the article does not exist, the server answers with a
    /// non-success status, or the summary is empty.
    async fn summary(&self, title: &str) -> Result<Option<EnrichmentResult>, NetworkError>;

    /// Candidate article titles for a free-text query, best first
    async fn search(&self, query: &str) -> Result<Vec<String>, NetworkError>;
}

/// Resolves APOD titles to encyclopedia summaries
#[derive(Clone)]
pub struct EnrichmentClient {
    api: Arc<dyn Encyclopedia>,
}

impl EnrichmentClient {
    pub fn new(api: Arc<dyn Encyclopedia>) -> Self {
        Self { api }
    }

    /// Looks up a summary for `title`
    ///
    /// Returns `Ok(None)` when neither the direct lookup nor the search
    /// fallback finds an article.
    pub async fn lookup(&self, title: &str) -> Result<Option<EnrichmentResult>, NetworkError> {
        if let Some(result) = self.api.summary(title).await? {
            debug!(title, "direct summary hit");
            return Ok(Some(result));
        }

        let hits = self.api.search(title).await?;
        let Some(resolved) = hits.into_iter().next() else {
            info!(title, "no encyclopedia article found");
            return Ok(None);
        };

        debug!(title, resolved = %resolved, "retrying summary with search hit");
        let result = self.api.summary(&resolved).await?;
        if result.is_none() {
            info!(title, resolved = %resolved, "search hit has no usable summary");
        }
        Ok(result)
    }
}
