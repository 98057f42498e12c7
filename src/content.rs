//! On-demand note content lookup
//!
//! Cards that miss on local attributes fall back to the full note body,
//! fetched once per note and cached for the process lifetime. Every failure
//! mode degrades to "no content" for that card; sibling lookups and the
//! enclosing filter pass are never affected.

use crate::cache::ContentCache;
use crate::error::{normalize_content, validate_note_id, FilterError};
use crate::http::client_with_timeout;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Bound on a single content fetch, so one hung request cannot stall a pass
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Wire body of a successful content fetch
#[derive(Debug, Clone, Deserialize)]
pub struct ContentBody {
    pub content: String,
}

/// External source of full note bodies
///
/// The single seam between the filter core and whatever stores the notes.
pub trait ContentSource: Send + Sync {
    fn fetch_content(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ContentBody, FilterError>> + Send;
}

/// Content source backed by the notes HTTP API
///
/// Fetches `GET {base}/notes/{id}/content`, which answers
/// `{"content": "..."}` on success.
pub struct HttpContentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: client_with_timeout(FETCH_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ContentSource for HttpContentSource {
    fn fetch_content(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ContentBody, FilterError>> + Send {
        let url = format!("{}/notes/{}/content", self.base_url, id);
        let request = self.client.get(&url);
        async move {
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(FilterError::Transport(format!(
                    "content API error {}",
                    response.status()
                )));
            }
            let body: ContentBody = response
                .json()
                .await
                .map_err(|e| FilterError::MissingContent(e.to_string()))?;
            Ok(body)
        }
    }
}

/// Cache-backed content lookup
pub struct ContentLookup<S> {
    cache: ContentCache,
    source: S,
}

impl<S: ContentSource> ContentLookup<S> {
    pub fn new(source: S) -> Self {
        Self {
            cache: ContentCache::new(),
            source,
        }
    }

    /// Use an existing cache, shared with other lookups
    pub fn with_cache(source: S, cache: ContentCache) -> Self {
        Self { cache, source }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Resolve the normalized full body for a note id
    ///
    /// Cache hits return immediately. On a miss the source is queried under
    /// [`FETCH_TIMEOUT`]; the body is normalized and cached only on confirmed
    /// success. Failures cache nothing, so a later pass re-attempts the fetch.
    pub async fn lookup(&self, id: &str) -> Option<String> {
        if validate_note_id(id).is_err() {
            return None;
        }

        if let Some(content) = self.cache.get(id) {
            debug!("Cache hit for note {}", id);
            return Some(content);
        }

        debug!("Cache miss for note {}, fetching", id);
        let fetched = match timeout(FETCH_TIMEOUT, self.source.fetch_content(id)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                warn!(
                    "Content lookup failed for note {}: {} ({})",
                    id,
                    e.message(),
                    e.error_code()
                );
                return None;
            }
            Err(_) => {
                warn!(
                    "Content lookup for note {} exceeded {}s timeout",
                    id,
                    FETCH_TIMEOUT.as_secs()
                );
                return None;
            }
        };

        if fetched.content.is_empty() {
            warn!("Content response for note {} has no body", id);
            return None;
        }

        let normalized = normalize_content(&fetched.content);

        // Concurrent lookups for the same id may both miss; whichever write
        // landed first is the one persisted, values are identical anyway.
        if let Some(existing) = self.cache.get(id) {
            return Some(existing);
        }
        self.cache.store(id, normalized.clone());
        Some(normalized)
    }
}
