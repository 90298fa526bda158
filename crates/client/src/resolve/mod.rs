//! Resolution service client.
//!
//! Maps an arbitrary media URL to its canonical origin and metadata.
//!
//! ### Protocol
//!
//! - **Endpoint**: `POST {page_origin}/api/media`
//! - **Body**: `{ "media": { "url": ..., "index": ... } }`
//! - **Caching**: answers are cached per `(url, index)` in a [`ResolutionCache`].
//! - **Errors**: non-2xx answers fail with the response body as message (status
//!   reason if the body is unreadable or empty). No retries.

pub mod cache;
pub mod error;
pub mod request;
pub mod response;

pub use cache::ResolutionCache;
pub use error::ResolveError;
pub use request::{MediaRef, ResolveRequest};
pub use response::{Resolution, ResolutionMeta};

use reqwest::Url;
use std::sync::Arc;
use std::time::Instant;

/// Client for the resolution service.
#[derive(Debug, Clone)]
pub struct ResolverClient {
    http: reqwest::Client,
    endpoint: Url,
    cache: Arc<ResolutionCache>,
}

impl ResolverClient {
    /// Create a resolver posting to `endpoint` and caching into `cache`.
    pub fn new(http: reqwest::Client, endpoint: Url, cache: Arc<ResolutionCache>) -> Self {
        Self { http, endpoint, cache }
    }

    /// Resolve `url` (optionally at `index`), serving from the cache when possible.
    pub async fn resolve(&self, url: &str, index: Option<u32>) -> Result<Resolution, ResolveError> {
        if let Some(cached) = self.cache.get(url, index).await {
            tracing::debug!("resolution cache hit for {}|{:?}", url, index);
            return Ok(cached);
        }

        let start = Instant::now();
        tracing::debug!("resolving media url={} index={:?}", url, index);

        let response = self
            .http
            .post(self.endpoint.as_str())
            .json(&ResolveRequest::new(url, index))
            .send()
            .await
            .map_err(|e| ResolveError::from_http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_str().to_string());
            let message = match response.text().await {
                Ok(body) if !body.trim().is_empty() => body,
                _ => reason,
            };

            tracing::debug!("resolution service returned {} for {}", status.as_u16(), url);
            return Err(ResolveError::Service { url: url.to_string(), status: status.as_u16(), message });
        }

        let bytes = response.bytes().await.map_err(|e| ResolveError::from_http(url, e))?;
        let resolution: Resolution = serde_json::from_slice(&bytes).map_err(|e| ResolveError::Parse(e.to_string()))?;

        tracing::debug!("resolved {} -> {} in {:?}", url, resolution.origin, start.elapsed());

        self.cache.insert(url, index, resolution.clone()).await;

        Ok(resolution)
    }

    /// Get reference to the resolution cache.
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// The resolution service endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ResolverClient {
        let endpoint = Url::parse(&format!("{}/api/media", server.uri())).unwrap();
        ResolverClient::new(reqwest::Client::new(), endpoint, Arc::new(ResolutionCache::unbounded()))
    }

    #[tokio::test]
    async fn test_resolve_posts_media_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/media"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "media": { "url": "https://x/doc.pdf", "index": 2 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "origin": "https://cdn.x/doc.pdf",
                "meta": { "expected_content_type": "application/pdf" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let resolution = client(&server).resolve("https://x/doc.pdf", Some(2)).await.unwrap();
        assert_eq!(resolution.origin, "https://cdn.x/doc.pdf");
        assert_eq!(resolution.expected_content_type(), Some("application/pdf"));
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "origin": "https://cdn.x/a.png" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let first = client.resolve("https://x/a.png", None).await.unwrap();
        let second = client.resolve("https://x/a.png", None).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(client.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_different_index_not_cached_together() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "origin": "https://cdn.x/doc.pdf" })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server);
        client.resolve("https://x/doc.pdf", Some(0)).await.unwrap();
        client.resolve("https://x/doc.pdf", Some(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = client(&server).resolve("https://x/a.png", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Service { status: 502, .. }));
        assert!(err.to_string().contains("upstream exploded"));
        assert!(err.to_string().contains("https://x/a.png"));
    }

    #[tokio::test]
    async fn test_error_status_without_body_uses_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).resolve("https://x/a.png", None).await.unwrap_err();
        assert!(err.to_string().ends_with("Not Found"));
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("nope"))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.resolve("https://x/a.png", None).await.is_err());
        assert!(client.resolve("https://x/a.png", None).await.is_err());
        assert!(client.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).resolve("https://x/a.png", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Parse(_)));
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_new_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/media"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "origin": "https://cdn.x/a.png" })))
            .expect(2)
            .mount(&server)
            .await;

        let endpoint = Url::parse(&format!("{}/api/media", server.uri())).unwrap();
        let cache = Arc::new(ResolutionCache::new(Some(Duration::from_millis(50)), None));
        let client = ResolverClient::new(reqwest::Client::new(), endpoint, cache);

        client.resolve("https://x/a.png", None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        client.resolve("https://x/a.png", None).await.unwrap();
        assert_eq!(client.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_timeout_names_media_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "origin": "https://cdn.x/a.png" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let http = reqwest::Client::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let endpoint = Url::parse(&format!("{}/api/media", server.uri())).unwrap();
        let client = ResolverClient::new(http, endpoint, Arc::new(ResolutionCache::unbounded()));

        let err = client.resolve("https://x/a.png", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Timeout(ref url) if url == "https://x/a.png"));
        assert_eq!(err.to_string(), "request timeout resolving url \"https://x/a.png\"");
    }
}
