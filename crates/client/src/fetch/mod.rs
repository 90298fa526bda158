//! HTTP plumbing shared by the resolver, the content-type probe and the
//! archive worker.
//!
//! ### Endpoints
//! - The resolution service and CORS proxy live on the page origin.
//! - Media sources are joined against the page origin like an `href`.
//!
//! ### Probing
//! - `HEAD` against the accessible (proxied) URL.
//! - Only the `content-type` header is read; the status is not inspected.

pub mod proxy;
pub mod url;

use reqwest::{Client, Url, header};
use std::time::Duration;

pub use proxy::proxied_url_for;
pub use self::url::{UrlError, parse_origin, resolve_href};

use mediaref_core::{AppConfig, Error};

/// Configuration for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "mcp-media/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { user_agent: "mcp-media/0.1".to_string(), timeout: Duration::from_millis(20000) }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self { user_agent: config.user_agent.clone(), timeout: config.timeout() }
    }
}

/// The service endpoints derived from the page origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Origin relative media sources are resolved against.
    pub page_origin: Url,
    /// Resolution service (`POST`).
    pub media_api: Url,
    /// CORS proxy (`GET`/`HEAD` with a `url` query parameter).
    pub cors_proxy: Url,
}

impl Endpoints {
    /// Derive the endpoints from an origin and the two service paths.
    pub fn new(page_origin: &str, media_api_path: &str, cors_proxy_path: &str) -> Result<Self, Error> {
        let page_origin = parse_origin(page_origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let media_api = page_origin
            .join(media_api_path)
            .map_err(|e| Error::InvalidUrl(format!("media api path {media_api_path:?}: {e}")))?;
        let cors_proxy = page_origin
            .join(cors_proxy_path)
            .map_err(|e| Error::InvalidUrl(format!("cors proxy path {cors_proxy_path:?}: {e}")))?;

        Ok(Self { page_origin, media_api, cors_proxy })
    }

    /// Endpoints described by the application config.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.page_origin, &config.media_api_path, &config.cors_proxy_path)
    }

    /// Accessible URL for `origin_url`, routed through the CORS proxy.
    pub fn proxied(&self, origin_url: &str) -> Url {
        proxied_url_for(&self.cors_proxy, origin_url)
    }
}

/// HTTP client with the configured user agent and timeout.
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Read the `content-type` a `HEAD` request reports for `url`.
    ///
    /// Returns `None` when the header is missing, empty or not valid text.
    pub async fn head_content_type(&self, url: &Url) -> Result<Option<String>, Error> {
        let response = self
            .http
            .head(url.as_str())
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("network error: {}", e)))?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        tracing::debug!("HEAD {} -> {} ({:?})", url, response.status().as_u16(), content_type);

        Ok(content_type)
    }

    /// Underlying reqwest client, shared with the resolver and archive worker.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
