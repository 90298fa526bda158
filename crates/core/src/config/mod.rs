//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_MEDIA_*)
//! 2. TOML config file (if MCP_MEDIA_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_MEDIA_*)
/// 2. TOML config file (if MCP_MEDIA_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin of the page media sources are resolved against. The resolution
    /// service and CORS proxy are reached on this origin.
    ///
    /// Set via MCP_MEDIA_PAGE_ORIGIN environment variable.
    #[serde(default = "default_page_origin")]
    pub page_origin: String,

    /// Path of the resolution service on `page_origin`.
    ///
    /// Set via MCP_MEDIA_MEDIA_API_PATH environment variable.
    #[serde(default = "default_media_api_path")]
    pub media_api_path: String,

    /// Path of the CORS proxy on `page_origin`.
    ///
    /// Set via MCP_MEDIA_CORS_PROXY_PATH environment variable.
    #[serde(default = "default_cors_proxy_path")]
    pub cors_proxy_path: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_MEDIA_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MCP_MEDIA_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Largest archive the zip worker will download, in bytes.
    ///
    /// Set via MCP_MEDIA_MAX_ARCHIVE_BYTES environment variable.
    #[serde(default = "default_max_archive_bytes")]
    pub max_archive_bytes: usize,

    /// Largest total size one archive may expand to on disk, in bytes.
    ///
    /// Set via MCP_MEDIA_MAX_EXTRACTED_BYTES environment variable.
    #[serde(default = "default_max_extracted_bytes")]
    pub max_extracted_bytes: u64,

    /// Age after which a cached resolution is ignored. Unset keeps entries
    /// for the life of the process.
    ///
    /// Set via MCP_MEDIA_CACHE_TTL_SECS environment variable.
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,

    /// Maximum number of cached resolutions. Unset means unbounded.
    ///
    /// Set via MCP_MEDIA_CACHE_MAX_ENTRIES environment variable.
    #[serde(default)]
    pub cache_max_entries: Option<usize>,
}

fn default_page_origin() -> String {
    "http://localhost:8080".into()
}

fn default_media_api_path() -> String {
    "/api/media".into()
}

fn default_cors_proxy_path() -> String {
    "/api/cors-proxy".into()
}

fn default_user_agent() -> String {
    "mcp-media/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_archive_bytes() -> usize {
    100 * 1024 * 1024 // 100MB
}

fn default_max_extracted_bytes() -> u64 {
    512 * 1024 * 1024 // 512MB
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_origin: default_page_origin(),
            media_api_path: default_media_api_path(),
            cors_proxy_path: default_cors_proxy_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_archive_bytes: default_max_archive_bytes(),
            max_extracted_bytes: default_max_extracted_bytes(),
            cache_ttl_secs: None,
            cache_max_entries: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration, if one is configured.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_MEDIA_`
    /// 2. TOML file from `MCP_MEDIA_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_MEDIA_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_MEDIA_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
