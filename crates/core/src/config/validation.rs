//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `page_origin` is not an absolute http(s) URL
    /// - `media_api_path` or `cors_proxy_path` does not start with `/`
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_archive_bytes` is 0 or exceeds 1GB
    /// - `max_extracted_bytes` is 0 or exceeds 16GB
    /// - `user_agent` is empty
    /// - `cache_ttl_secs` or `cache_max_entries` is set to 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = url::Url::parse(&self.page_origin)
            .map_err(|e| ConfigError::Invalid { field: "page_origin".into(), reason: e.to_string() })?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "page_origin".into(),
                reason: format!("unsupported scheme: {}", origin.scheme()),
            });
        }
        if origin.path() != "/" {
            tracing::warn!(page_origin = %self.page_origin, "page_origin has a path; only its origin is used");
        }

        for (field, path) in [("media_api_path", &self.media_api_path), ("cors_proxy_path", &self.cors_proxy_path)] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must start with '/'".into() });
            }
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_archive_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_archive_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_archive_bytes > 1024 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_archive_bytes".into(), reason: "must not exceed 1GB".into() });
        }

        if self.max_extracted_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_extracted_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_extracted_bytes > 16 * 1024 * 1024 * 1024 {
            return Err(ConfigError::Invalid {
                field: "max_extracted_bytes".into(),
                reason: "must not exceed 16GB".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_ttl_secs == Some(0) {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be greater than 0".into() });
        }
        if self.cache_max_entries == Some(0) {
            return Err(ConfigError::Invalid {
                field: "cache_max_entries".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}
