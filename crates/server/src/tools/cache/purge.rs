//! media_cache_purge tool implementation.
//!
//! Drops resolution cache entries, either all of them or only expired ones.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mediaref_client::ResolutionCache;
use mediaref_core::Error;

/// Parameters for the media_cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Only drop entries past the configured TTL (default: drop everything).
    #[serde(default)]
    pub expired_only: bool,
}

/// Output from the media_cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries removed.
    pub removed: usize,
    /// Number of entries still cached.
    pub remaining: usize,
}

/// Implementation of the media_cache_purge tool.
pub async fn purge_impl(cache: &ResolutionCache, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let removed = if params.expired_only { cache.cleanup_expired().await } else { cache.clear().await };
    let remaining = cache.len().await;

    tracing::debug!("purged {} resolution cache entries, {} remaining", removed, remaining);

    let output = CachePurgeOutput { removed, remaining };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
