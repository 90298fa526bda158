//! media_resolve tool implementation.
//!
//! Resolves a media source into canonical and accessible URLs plus content
//! type, unpacking zipped glTF scenes.

use chrono::Utc;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use mediaref_client::MediaResolver;
use mediaref_core::Error;

/// Input parameters for media_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaResolveParams {
    /// Media source: an absolute URL, or a path relative to the page origin.
    pub src: String,

    /// Item index for multi-item media such as documents (optional).
    #[serde(default)]
    pub index: Option<u32>,
}

/// Output structure for media_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaResolveOutput {
    /// Canonical origin URL reported by the resolution service.
    pub canonical_url: String,
    /// URL the media can be loaded from.
    pub accessible_url: String,
    /// Deduced content type, if known.
    pub content_type: Option<String>,
    /// Unpacked archive entries (entry name to URL), for zipped scenes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, String>>,
    /// ISO8601 timestamp of when the media was resolved.
    pub resolved_at: String,
}

/// Implementation of the media_resolve tool.
pub async fn resolve_impl(resolver: &MediaResolver, params: MediaResolveParams) -> Result<CallToolResult, McpError> {
    if params.src.trim().is_empty() {
        return Err(Error::InvalidInput("src cannot be empty".into()).into());
    }

    let media = resolver.resolve_media(&params.src, params.index).await?;
    let resolved_at = Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let output = MediaResolveOutput {
        canonical_url: media.canonical_url,
        accessible_url: media.accessible_url.to_string(),
        content_type: media.content_type,
        files: media
            .files
            .map(|files| files.into_iter().map(|(name, url)| (name, url.to_string())).collect()),
        resolved_at,
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
