//! media_content_type tool implementation.
//!
//! Resolves a URL and reports only its content type.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mediaref_client::MediaResolver;
use mediaref_core::Error;

/// Input parameters for media_content_type tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaContentTypeParams {
    /// Absolute URL of the media.
    pub url: String,
}

/// Output structure for media_content_type tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MediaContentTypeOutput {
    pub url: String,
    /// Deduced content type, or null when none could be determined.
    pub content_type: Option<String>,
}

/// Implementation of the media_content_type tool.
pub async fn content_type_impl(
    resolver: &MediaResolver, params: MediaContentTypeParams,
) -> Result<CallToolResult, McpError> {
    let content_type = resolver.get_content_type(&params.url).await?;

    let output = MediaContentTypeOutput { url: params.url, content_type };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
