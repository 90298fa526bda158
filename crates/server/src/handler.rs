//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    CachePurgeParams, MediaContentTypeParams, MediaResolveParams, content_type_impl, purge_impl, resolve_impl,
};
use mediaref_client::MediaResolver;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for mcp-media.
#[derive(Clone)]
pub struct McpMediaServer {
    resolver: Arc<MediaResolver>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpMediaServer {
    /// Create a new server handler around a shared resolver.
    pub fn new(resolver: Arc<MediaResolver>) -> Self {
        Self { resolver, tool_router: Self::tool_router() }
    }

    /// Resolve a media source into canonical and accessible URLs.
    ///
    /// Zipped glTF scenes are unpacked and the scene entry is returned as the accessible URL.
    #[tool(
        description = "Resolve a media URL (absolute or relative to the page origin). Returns canonical URL, proxied accessible URL, content type, and unpacked files for zipped glTF scenes."
    )]
    async fn media_resolve(&self, params: Parameters<MediaResolveParams>) -> Result<CallToolResult, McpError> {
        resolve_impl(&self.resolver, params.0).await
    }

    /// Report the content type of a media URL.
    #[tool(description = "Resolve a media URL and return only its content type.")]
    async fn media_content_type(&self, params: Parameters<MediaContentTypeParams>) -> Result<CallToolResult, McpError> {
        content_type_impl(&self.resolver, params.0).await
    }

    /// Drop cached resolutions.
    #[tool(description = "Purge the in-memory resolution cache. Set expired_only to drop only entries past their TTL.")]
    async fn media_cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.resolver.cache(), params.0).await
    }
}

impl ServerHandler for McpMediaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-media".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
