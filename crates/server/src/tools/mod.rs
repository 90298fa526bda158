//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-media server.

pub mod cache;
pub mod media_content_type;
pub mod media_resolve;

pub use cache::{CachePurgeParams, purge_impl};
pub use media_content_type::{MediaContentTypeParams, content_type_impl};
pub use media_resolve::{MediaResolveParams, resolve_impl};
