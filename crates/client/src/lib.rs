//! Client code for mcp-media.
//!
//! This crate provides the media resolution pipeline: resolution service
//! client and cache, CORS proxy URLs, content-type deduction and archive
//! unpacking, composed by [`MediaResolver`].

pub mod archive;
pub mod content_type;
pub mod fetch;
pub mod media;
pub mod resolve;

pub use archive::{ArchiveError, ArchiveUnpacker, FileMap, ZipWorker, ZipWorkerConfig};
pub use content_type::{GLTF_ZIP_CONTENT_TYPE, guess_content_type};
pub use fetch::{Endpoints, FetchClient, FetchConfig, proxied_url_for};
pub use media::{MediaResolution, MediaResolver};
pub use resolve::{Resolution, ResolutionCache, ResolveError, ResolverClient};
