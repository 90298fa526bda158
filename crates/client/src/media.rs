//! Media resolution facade.
//!
//! Composes the resolver, proxy builder, content-type deduction and archive
//! unpacker into the two public operations, [`MediaResolver::get_content_type`]
//! and [`MediaResolver::resolve_media`].

use reqwest::Url;
use serde::Serialize;
use std::sync::Arc;

use crate::archive::{ArchiveUnpacker, FileMap, ZipWorker, ZipWorkerConfig, scene_entry};
use crate::content_type::{GLTF_ZIP_CONTENT_TYPE, deduce_content_type};
use crate::fetch::{Endpoints, FetchClient, FetchConfig, resolve_href};
use crate::resolve::{Resolution, ResolutionCache, ResolverClient};
use mediaref_core::{AppConfig, Error};

/// A fully resolved media reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaResolution {
    /// Origin URL reported by the resolution service.
    pub canonical_url: String,
    /// URL the media can be fetched from: the proxied origin, or the scene
    /// entry for unpacked archives.
    pub accessible_url: Url,
    /// Deduced content type, if any tier produced one.
    pub content_type: Option<String>,
    /// Unpacked files, for archive-backed media only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FileMap>,
}

/// Resolves user-supplied media references into accessible resources.
pub struct MediaResolver {
    endpoints: Endpoints,
    fetch: FetchClient,
    resolver: ResolverClient,
    unpacker: Arc<dyn ArchiveUnpacker>,
}

impl std::fmt::Debug for MediaResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaResolver")
            .field("endpoints", &self.endpoints)
            .field("resolver", &self.resolver)
            .field("unpacker", &"<unpacker>")
            .finish()
    }
}

impl MediaResolver {
    /// Assemble a resolver from its parts.
    pub fn new(
        endpoints: Endpoints, fetch: FetchClient, cache: Arc<ResolutionCache>, unpacker: Arc<dyn ArchiveUnpacker>,
    ) -> Self {
        let resolver = ResolverClient::new(fetch.http().clone(), endpoints.media_api.clone(), cache);
        Self { endpoints, fetch, resolver, unpacker }
    }

    /// Build a resolver, its cache and a [`ZipWorker`] from the application config.
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let endpoints = Endpoints::from_config(config)?;
        let fetch = FetchClient::new(FetchConfig::from(config))?;
        let cache = Arc::new(ResolutionCache::new(config.cache_ttl(), config.cache_max_entries));
        let worker = ZipWorker::spawn(
            fetch.http().clone(),
            ZipWorkerConfig {
                max_archive_bytes: config.max_archive_bytes,
                max_extracted_bytes: config.max_extracted_bytes,
                ..Default::default()
            },
        )?;

        Ok(Self::new(endpoints, fetch, cache, Arc::new(worker)))
    }

    /// Resolve `url` and return only its content type.
    pub async fn get_content_type(&self, url: &str) -> Result<Option<String>, Error> {
        if url.trim().is_empty() {
            return Err(Error::InvalidInput("url cannot be empty".into()));
        }

        let resolution = self.resolver.resolve(url, None).await?;
        let accessible_url = self.endpoints.proxied(&resolution.origin);

        self.content_type_for(&resolution, &accessible_url).await
    }

    /// Resolve `src` (relative to the page origin) into canonical and
    /// accessible URLs plus content type, unpacking zipped scenes.
    ///
    /// `index` is forwarded to the resolution service and keys the cache.
    /// Earlier web clients dropped it here and always resolved the whole
    /// document; pass `None` to get that behavior.
    pub async fn resolve_media(&self, src: &str, index: Option<u32>) -> Result<MediaResolution, Error> {
        let href = resolve_href(&self.endpoints.page_origin, src).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let resolution = self.resolver.resolve(href.as_str(), index).await?;
        let canonical_url = resolution.origin.clone();
        let accessible_url = self.endpoints.proxied(&canonical_url);
        let content_type = self.content_type_for(&resolution, &accessible_url).await?;

        if content_type.as_deref() == Some(GLTF_ZIP_CONTENT_TYPE) {
            let files = self.unpacker.unpack(&accessible_url).await?;
            let scene = scene_entry(&files)
                .cloned()
                .ok_or_else(|| Error::ArchiveMissingScene(format!("no scene entry in archive for {canonical_url}")))?;

            return Ok(MediaResolution { canonical_url, accessible_url: scene, content_type, files: Some(files) });
        }

        Ok(MediaResolution { canonical_url, accessible_url, content_type, files: None })
    }

    async fn content_type_for(&self, resolution: &Resolution, accessible_url: &Url) -> Result<Option<String>, Error> {
        let deduced = deduce_content_type(resolution, accessible_url, &self.fetch).await?;

        match &deduced {
            Some((content_type, source)) => {
                tracing::debug!("content type of {} is {} ({:?})", resolution.origin, content_type, source)
            }
            None => tracing::debug!("no content type found for {}", resolution.origin),
        }

        Ok(deduced.map(|(content_type, _)| content_type))
    }

    /// Get reference to the resolution cache.
    pub fn cache(&self) -> &ResolutionCache {
        self.resolver.cache()
    }

    /// Get reference to the service endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
