//! Resolution service request body.

use serde::Serialize;

/// Body of `POST /api/media`: `{ "media": { "url": ..., "index": ... } }`.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveRequest<'a> {
    pub media: MediaRef<'a>,
}

/// The media reference being resolved.
#[derive(Debug, Clone, Serialize)]
pub struct MediaRef<'a> {
    pub url: &'a str,

    /// Index into multi-item media (e.g. a page of a document). Omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl<'a> ResolveRequest<'a> {
    pub fn new(url: &'a str, index: Option<u32>) -> Self {
        Self { media: MediaRef { url, index } }
    }
}
