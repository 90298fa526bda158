//! Content-type deduction for resolved media.
//!
//! Three tiers, first non-empty answer wins:
//! 1. `meta.expected_content_type` declared by the resolution service
//! 2. the canonical URL's file extension, looked up in [`KNOWN_CONTENT_TYPES`]
//! 3. the `content-type` header of a live `HEAD` against the accessible URL

use reqwest::Url;

use crate::fetch::FetchClient;
use crate::resolve::Resolution;
use mediaref_core::Error;

/// Content type of a zipped glTF scene that must be unpacked before use.
pub const GLTF_ZIP_CONTENT_TYPE: &str = "model/gltf+zip";

/// Extensions recognised without a network round-trip.
pub const KNOWN_CONTENT_TYPES: &[(&str, &str)] = &[
    ("gltf", "model/gltf"),
    ("glb", "model/gltf-binary"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("pdf", "application/pdf"),
    ("mp4", "video/mp4"),
    ("mp3", "audio/mpeg"),
];

/// Which tier produced a content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypeSource {
    Declared,
    Extension,
    Probe,
}

/// Guess a content type from the extension of `url`'s path.
///
/// The extension is whatever follows the last `.` in the path. URLs that do
/// not parse, or whose extension is not in the table, yield `None`.
pub fn guess_content_type(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path();
    let extension = path.rsplit_once('.').map_or(path, |(_, ext)| ext);

    KNOWN_CONTENT_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(extension))
        .map(|(_, content_type)| *content_type)
}

/// Run the three tiers for `resolution`, probing `accessible_url` only if needed.
pub async fn deduce_content_type(
    resolution: &Resolution, accessible_url: &Url, fetch: &FetchClient,
) -> Result<Option<(String, ContentTypeSource)>, Error> {
    if let Some(declared) = resolution.expected_content_type() {
        return Ok(Some((declared.to_string(), ContentTypeSource::Declared)));
    }

    if let Some(guessed) = guess_content_type(&resolution.origin) {
        return Ok(Some((guessed.to_string(), ContentTypeSource::Extension)));
    }

    let probed = fetch.head_content_type(accessible_url).await?;
    Ok(probed.map(|content_type| (content_type, ContentTypeSource::Probe)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;
    use crate::resolve::ResolutionMeta;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolution(origin: &str, declared: Option<&str>) -> Resolution {
        Resolution {
            origin: origin.to_string(),
            meta: declared.map(|d| ResolutionMeta { expected_content_type: Some(d.to_string()) }),
        }
    }

    #[test]
    fn test_guess_known_extensions() {
        assert_eq!(guess_content_type("https://x/a.png"), Some("image/png"));
        assert_eq!(guess_content_type("https://x/models/duck.glb"), Some("model/gltf-binary"));
        assert_eq!(guess_content_type("https://x/scene.gltf?v=3#top"), Some("model/gltf"));
        assert_eq!(guess_content_type("https://x/song.mp3"), Some("audio/mpeg"));
        assert_eq!(guess_content_type("https://x/photo.JPEG"), Some("image/jpeg"));
    }

    #[test]
    fn test_guess_unknown_extension() {
        assert_eq!(guess_content_type("https://x/a.webm"), None);
        assert_eq!(guess_content_type("https://x/no-extension"), None);
        assert_eq!(guess_content_type("https://x/"), None);
    }

    #[test]
    fn test_guess_uses_last_dot_of_whole_path() {
        assert_eq!(guess_content_type("https://x/archive.png/view"), None);
        assert_eq!(guess_content_type("https://x/a.tar.pdf"), Some("application/pdf"));
    }

    #[test]
    fn test_guess_unparseable_url() {
        assert_eq!(guess_content_type("not a url"), None);
    }

    #[tokio::test]
    async fn test_declared_wins_over_extension_and_probe() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/plain"))
            .expect(0)
            .mount(&server)
            .await;

        let fetch = FetchClient::new(FetchConfig::default()).unwrap();
        let accessible = Url::parse(&server.uri()).unwrap();
        let result = deduce_content_type(&resolution("https://x/a.png", Some("video/x-custom")), &accessible, &fetch)
            .await
            .unwrap();
        assert_eq!(result, Some(("video/x-custom".to_string(), ContentTypeSource::Declared)));
    }

    #[tokio::test]
    async fn test_extension_skips_probe() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/plain"))
            .expect(0)
            .mount(&server)
            .await;

        let fetch = FetchClient::new(FetchConfig::default()).unwrap();
        let accessible = Url::parse(&server.uri()).unwrap();
        let result = deduce_content_type(&resolution("https://x/a.mp4", None), &accessible, &fetch)
            .await
            .unwrap();
        assert_eq!(result, Some(("video/mp4".to_string(), ContentTypeSource::Extension)));
    }

    #[tokio::test]
    async fn test_probe_is_last_resort() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/webp"))
            .expect(1)
            .mount(&server)
            .await;

        let fetch = FetchClient::new(FetchConfig::default()).unwrap();
        let accessible = Url::parse(&server.uri()).unwrap();
        let result = deduce_content_type(&resolution("https://x/image", Some("")), &accessible, &fetch)
            .await
            .unwrap();
        assert_eq!(result, Some(("image/webp".to_string(), ContentTypeSource::Probe)));
    }

    #[tokio::test]
    async fn test_all_tiers_empty() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let fetch = FetchClient::new(FetchConfig::default()).unwrap();
        let accessible = Url::parse(&server.uri()).unwrap();
        let result = deduce_content_type(&resolution("https://x/blob", None), &accessible, &fetch)
            .await
            .unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_probe_network_failure_propagates() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetch = FetchClient::new(FetchConfig::default()).unwrap();
        let accessible = Url::parse(&format!("http://127.0.0.1:{port}/api/cors-proxy?url=x")).unwrap();
        let result = deduce_content_type(&resolution("https://x/blob", None), &accessible, &fetch).await;
        assert!(matches!(result, Err(Error::HttpError(_))));
    }
}
