//! URL resolution against the page origin.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Parse the page origin that relative sources and service paths are joined to.
///
/// Only `http` and `https` origins are accepted. Any path, query or fragment on
/// the input is dropped.
pub fn parse_origin(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_path("/");
    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve a user-supplied media source against `base`.
///
/// Absolute sources are returned as-is (any scheme); relative ones are joined
/// the way a browser joins an `href` against the current location.
pub fn resolve_href(base: &Url, src: &str) -> Result<Url, UrlError> {
    let trimmed = src.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    base.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}
