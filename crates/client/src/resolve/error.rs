//! Resolution service error types.

use std::sync::Arc;

/// Errors from the resolution service client.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The service answered with a non-success status. `message` is the
    /// response body, or the status reason when the body is unusable.
    #[error("error resolving url \"{url}\": {message}")]
    Service { url: String, status: u16, message: String },

    /// Request timeout.
    #[error("request timeout resolving url \"{0}\"")]
    Timeout(String),

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ResolveError {
    /// Classify a transport failure while resolving the media `url`.
    ///
    /// `url` is the media URL being resolved, not the service endpoint the
    /// request went to.
    pub fn from_http(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() { ResolveError::Timeout(url.to_string()) } else { ResolveError::Network(Arc::new(err)) }
    }
}

impl From<ResolveError> for mediaref_core::Error {
    fn from(err: ResolveError) -> Self {
        use mediaref_core::Error;

        match err {
            ResolveError::Service { .. } => Error::ResolveFailed(err.to_string()),
            ResolveError::Timeout(_) | ResolveError::Network(_) => Error::HttpError(err.to_string()),
            ResolveError::Parse(msg) => Error::Parse(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::Service {
            url: "https://x/y".to_string(),
            status: 404,
            message: "no such media".to_string(),
        };
        assert_eq!(err.to_string(), "error resolving url \"https://x/y\": no such media");
    }

    #[test]
    fn test_service_error_keeps_body_in_core_error() {
        let err = ResolveError::Service { url: "https://x/y".into(), status: 500, message: "boom".into() };
        let core: mediaref_core::Error = err.into();
        assert!(matches!(core, mediaref_core::Error::ResolveFailed(ref msg) if msg.contains("boom")));
    }
}
