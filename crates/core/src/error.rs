//! Unified error types for mcp-media.
//!
//! Every variant renders with a stable upper-case code prefix so callers can
//! match on the message without depending on this crate's types.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the media resolution pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty source).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The resolution service answered with a non-success status.
    #[error("RESOLVE_FAILED: {0}")]
    ResolveFailed(String),

    /// Network failure talking to the resolution service, the proxy or a probe target.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// A response body could not be parsed.
    #[error("PARSE_ERROR: {0}")]
    Parse(String),

    /// The archive worker reported a failure.
    #[error("ARCHIVE_FAILED: {0}")]
    ArchiveFailed(String),

    /// The unpacked archive has no scene entry.
    #[error("ARCHIVE_NO_SCENE: {0}")]
    ArchiveMissingScene(String),

    /// Configuration could not be loaded or is invalid.
    #[error("CONFIG_ERROR: {0}")]
    Config(String),
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::ResolveFailed(msg) => (-32020, msg.clone()),
            Error::HttpError(msg) => (-32008, msg.clone()),
            Error::Parse(msg) => (-32021, msg.clone()),
            Error::ArchiveFailed(msg) => (-32022, msg.clone()),
            Error::ArchiveMissingScene(msg) => (-32023, msg.clone()),
            Error::Config(msg) => (-32603, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
