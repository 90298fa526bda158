//! Archive unpacking error types.

/// Errors reported by an archive unpacker.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The archive could not be downloaded.
    #[error("download failed: {0}")]
    Download(String),

    /// The archive, downloaded or extracted, is larger than the configured limit.
    #[error("archive too large: {size} bytes exceeds {max}")]
    TooLarge { size: u64, max: u64 },

    /// The bytes are not a readable zip archive.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry name would escape the extraction directory.
    #[error("unsafe entry name: {0}")]
    UnsafeEntry(String),

    /// Writing extracted files failed.
    #[error("io error: {0}")]
    Io(String),

    /// The worker stopped before replying.
    #[error("archive worker is not running")]
    WorkerGone,
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(err: zip::result::ZipError) -> Self {
        ArchiveError::InvalidArchive(err.to_string())
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::Io(err.to_string())
    }
}

impl From<ArchiveError> for mediaref_core::Error {
    fn from(err: ArchiveError) -> Self {
        mediaref_core::Error::ArchiveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiveError::TooLarge { size: 10, max: 5 };
        assert_eq!(err.to_string(), "archive too large: 10 bytes exceeds 5");

        let core: mediaref_core::Error = ArchiveError::WorkerGone.into();
        assert!(core.to_string().starts_with("ARCHIVE_FAILED"));
    }
}
