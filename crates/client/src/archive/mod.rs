//! Archive unpacking for zipped glTF scenes.
//!
//! Unpacking is delegated to a background worker over a typed channel: one
//! job in, one `Result<FileMap, ArchiveError>` out. [`ZipWorker`] is the
//! default worker; anything implementing [`ArchiveUnpacker`] can stand in.

pub mod error;
pub mod extract;

pub use error::ArchiveError;
pub use extract::extract_archive;

use async_trait::async_trait;
use reqwest::Url;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::{mpsc, oneshot};

/// Archive entry name to a locally fetchable URL.
pub type FileMap = BTreeMap<String, Url>;

/// Scene entry key looked up first. Existing workers publish the scene under
/// this spelling, so it takes precedence over [`SCENE_ENTRY`].
pub const LEGACY_SCENE_ENTRY: &str = "scene.gtlf";

/// Conventional scene entry of a zipped glTF export.
pub const SCENE_ENTRY: &str = "scene.gltf";

/// Default cap on what one archive may expand to.
const DEFAULT_MAX_EXTRACTED_BYTES: u64 = 512 * 1024 * 1024;

/// Default number of jobs that may wait for the worker.
const DEFAULT_QUEUE_DEPTH: usize = 16;

/// The URL the scene should be loaded from, if the archive has one.
pub fn scene_entry(files: &FileMap) -> Option<&Url> {
    files.get(LEGACY_SCENE_ENTRY).or_else(|| files.get(SCENE_ENTRY))
}

/// Unpacks an archive reachable at a URL into individually addressable files.
#[async_trait]
pub trait ArchiveUnpacker: Send + Sync {
    async fn unpack(&self, src: &Url) -> Result<FileMap, ArchiveError>;
}

/// Zip worker configuration.
#[derive(Debug, Clone)]
pub struct ZipWorkerConfig {
    /// Largest archive that will be downloaded, in bytes.
    pub max_archive_bytes: usize,
    /// Largest total size one archive may expand to on disk, in bytes.
    pub max_extracted_bytes: u64,
    /// Jobs that may queue before `unpack` waits for room.
    pub queue_depth: usize,
}

impl Default for ZipWorkerConfig {
    fn default() -> Self {
        Self {
            max_archive_bytes: 100 * 1024 * 1024,
            max_extracted_bytes: DEFAULT_MAX_EXTRACTED_BYTES,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

struct UnpackJob {
    src: Url,
    reply: oneshot::Sender<Result<FileMap, ArchiveError>>,
}

/// Handle to a background task that downloads and extracts zip archives.
///
/// Each job is extracted into its own directory under a scratch directory
/// owned by the task. A failed job's directory is removed right away; a
/// successful one stays, since the returned file URLs point into it, until
/// every handle is dropped and in-flight jobs have finished.
#[derive(Debug, Clone)]
pub struct ZipWorker {
    jobs: mpsc::Sender<UnpackJob>,
    scratch_dir: PathBuf,
}

impl ZipWorker {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(http: reqwest::Client, config: ZipWorkerConfig) -> Result<Self, ArchiveError> {
        let scratch = tempfile::Builder::new().prefix("mcp-media-").tempdir()?;
        let scratch_dir = scratch.path().to_path_buf();
        let (jobs, rx) = mpsc::channel(config.queue_depth.max(1));

        tokio::spawn(run_worker(rx, http, Arc::new(scratch), config));
        tracing::debug!("zip worker started, scratch dir {}", scratch_dir.display());

        Ok(Self { jobs, scratch_dir })
    }

    /// Directory the worker extracts into.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

#[async_trait]
impl ArchiveUnpacker for ZipWorker {
    async fn unpack(&self, src: &Url) -> Result<FileMap, ArchiveError> {
        let (reply, rx) = oneshot::channel();
        self.jobs
            .send(UnpackJob { src: src.clone(), reply })
            .await
            .map_err(|_| ArchiveError::WorkerGone)?;

        rx.await.map_err(|_| ArchiveError::WorkerGone)?
    }
}

async fn run_worker(
    mut jobs: mpsc::Receiver<UnpackJob>, http: reqwest::Client, scratch: Arc<TempDir>, config: ZipWorkerConfig,
) {
    let mut next_id: u64 = 0;

    while let Some(job) = jobs.recv().await {
        let id = next_id;
        next_id += 1;
        let http = http.clone();
        let scratch = Arc::clone(&scratch);
        let config = config.clone();

        tokio::spawn(async move {
            let dest = scratch.path().join(format!("job-{id}"));
            let result = unpack_zip(&http, &job.src, &dest, &config).await;

            match &result {
                Ok(files) => tracing::debug!("unpacked {} ({} files)", job.src, files.len()),
                Err(e) => tracing::warn!("failed to unpack {}: {}", job.src, e),
            }

            if job.reply.send(result).is_err() {
                tracing::debug!("unpack caller for {} went away", job.src);
            }
        });
    }

    tracing::debug!("zip worker stopped");
}

async fn unpack_zip(
    http: &reqwest::Client, src: &Url, dest: &Path, config: &ZipWorkerConfig,
) -> Result<FileMap, ArchiveError> {
    let max_bytes = config.max_archive_bytes as u64;

    let response = http
        .get(src.as_str())
        .send()
        .await
        .map_err(|e| ArchiveError::Download(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArchiveError::Download(format!("status {} fetching {}", status.as_u16(), src)));
    }

    if let Some(len) = response.content_length()
        && len > max_bytes
    {
        return Err(ArchiveError::TooLarge { size: len, max: max_bytes });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ArchiveError::Download(e.to_string()))?;

    if bytes.len() as u64 > max_bytes {
        return Err(ArchiveError::TooLarge { size: bytes.len() as u64, max: max_bytes });
    }

    let dest = dest.to_path_buf();
    let max_extracted = config.max_extracted_bytes;
    tokio::task::spawn_blocking(move || {
        let result = extract_archive(&bytes, &dest, max_extracted);
        if result.is_err()
            && let Err(e) = std::fs::remove_dir_all(&dest)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("failed to clean up {}: {}", dest.display(), e);
        }
        result
    })
    .await
    .map_err(|e| ArchiveError::Io(format!("extraction task failed: {e}")))?
}
