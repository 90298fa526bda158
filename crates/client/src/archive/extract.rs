//! Zip extraction onto the local filesystem.
//!
//! Blocking; run it on the blocking pool.

use std::fs::{self, File};
use std::io::{self, Cursor, Read};
use std::path::Path;

use url::Url;
use zip::ZipArchive;

use super::{ArchiveError, FileMap};

/// Extract every file entry of `bytes` under `dest` and map entry names to
/// `file://` URLs.
///
/// Directory entries are skipped. Entries whose names would land outside
/// `dest` (absolute paths, `..` components) fail the whole extraction, as
/// does writing more than `max_bytes` in total. Sizes declared in the zip
/// headers are not trusted; bytes are counted as they are inflated.
pub fn extract_archive(bytes: &[u8], dest: &Path, max_bytes: u64) -> Result<FileMap, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut files = FileMap::new();
    let mut written: u64 = 0;

    fs::create_dir_all(dest)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let relative = entry.enclosed_name().ok_or_else(|| ArchiveError::UnsafeEntry(name.clone()))?;
        let out_path = dest.join(relative);

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let remaining = max_bytes - written;
        let mut out = File::create(&out_path)?;
        let copied = io::copy(&mut (&mut entry).take(remaining.saturating_add(1)), &mut out)?;
        if copied > remaining {
            return Err(ArchiveError::TooLarge { size: written.saturating_add(copied), max: max_bytes });
        }
        written += copied;

        let url = Url::from_file_path(&out_path)
            .map_err(|_| ArchiveError::Io(format!("cannot build file URL for {}", out_path.display())))?;
        files.insert(name, url);
    }

    tracing::debug!("extracted {} files into {}", files.len(), dest.display());

    Ok(files)
}

/// Build an in-memory zip with stored (uncompressed) entries. Names ending in
/// `/` become directory entries.
#[cfg(test)]
pub(crate) fn build_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_test_zip_with(entries, zip::CompressionMethod::Stored)
}

#[cfg(test)]
pub(crate) fn build_test_zip_with(entries: &[(&str, &[u8])], method: zip::CompressionMethod) -> Vec<u8> {
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(method);
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}
