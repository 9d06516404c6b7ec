use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;
use url::Url;

use crate::error::WriteError;

const FEED_EXTENSION: &str = "xml";

/// Derive the output filename from the last path segment of the program URL
pub fn feed_filename(program_url: &Url) -> Result<String, WriteError> {
    let segment = program_url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .ok_or_else(|| WriteError::NoFilename(program_url.to_string()))?;

    let stem = sanitize_filename::sanitize(segment);
    if stem.is_empty() {
        return Err(WriteError::NoFilename(program_url.to_string()));
    }

    Ok(format!("{stem}.{FEED_EXTENSION}"))
}

/// A file that only appears at its destination once committed
///
/// Content goes to a hidden temporary file in the destination's directory.
/// `commit` flushes and syncs it, then renames it over the destination.
/// Dropping an uncommitted `AtomicFile` deletes the temporary file and leaves
/// the destination untouched.
pub struct AtomicFile {
    temp: NamedTempFile,
    destination: PathBuf,
}

impl AtomicFile {
    pub fn create(destination: &Path) -> Result<Self, WriteError> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !dir.is_dir() {
            return Err(WriteError::DirectoryNotFound(dir));
        }

        let temp = tempfile::Builder::new()
            .prefix(".tmp-")
            .suffix(&format!(".{FEED_EXTENSION}"))
            .tempfile_in(&dir)
            .map_err(|e| WriteError::TempFileFailed { dir, source: e })?;

        Ok(Self {
            temp,
            destination: destination.to_path_buf(),
        })
    }

    pub fn write_all(&mut self, contents: &[u8]) -> Result<(), WriteError> {
        self.temp
            .write_all(contents)
            .map_err(|e| WriteError::WriteFailed {
                path: self.temp.path().to_path_buf(),
                source: e,
            })
    }

    /// Flush, sync and move the file into place
    pub fn commit(mut self) -> Result<PathBuf, WriteError> {
        let temp_path = self.temp.path().to_path_buf();
        let write_failed = |e| WriteError::WriteFailed {
            path: temp_path.clone(),
            source: e,
        };

        self.temp.flush().map_err(write_failed)?;
        self.temp.as_file().sync_all().map_err(write_failed)?;

        self.temp
            .persist(&self.destination)
            .map_err(|e| WriteError::PersistFailed {
                path: self.destination.clone(),
                source: e.error,
            })?;

        Ok(self.destination)
    }
}

/// Atomically replace `destination` with `contents`
pub fn write_atomic(destination: &Path, contents: &str) -> Result<PathBuf, WriteError> {
    let mut file = AtomicFile::create(destination)?;
    file.write_all(contents.as_bytes())?;
    let path = file.commit()?;

    info!(path = %path.display(), bytes = contents.len(), "feed written");
    Ok(path)
}
