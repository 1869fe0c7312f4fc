//! Local cache entry handling.
//!
//! Exactly one on-disk file represents the cached image for a resolver
//! instance. Its modification time is the sole freshness signal; there is no
//! checksum, no index, no eviction. Downloads land in a temporary file next
//! to the target and are renamed into place on success only, so an
//! interrupted transfer never replaces or truncates a previous cache entry.

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;


/// Explicit cache addressing mode.
///
/// A `File` target caches the image in place at that exact path; a
/// `Directory` target caches it under `<dir>/<identifier>`. The mode is
/// chosen when the resolver is configured, not inferred again at each call,
/// so a path that later becomes a directory does not silently change
/// behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheTarget {
    /// Cache the image at exactly this path
    File(PathBuf),
    /// Cache the image under this directory, named by its identifier
    Directory(PathBuf),
}

impl CacheTarget {
    /// Picks the addressing mode from the current filesystem state: an
    /// existing directory caches per identifier, anything else is treated
    /// as a file target.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::CacheTarget;
    ///
    /// let target = CacheTarget::detect("/nonexistent/image.qcow2");
    /// assert!(matches!(target, CacheTarget::File(_)));
    /// ```
    pub fn detect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Directory(path)
        } else {
            Self::File(path)
        }
    }

    /// Returns the effective cache path for an image identifier.
    pub fn image_path(&self, identifier: &str) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::Directory(dir) => dir.join(identifier),
        }
    }

    /// Returns the configured base path.
    pub fn base(&self) -> &Path {
        match self {
            Self::File(path) | Self::Directory(path) => path,
        }
    }
}

/// Checks whether a cache file at `path` is fresh against the remote
/// `updated_at` timestamp.
///
/// Fresh means: a regular file exists and its modification time, in whole
/// seconds since the epoch, is strictly greater than the remote timestamp.
/// A missing file is simply stale; any other metadata failure propagates.
pub fn is_fresh(path: &Path, remote_updated_at: DateTime<Utc>) -> Result<bool> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_file() {
        return Ok(false);
    }

    let mtime = metadata.modified()?;
    let mtime_secs = match mtime.duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_secs() as i64,
        // mtime before the epoch is older than any catalog timestamp
        Err(_) => return Ok(false),
    };

    Ok(mtime_secs > remote_updated_at.timestamp())
}

/// Streams `reader` to `path`, atomically.
///
/// Bytes are written in delivery order to `<path>.partial` in the same
/// directory, then renamed over `path` once the stream ends cleanly. On any
/// read or write failure the partial file is removed and the previous cache
/// entry (if any) is left untouched. Returns the number of bytes written.
pub fn write_stream(path: &Path, reader: &mut impl Read) -> Result<u64> {
    let partial_path = partial_path(path);

    let mut file = fs::File::create(&partial_path)?;
    let written = match io::copy(reader, &mut file) {
        Ok(written) => written,
        Err(e) => {
            drop(file);
            let _ = fs::remove_file(&partial_path);
            return Err(e.into());
        }
    };
    drop(file);

    fs::rename(&partial_path, path)?;

    Ok(written)
}

/// Returns the temporary download path next to a cache path.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
