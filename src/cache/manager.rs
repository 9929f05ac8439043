//! Disk-backed cache store
//!
//! Provides a `CacheManager` that stores serializable data to JSON files with
//! optional expiry timestamps, one file per key.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{decode_entry, encode_entry, CacheError, CacheStore};

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/sponsor-rotation/` on Linux). Files outlive the process, so a later run
/// reuses a catalog fetched by an earlier one until it expires.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "sponsor-rotation")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory this manager reads from and writes to
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

impl CacheStore for CacheManager {
    /// Reads data from the cache
    ///
    /// Returns `None` if the file doesn't exist, cannot be parsed, or has expired.
    fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let content = fs::read_to_string(self.cache_path(key)).ok()?;
        decode_entry(key, &content, now)
    }

    /// Writes data to the cache, creating the directory if needed
    fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), CacheError> {
        let json = encode_entry(value, until)?;
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(self.cache_path(key), json)?;
        Ok(())
    }
}
