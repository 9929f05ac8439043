//! Cache module for storing the sponsor catalog between runs
//!
//! Entries are stored as `{ "data": ..., "until": ... }` records. An entry without
//! `until` never expires; an entry with one is valid only while `until` is strictly
//! in the future. Expiry is checked lazily on every read and nothing is ever pruned:
//! stale records sit in the backing medium until the next `set` overwrites them.
//! That is fine for the handful of fixed keys this crate writes, but a store with
//! unbounded keys would need a sweep.

mod manager;
mod memory;

pub use manager::CacheManager;
pub use memory::MemoryCache;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when writing to a cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Creating the cache directory or writing the file failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value could not be serialized to JSON
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Record persisted for every key
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Absolute expiry; `None` means the entry never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl<T> CacheEntry<T> {
    /// Whether the entry may still be served at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.until {
            None => true,
            Some(until) => now < until,
        }
    }
}

/// A key/value store with optional per-entry expiry
///
/// Reads never fail: a missing, expired or unparseable entry is simply absent.
pub trait CacheStore {
    /// Reads `key`, judging validity against `now`
    fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T>;

    /// Serializes `value` under `key`, replacing whatever was there
    fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), CacheError>;

    /// Reads `key`, judging validity against the wall clock
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }
}

/// Decodes a stored record, returning the payload if it is still valid at `now`
///
/// Malformed records are logged and treated as a miss.
pub(crate) fn decode_entry<T: DeserializeOwned>(
    key: &str,
    raw: &str,
    now: DateTime<Utc>,
) -> Option<T> {
    let entry: CacheEntry<T> = match serde_json::from_str(raw) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed cache entry");
            return None;
        }
    };

    if entry.is_valid_at(now) {
        Some(entry.data)
    } else {
        tracing::debug!(key, "cache entry expired");
        None
    }
}

/// Encodes a record for storage
pub(crate) fn encode_entry<T: Serialize>(
    value: &T,
    until: Option<DateTime<Utc>>,
) -> Result<String, CacheError> {
    let entry = CacheEntry { data: value, until };
    Ok(serde_json::to_string_pretty(&entry)?)
}
