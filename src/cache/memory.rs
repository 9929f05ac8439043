//! In-memory cache store
//!
//! Keeps the same serialized records as `CacheManager` but only for the lifetime
//! of the value. Used when no cache directory is available and as a test double.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{decode_entry, encode_entry, CacheError, CacheStore};

/// Cache store backed by a shared map of serialized records
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw record under `key`, bypassing serialization
    pub fn insert_raw(&self, key: &str, raw: impl Into<String>) {
        self.lock().insert(key.to_string(), raw.into());
    }

    /// Returns the raw record stored under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds complete records.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStore for MemoryCache {
    fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let raw = self.raw(key)?;
        decode_entry(key, &raw, now)
    }

    fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        until: Option<DateTime<Utc>>,
    ) -> Result<(), CacheError> {
        let raw = encode_entry(value, until)?;
        self.insert_raw(key, raw);
        Ok(())
    }
}
