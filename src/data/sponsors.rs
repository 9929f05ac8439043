//! Sponsor catalog loader
//!
//! Fetches the sponsor catalog over HTTP and keeps it in a `CacheStore` for an hour.
//! Loading never fails from the caller's point of view: any problem is logged and
//! the caller gets an empty catalog.

use async_trait::async_trait;
use chrono::Duration;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::{Catalog, Sponsor, GOLD_SPONSORS};
use crate::cache::{CacheError, CacheStore};
use crate::clock::{Clock, SystemClock};
use crate::rotation::TimeKey;

/// Where the sponsor catalog is published
pub const DEFAULT_CATALOG_URL: &str = "https://sponsors.sauloalvarenga.dev.br/sponsors.json";

/// Cache key the catalog is stored under
pub const DEFAULT_CACHE_KEY: &str = "sponsors-list";

/// Cache TTL in hours
const CATALOG_CACHE_TTL_HOURS: i64 = 1;

/// Errors that can occur while refreshing the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Failed to get sponsors: server returned {0}")]
    Status(StatusCode),

    /// Body was not a valid catalog
    #[error("Failed to parse sponsor catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Storing the fetched catalog failed
    #[error("Failed to cache sponsor catalog: {0}")]
    Cache(#[from] CacheError),
}

/// Settings for a `SponsorsClient`
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Catalog endpoint used by `HttpFetcher`
    pub url: String,
    /// Cache key the catalog is stored under
    pub cache_key: String,
    /// How long a fetched catalog stays valid
    pub ttl: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            ttl: Duration::hours(CATALOG_CACHE_TTL_HOURS),
        }
    }
}

/// Source of fresh catalogs
///
/// `Ok(None)` means the source answered but had nothing (a JSON `null` body).
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Option<Catalog>, CatalogError>;
}

/// Fetches the catalog with a plain HTTP GET
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// HTTP client for making requests
    http_client: Client,
    /// Endpoint returning the catalog JSON
    url: String,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

#[async_trait]
impl CatalogFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Option<Catalog>, CatalogError> {
        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Cache-aside loader for the sponsor catalog plus the rotation queries built on it
///
/// The cache store, fetcher and clock are all supplied by the caller so each can be
/// swapped for a fake.
#[derive(Debug, Clone)]
pub struct SponsorsClient<S, F, C = SystemClock> {
    cache: S,
    fetcher: F,
    clock: C,
    config: LoaderConfig,
}

impl<S: CacheStore> SponsorsClient<S, HttpFetcher, SystemClock> {
    /// Creates a client that fetches `config.url` and reads the system clock
    pub fn with_http(cache: S, config: LoaderConfig) -> Self {
        let fetcher = HttpFetcher::new(config.url.clone());
        Self::new(cache, fetcher, SystemClock, config)
    }
}

impl<S, F, C> SponsorsClient<S, F, C>
where
    S: CacheStore,
    F: CatalogFetcher,
    C: Clock,
{
    pub fn new(cache: S, fetcher: F, clock: C, config: LoaderConfig) -> Self {
        Self {
            cache,
            fetcher,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Rotation key for the client's current instant
    pub fn time_key(&self) -> TimeKey {
        TimeKey::at(self.clock.now())
    }

    /// Returns the sponsor catalog
    ///
    /// # Behavior
    /// - Returns the cached catalog if one is stored and unexpired
    /// - Otherwise fetches a fresh one and caches it for `config.ttl`
    /// - A missing or empty catalog from the source is returned as-is, uncached
    /// - Any failure (network, status, parse, cache write) yields an empty catalog
    pub async fn load_catalog(&self) -> Catalog {
        let key = self.config.cache_key.as_str();

        if let Some(catalog) = self.cache.get_at::<Catalog>(key, self.clock.now()) {
            tracing::debug!(key, "sponsor catalog served from cache");
            return catalog;
        }

        tracing::debug!(key, "sponsor catalog cache miss");
        match self.refresh().await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load sponsor catalog");
                Catalog::default()
            }
        }
    }

    /// Fetches the catalog and stores it if it has any content
    async fn refresh(&self) -> Result<Catalog, CatalogError> {
        let catalog = match self.fetcher.fetch().await? {
            Some(catalog) if !catalog.is_empty() => catalog,
            _ => {
                tracing::debug!("sponsor source returned no catalog");
                return Ok(Catalog::default());
            }
        };

        let until = self.clock.now() + self.config.ttl;
        self.cache.set(&self.config.cache_key, &catalog, Some(until))?;
        tracing::debug!(categories = catalog.len(), %until, "sponsor catalog cached");

        Ok(catalog)
    }

    /// The gold sponsor whose banner should be shown right now, if any has one
    pub async fn current_gold_sponsor(&self) -> Option<Sponsor> {
        self.current_banner_sponsor(GOLD_SPONSORS).await
    }

    /// The bannered sponsor from `category` for the current window
    ///
    /// The window is fixed before loading, so a slow fetch can't move it.
    pub async fn current_banner_sponsor(&self, category: &str) -> Option<Sponsor> {
        let key = self.time_key();
        self.current_banner_sponsor_at(category, key).await
    }

    /// The bannered sponsor from `category` for the window `key`
    ///
    /// Only selection uses `key`; cache expiry still follows the client's clock.
    pub async fn current_banner_sponsor_at(&self, category: &str, key: TimeKey) -> Option<Sponsor> {
        let catalog = self.load_catalog().await;
        catalog.banner_sponsor(category, key).cloned()
    }

    /// Sponsors from `category` rotated for the current window
    pub async fn rotated_sponsors(&self, category: &str, only_with_logo: bool) -> Vec<Sponsor> {
        let key = self.time_key();
        self.rotated_sponsors_at(category, only_with_logo, key).await
    }

    /// Sponsors from `category` rotated for the window `key`
    pub async fn rotated_sponsors_at(
        &self,
        category: &str,
        only_with_logo: bool,
        key: TimeKey,
    ) -> Vec<Sponsor> {
        let catalog = self.load_catalog().await;
        catalog.rotated(category, only_with_logo, key)
    }
}
