//! Sponsor data model
//!
//! The remote dataset is a JSON object mapping a category name (e.g. `"gold-sponsors"`)
//! to an ordered list of sponsors. Order within a category drives rotation.

pub mod sponsors;

pub use sponsors::{
    CatalogError, CatalogFetcher, HttpFetcher, LoaderConfig, SponsorsClient, DEFAULT_CACHE_KEY,
    DEFAULT_CATALOG_URL,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rotation::{self, TimeKey};

/// Category whose bannered sponsors feed the page banner
pub const GOLD_SPONSORS: &str = "gold-sponsors";

/// A single sponsor record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    /// Display name
    pub name: String,
    /// Account identifier, if the sponsor has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Link target when the sponsor is clicked; empty if the record has none
    #[serde(default)]
    pub url: String,
    /// Logo image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Banner image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl Sponsor {
    /// Whether the sponsor has a non-empty logo reference
    pub fn has_logo(&self) -> bool {
        self.logo.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Whether the sponsor has a non-empty banner reference
    pub fn has_banner(&self) -> bool {
        self.banner.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Sponsors grouped by category
///
/// A category present in the JSON as `null` reads the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(HashMap<String, Option<Vec<Sponsor>>>);

impl Catalog {
    /// Builds a catalog from `(category, sponsors)` pairs
    pub fn from_categories<I, K>(categories: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Sponsor>)>,
        K: Into<String>,
    {
        Self(
            categories
                .into_iter()
                .map(|(name, sponsors)| (name.into(), Some(sponsors)))
                .collect(),
        )
    }

    /// Sponsors listed under `name`, in dataset order
    pub fn category(&self, name: &str) -> &[Sponsor] {
        self.0
            .get(name)
            .and_then(|sponsors| sponsors.as_deref())
            .unwrap_or(&[])
    }

    /// Names of all categories, in no particular order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bannered sponsor from `category` to show during the window `key`
    pub fn banner_sponsor(&self, category: &str, key: TimeKey) -> Option<&Sponsor> {
        let eligible: Vec<&Sponsor> = self
            .category(category)
            .iter()
            .filter(|sponsor| sponsor.has_banner())
            .collect();
        rotation::pick(&eligible, key).copied()
    }

    /// Sponsors from `category` reordered for the window `key`
    ///
    /// With `only_with_logo`, sponsors lacking a logo are dropped before rotating.
    pub fn rotated(&self, category: &str, only_with_logo: bool, key: TimeKey) -> Vec<Sponsor> {
        let sponsors = self.category(category);
        if only_with_logo {
            let eligible: Vec<Sponsor> =
                sponsors.iter().filter(|s| s.has_logo()).cloned().collect();
            rotation::rotate(&eligible, key)
        } else {
            rotation::rotate(sponsors, key)
        }
    }
}
