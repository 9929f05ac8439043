//! Command-line interface parsing for the `sponsors` tool
//!
//! This module handles parsing of CLI arguments using clap and turns them into a
//! `StartupConfig` describing which cache, clock and query to run.

use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::{LoaderConfig, DEFAULT_CATALOG_URL, GOLD_SPONSORS};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The `--at` value is not an RFC 3339 timestamp
    #[error("Invalid timestamp: '{0}'. Expected RFC 3339, e.g. 2024-03-15T01:10:00Z")]
    InvalidTimestamp(String),

    /// `--cache-dir` and `--no-cache` were both given
    #[error("--cache-dir cannot be combined with --no-cache")]
    ConflictingCache,
}

/// Show which sponsors are on rotation right now
#[derive(Parser, Debug)]
#[command(name = "sponsors")]
#[command(about = "Show the current sponsor banner and rotated sponsor tiers")]
#[command(version)]
pub struct Cli {
    /// Sponsor category to show
    #[arg(long, default_value = GOLD_SPONSORS)]
    pub category: String,

    /// Print the single banner sponsor for the current window instead of the tier
    #[arg(long)]
    pub banner: bool,

    /// Drop sponsors without a logo before rotating
    #[arg(long)]
    pub only_with_logo: bool,

    /// Catalog endpoint
    #[arg(long, default_value = DEFAULT_CATALOG_URL)]
    pub url: String,

    /// Directory for the catalog cache (defaults to the user cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Keep the catalog in memory only
    #[arg(long)]
    pub no_cache: bool,

    /// Evaluate the rotation at this instant instead of now
    ///
    /// Example: --at 2024-03-15T01:10:00Z
    #[arg(long, value_name = "RFC3339")]
    pub at: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Which query to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Single banner pick from a category
    Banner { category: String },
    /// Rotated listing of a category
    Tier {
        category: String,
        only_with_logo: bool,
    },
}

/// Where the catalog cache lives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CacheLocation {
    /// The per-user cache directory
    #[default]
    UserDefault,
    /// An explicit directory
    Dir(PathBuf),
    /// No persistence
    Memory,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub query: Query,
    pub cache: CacheLocation,
    pub loader: LoaderConfig,
    /// Fixed evaluation instant, if one was requested
    pub at: Option<DateTime<Utc>>,
}

/// Parses an `--at` argument.
///
/// Offsets other than `Z` are accepted and converted to UTC.
pub fn parse_at_arg(s: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CliError::InvalidTimestamp(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let query = if cli.banner {
            Query::Banner {
                category: cli.category.clone(),
            }
        } else {
            Query::Tier {
                category: cli.category.clone(),
                only_with_logo: cli.only_with_logo,
            }
        };

        let cache = match (&cli.cache_dir, cli.no_cache) {
            (Some(_), true) => return Err(CliError::ConflictingCache),
            (Some(dir), false) => CacheLocation::Dir(dir.clone()),
            (None, true) => CacheLocation::Memory,
            (None, false) => CacheLocation::UserDefault,
        };

        let at = cli.at.as_deref().map(parse_at_arg).transpose()?;

        Ok(StartupConfig {
            query,
            cache,
            loader: LoaderConfig {
                url: cli.url.clone(),
                ..LoaderConfig::default()
            },
            at,
        })
    }
}
