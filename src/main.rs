//! Sponsors CLI - print the sponsors on rotation right now
//!
//! Loads the sponsor catalog (cached for an hour) and prints either the current
//! banner sponsor or a rotated sponsor tier.

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sponsor_rotation::cache::{CacheManager, CacheStore, MemoryCache};
use sponsor_rotation::cli::{CacheLocation, Cli, Query, StartupConfig};
use sponsor_rotation::data::{HttpFetcher, LoaderConfig, Sponsor, SponsorsClient};
use sponsor_rotation::rotation::TimeKey;

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("sponsor_rotation=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sponsor_rotation=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Formats one sponsor as a single output line
fn describe(sponsor: &Sponsor) -> String {
    let mut line = format!("{} <{}>", sponsor.name, sponsor.url);
    if let Some(banner) = sponsor.banner.as_deref().filter(|_| sponsor.has_banner()) {
        line.push_str(&format!(" banner={}", banner));
    }
    if let Some(logo) = sponsor.logo.as_deref().filter(|_| sponsor.has_logo()) {
        line.push_str(&format!(" logo={}", logo));
    }
    line
}

/// Runs the requested query and prints the result
///
/// `key` only chooses the rotation window; the cache keeps using the wall clock.
async fn run<S: CacheStore>(cache: S, loader: LoaderConfig, query: &Query, key: TimeKey) {
    let client: SponsorsClient<S, HttpFetcher> = SponsorsClient::with_http(cache, loader);
    tracing::debug!(day_seed = key.day_seed, slot = key.slot, "rotation window");

    match query {
        Query::Banner { category } => match client.current_banner_sponsor_at(category, key).await {
            Some(sponsor) => println!("{}", describe(&sponsor)),
            None => println!("No sponsor banner available"),
        },
        Query::Tier {
            category,
            only_with_logo,
        } => {
            let sponsors = client
                .rotated_sponsors_at(category, *only_with_logo, key)
                .await;
            if sponsors.is_empty() {
                println!("No sponsors in '{}'", category);
            }
            for (position, sponsor) in sponsors.iter().enumerate() {
                println!("{:>3}. {}", position + 1, describe(sponsor));
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = StartupConfig::from_cli(&cli)?;
    tracing::debug!("starting with {:?}", config);

    let key = config.at.map(TimeKey::at).unwrap_or_else(|| TimeKey::at(Utc::now()));

    let disk = match config.cache {
        CacheLocation::Dir(dir) => Some(CacheManager::with_dir(dir)),
        CacheLocation::UserDefault => {
            let manager = CacheManager::new();
            if manager.is_none() {
                tracing::warn!("no user cache directory, catalog will not be persisted");
            }
            manager
        }
        CacheLocation::Memory => None,
    };

    match disk {
        Some(cache) => {
            tracing::debug!(dir = %cache.dir().display(), "using disk cache");
            run(cache, config.loader, &config.query, key).await
        }
        None => run(MemoryCache::new(), config.loader, &config.query, key).await,
    }

    Ok(())
}
