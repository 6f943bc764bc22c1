//! Operator tool for the handle availability cache.
//!
//! Reports cache/store drift, runs the startup-style conditional seed,
//! forces a full rebuild, or clears the cache.
//!
//! Usage: seed-handles --database <path> [--redis-url <url>] <COMMAND>

use account_sqlite_store::SqliteAccountStore;
use anyhow::Context;
use clap::{Parser, Subcommand};
use handle_cache::RedisAvailabilityCache;
use handle_claim::{AccountStore, ClaimConfig, Seeder};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Reconcile the handle availability cache against the account store.
#[derive(Parser)]
#[command(name = "seed-handles")]
#[command(about = "Reconcile the handle availability cache against the account store")]
#[command(version)]
struct Cli {
    /// Redis connection URL.
    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Path to the accounts SQLite database.
    #[arg(long, env = "ACCOUNTS_DB")]
    database: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print cache and store counts and whether they have drifted.
    Status,
    /// Reseed only if the cache has drifted (what startup does).
    Seed,
    /// Clear the cache and fully rebuild it from the store.
    Reseed,
    /// Clear the cache without rebuilding.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = ClaimConfig::from_env();

    let store = Arc::new(
        SqliteAccountStore::open(&cli.database, config.temp_handle_prefix.clone())
            .await
            .context("failed to open account store")?,
    );
    let cache = Arc::new(
        RedisAvailabilityCache::connect(&cli.redis_url, config.set_key.clone())
            .await
            .context("failed to connect to Redis")?,
    );

    let seeder = Seeder::new(store.clone(), cache, &config);

    match cli.command {
        Command::Status => {
            let cache_count = seeder.cache_count().await?;
            let store_count = store.count_permanent().await?;
            let drifted = cache_count != store_count;

            println!("cache:  {cache_count}");
            println!("store:  {store_count}");
            println!("drift:  {}", if drifted { "yes" } else { "no" });
        }
        Command::Seed => {
            seeder.seed_if_needed().await?;
            println!("✓ Cache is in sync ({} handles)", seeder.cache_count().await?);
        }
        Command::Reseed => {
            info!("Starting forced reseed");
            let started = Instant::now();

            seeder.reseed().await?;

            let count = seeder.cache_count().await?;
            println!(
                "✓ Seeded {count} handles in {:?}",
                started.elapsed()
            );
        }
        Command::Clear => {
            seeder.clear_cache().await?;
            println!("✓ Cache cleared");
        }
    }

    Ok(())
}
