//! Catalog-Walker main entry point
//!
//! This is the command-line interface for the Catalog-Walker catalog crawler.

use anyhow::{bail, Context};
use catalog_walker::config::{load_config_with_hash, Config};
use catalog_walker::output::{
    build_sinks, load_statistics, print_statistics, print_summary, write_summary,
};
use catalog_walker::storage::SqliteStorage;
use catalog_walker::Coordinator;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Walker: a category-tree catalog crawler
///
/// Catalog-Walker descends a catalog's category tree from its root pages,
/// limited to an allow-list of top-level categories, follows each listing's
/// "next" links and records every item it reaches together with the
/// category path it was found under.
#[derive(Parser, Debug)]
#[command(name = "catalog-walker")]
#[command(version)]
#[command(about = "A category-tree catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the latest run from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so JSON lines on stdout stay machine-readable.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_walker=info,warn"),
            1 => EnvFilter::new("catalog_walker=debug,info"),
            2 => EnvFilter::new("catalog_walker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Catalog-Walker Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!(
        "  Retries: {} (backoff {}ms doubling, max {}ms)",
        config.crawler.max_retries,
        config.crawler.retry_base_delay_ms,
        config.crawler.retry_max_delay_ms
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nSeeds ({}):", config.catalog.seeds.len());
    for seed in &config.catalog.seeds {
        println!("  - {}", seed);
    }

    println!(
        "\nAllowed Categories ({}):",
        config.catalog.allowed_categories.len()
    );
    for category in &config.catalog.allowed_categories {
        println!("  - {}", category);
    }

    println!(
        "\nPagination markers: previous = {:?}, next = {:?}",
        config.catalog.previous_marker, config.catalog.next_marker
    );

    println!("\nOutput:");
    match (&config.output.jsonl_path, &config.output.database_path) {
        (None, None) => println!("  JSON lines: stdout"),
        (jsonl, database) => {
            if let Some(path) = jsonl {
                println!("  JSON lines: {}", path);
            }
            if let Some(path) = database {
                println!("  Database: {}", path);
            }
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling from {} seed URLs",
        config.catalog.seeds.len()
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let Some(database_path) = &config.output.database_path else {
        bail!("--stats requires [output] database-path in the configuration");
    };

    println!("Database: {}\n", database_path);

    let storage = SqliteStorage::new(Path::new(database_path))
        .with_context(|| format!("Failed to open database {}", database_path))?;

    match load_statistics(&storage)? {
        Some(stats) => print_statistics(&stats),
        None => println!("No crawl runs recorded yet."),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, allowed categories: {}",
        config.catalog.seeds.len(),
        config.catalog.allowed_categories.len()
    );

    let mut sinks = build_sinks(&config.output, config_hash)?;
    let mut coordinator = Coordinator::with_http(config)?;

    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight fetches");
            token.cancel();
        }
    });

    match coordinator.run(&mut sinks).await {
        Ok(summary) => {
            if !summary.interrupted {
                tracing::info!("Crawl completed successfully");
            }
            // Items stream to stdout when no output is configured
            if config.output.jsonl_path.is_none() && config.output.database_path.is_none() {
                write_summary(&mut std::io::stderr(), &summary)?;
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
