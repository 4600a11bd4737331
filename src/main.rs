//! Sumi-Glean main entry point
//!
//! This is the command-line interface for the Sumi-Glean item gatherer.

use clap::Parser;
use std::path::PathBuf;
use sumi_glean::config::{load_config, Config};
use sumi_glean::crawler::crawl;
use sumi_glean::output::{format_failures, print_report, print_statistics, CrawlStatistics};
use sumi_glean::GleanError;
use tracing_subscriber::EnvFilter;

/// Sumi-Glean: a concurrent item gatherer
///
/// Sumi-Glean fetches every seed page concurrently and gathers the items
/// (id, image, link, title) found in their markup.
#[derive(Parser, Debug)]
#[command(name = "sumi-glean")]
#[command(version)]
#[command(about = "A concurrent item gatherer", long_about = None)]
struct Cli {
    /// Seed URLs to crawl
    #[arg(value_name = "SEEDS")]
    seeds: Vec<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print run statistics after the item listing
    #[arg(long)]
    stats: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(GleanError::Config(e).into());
                }
            }
        }
        None => Config::default(),
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.seeds);
        return Ok(());
    }

    let report = crawl(config, cli.seeds).await?;
    print_report(&report);

    if cli.stats {
        print_statistics(&CrawlStatistics::from_report(&report));
        print!("{}", format_failures(&report));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_glean=info,warn"),
            1 => EnvFilter::new("sumi_glean=debug,info"),
            2 => EnvFilter::new("sumi_glean=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config, cli_seeds: &[String]) {
    println!("=== Sumi-Glean Dry Run ===\n");

    println!("Fetch:");
    println!("  User agent: {}", config.fetch.user_agent);
    match config.fetch.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    println!("  Connect timeout: {}s", config.fetch.connect_timeout_secs);

    println!("\nMatcher:");
    println!(
        "  Container: <{} {}=...>",
        config.matcher.container_tag, config.matcher.label_attr
    );
    println!(
        "  Image: <{} {}=... />",
        config.matcher.image_tag, config.matcher.source_attr
    );
    println!(
        "  Link: <{} {}=\"{}...\">",
        config.matcher.anchor_tag, config.matcher.reference_attr, config.matcher.absolute_prefix
    );

    println!("\nCrawl:");
    println!("  Item buffer: {}", config.crawl.item_buffer);

    let seed_count = cli_seeds.len() + config.crawl.seeds.len();
    println!("\nSeeds ({}):", seed_count);
    for seed in cli_seeds.iter().chain(&config.crawl.seeds) {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start {} workers", seed_count);
}
