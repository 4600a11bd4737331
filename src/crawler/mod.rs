//! Crawler module for concurrent page fetching and item extraction
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching and error classification
//! - Per-seed workers that stream page bodies through the extractor
//! - Fan-out/fan-in coordination of all workers

mod coordinator;
mod fetcher;
mod worker;

pub use coordinator::{run_crawl, Coordinator, CrawlReport, SeedFailure};
pub use fetcher::{body_encoding, build_http_client, charset_from_content_type, fetch_page};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// Seeds given by the caller come first, followed by any seeds listed in the
/// configuration. Each seed gets its own worker.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seeds` - Seed URLs in addition to `config.crawl.seeds`
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed; failed seeds are listed in the report
/// * `Err(GleanError)` - Crawl could not be started
pub async fn crawl(config: Config, seeds: Vec<String>) -> Result<CrawlReport> {
    let mut all_seeds = seeds;
    all_seeds.extend(config.crawl.seeds.iter().cloned());
    run_crawl(config, &all_seeds).await
}
