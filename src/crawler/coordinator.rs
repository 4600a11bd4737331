//! Crawler coordinator - fan-out/fan-in of seed workers
//!
//! This module starts one worker per seed and gathers their results, including:
//! - Spawning every worker on the multi-threaded runtime
//! - Collecting items from the shared item channel in arrival order
//! - Counting completion signals until every worker is done
//! - Recording per-seed failures without stopping the run
//!
//! The coordinator is the only owner of the result collection; workers only send messages.

use crate::config::Config;
use crate::crawler::build_http_client;
use crate::crawler::worker::{run_worker, WorkerDone};
use crate::extractor::Item;
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// A seed that contributed no (or only some) items because of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub seed: String,
    pub error: String,
}

/// Everything gathered by one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Items in the order they reached the coordinator
    pub items: Vec<Item>,

    /// Seeds that failed, in the order their workers finished
    pub failures: Vec<SeedFailure>,

    /// Number of workers started (one per seed)
    pub workers: usize,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of seeds whose worker finished without error
    pub fn succeeded(&self) -> usize {
        self.workers - self.failures.len()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(GleanError)` - Failed to build the HTTP client
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.fetch)?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Crawls every seed concurrently and returns once all workers are done
    ///
    /// Seed failures are recorded in the report and never abort the run. There is no
    /// overall timeout: the run ends when every worker has signalled completion.
    pub async fn run(&self, seeds: &[String]) -> CrawlReport {
        let start_time = Instant::now();
        let workers = seeds.len();
        tracing::info!("Starting crawl of {} seed URLs", workers);

        let (item_tx, mut item_rx) = mpsc::channel::<Item>(self.config.crawl.item_buffer);
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<WorkerDone>();

        for seed in seeds {
            tokio::spawn(run_worker(
                self.client.clone(),
                seed.clone(),
                self.config.matcher.clone(),
                item_tx.clone(),
                done_tx.clone(),
            ));
        }
        drop(done_tx);

        let mut items = Vec::new();
        let mut failures = Vec::new();
        let mut finished = 0;

        while finished < workers {
            tokio::select! {
                Some(item) = item_rx.recv() => items.push(item),
                Some(done) = done_rx.recv() => {
                    finished += 1;
                    if let Err(e) = done.outcome {
                        failures.push(SeedFailure {
                            seed: done.seed,
                            error: e.to_string(),
                        });
                    }
                    tracing::debug!("Workers finished: {}/{}", finished, workers);
                }
                else => break,
            }
        }

        // Items may still be buffered behind the last completion signals; the channel
        // closes once every worker's sender is gone.
        drop(item_tx);
        while let Some(item) = item_rx.recv().await {
            items.push(item);
        }

        let report = CrawlReport {
            items,
            failures,
            workers,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} items from {} seeds ({} failed) in {:?}",
            report.item_count(),
            report.workers,
            report.failures.len(),
            report.elapsed
        );

        report
    }
}

/// Runs a crawl over the given seeds
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seeds` - Seed URLs, one worker each
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran (individual seeds may still have failed)
/// * `Err(GleanError)` - The crawl could not start
///
/// # Example
///
/// ```no_run
/// use sumi_glean::config::Config;
/// use sumi_glean::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seeds = vec!["https://example.com/".to_string()];
/// let report = run_crawl(Config::default(), &seeds).await?;
/// println!("Found {} items", report.item_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, seeds: &[String]) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run(seeds).await)
}
