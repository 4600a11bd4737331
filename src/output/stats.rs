//! Run statistics derived from a crawl report

use crate::crawler::CrawlReport;
use std::collections::HashSet;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Number of seeds crawled (one worker each)
    pub seeds: usize,

    /// Seeds whose worker finished without error
    pub succeeded: usize,

    /// Seeds that failed
    pub failed: usize,

    /// Total items gathered
    pub items: usize,

    /// Items with a distinct link; the crawler itself does not deduplicate
    pub distinct_links: usize,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn from_report(report: &CrawlReport) -> Self {
        let distinct_links = report
            .items
            .iter()
            .map(|item| item.page_ref())
            .collect::<HashSet<_>>()
            .len();

        Self {
            seeds: report.workers,
            succeeded: report.succeeded(),
            failed: report.failures.len(),
            items: report.item_count(),
            distinct_links,
            elapsed: report.elapsed,
        }
    }

    /// Items gathered per second of wall-clock time
    pub fn items_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.items as f64 / secs
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("\n=== Crawl Statistics ===");
    println!("  Seeds: {} ({} ok, {} failed)", stats.seeds, stats.succeeded, stats.failed);
    println!("  Items: {} ({} distinct links)", stats.items, stats.distinct_links);
    println!(
        "  Elapsed: {:.2}s ({:.1} items/sec)",
        stats.elapsed.as_secs_f64(),
        stats.items_per_second()
    );
}
