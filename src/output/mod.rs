//! Output module for presenting crawl results
//!
//! This module handles:
//! - Rendering the item listing (id, link, title per line)
//! - Listing seeds that could not be crawled (with `--stats`)
//! - Printing run statistics

pub mod stats;
mod summary;

pub use stats::{print_statistics, CrawlStatistics};
pub use summary::{format_failures, format_report, print_report};
