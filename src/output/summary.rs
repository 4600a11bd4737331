use crate::crawler::CrawlReport;
use std::fmt::Write;

/// Renders the item listing: a count line followed by `id, page_ref, title` per item
///
/// The image reference is kept on each item but not listed.
///
/// # Example
///
/// ```
/// use sumi_glean::crawler::CrawlReport;
/// use sumi_glean::output::format_report;
///
/// let report = CrawlReport::default();
/// assert_eq!(format_report(&report), "\nFound 0 items:\n");
/// ```
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nFound {} items:", report.item_count());
    for item in &report.items {
        let _ = writeln!(out, "{}, {}, {}", item.id(), item.page_ref(), item.title());
    }
    out
}

/// Renders the seeds that failed, or an empty string when none did
///
/// Failed seeds are already reported as they happen, so the plain listing leaves this out.
pub fn format_failures(report: &CrawlReport) -> String {
    if report.failures.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "\nUnreachable seeds ({}):", report.failures.len());
    for failure in &report.failures {
        let _ = writeln!(out, "  - {} ({})", failure.seed, failure.error);
    }
    out
}

/// Prints the item listing to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
