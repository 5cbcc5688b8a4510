//! Terminal statistics for a finished crawl

use crate::crawler::CrawlReport;
use crate::status::{CountingReporter, ProblemKind};
use crate::url::host_of;
use std::collections::HashMap;
use url::Url;

/// Aggregated statistics over a crawl report
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub total_pages: u64,
    pub internal_pages: u64,
    pub external_pages: u64,
    /// Count of result rows per status label
    pub pages_by_status: HashMap<String, u64>,
    /// Sum of inlink totals across all finalized rows
    pub total_inlinks: u64,
    /// Problem report tallies, in `ProblemKind::ALL` order
    pub problem_counts: Vec<(ProblemKind, u64)>,
}

/// Builds statistics from the report and the problem tallies
pub fn build_statistics(
    report: &CrawlReport,
    base_host: &str,
    reporter: &CountingReporter,
) -> CrawlStatistics {
    let mut internal_pages = 0;
    let mut external_pages = 0;
    let mut pages_by_status: HashMap<String, u64> = HashMap::new();
    let mut total_inlinks = 0;

    for record in &report.pages {
        let internal = Url::parse(&record.address)
            .ok()
            .and_then(|u| host_of(&u))
            .map(|host| host == base_host)
            .unwrap_or(false);
        if internal {
            internal_pages += 1;
        } else {
            external_pages += 1;
        }

        let label = if record.status.is_empty() {
            "unknown".to_string()
        } else {
            record.status.clone()
        };
        *pages_by_status.entry(label).or_insert(0) += 1;

        if let Some(stats) = &record.inlinks {
            total_inlinks += stats.total;
        }
    }

    let problem_counts = ProblemKind::ALL
        .iter()
        .map(|kind| (*kind, reporter.problems(*kind)))
        .collect();

    CrawlStatistics {
        total_pages: report.pages.len() as u64,
        internal_pages,
        external_pages,
        pages_by_status,
        total_inlinks,
        problem_counts,
    }
}

/// Prints the statistics block to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages fetched: {}", stats.total_pages);
    println!("  Internal: {}", stats.internal_pages);
    println!("  External: {}", stats.external_pages);
    println!("  Inlinks recorded: {}", stats.total_inlinks);
    println!();

    println!("Pages by status:");
    let mut by_status: Vec<_> = stats.pages_by_status.iter().collect();
    by_status.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (status, count) in by_status {
        println!("  {}: {}", status, count);
    }
    println!();

    println!("Problems:");
    let mut any = false;
    for (kind, count) in &stats.problem_counts {
        if *count > 0 {
            println!("  {}: {}", kind, count);
            any = true;
        }
    }
    if !any {
        println!("  none");
    }
}
