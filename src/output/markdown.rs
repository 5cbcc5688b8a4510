//! Markdown summary of a finished crawl

use crate::crawler::CrawlReport;
use crate::output::format::size_suffix;
use crate::store::PageRecord;
use crate::Result;
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use url::Url;

/// Writes a human-readable crawl summary to `path`
///
/// Covers the headline numbers, the most linked-to pages, the largest
/// responses, and every row that ended in an error status.
pub fn write_markdown_summary(path: &Path, base_url: &Url, report: &CrawlReport) -> Result<()> {
    let mut out = std::fs::File::create(path)?;

    writeln!(out, "# Crawl summary: {}", base_url)?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", Utc::now().format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out)?;
    writeln!(out, "- Pages fetched: {}", report.pages.len())?;
    writeln!(out, "- Pages visited: {}", report.visited_pages)?;
    writeln!(out, "- URLs discovered: {}", report.pages_to_visit)?;
    writeln!(out)?;

    write_top_inlinked(&mut out, report)?;
    write_largest_pages(&mut out, report)?;
    write_error_pages(&mut out, report)?;

    tracing::info!(path = %path.display(), "wrote markdown summary");
    Ok(())
}

fn write_top_inlinked(out: &mut impl Write, report: &CrawlReport) -> Result<()> {
    let mut linked: Vec<&PageRecord> = report
        .pages
        .iter()
        .filter(|r| r.inlinks.is_some())
        .collect();
    linked.sort_by(|a, b| {
        let ta = a.inlinks.as_ref().map(|s| s.total).unwrap_or(0);
        let tb = b.inlinks.as_ref().map(|s| s.total).unwrap_or(0);
        tb.cmp(&ta).then_with(|| a.address.cmp(&b.address))
    });

    writeln!(out, "## Most linked-to pages")?;
    writeln!(out)?;

    if linked.is_empty() {
        writeln!(out, "No inlinks recorded.")?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "| Address | Status | Inlinks | Unique | Unique % |")?;
    writeln!(out, "|---------|--------|---------|--------|----------|")?;
    for record in linked.iter().take(15) {
        if let Some(stats) = record.inlinks.as_ref() {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                record.address, record.status, stats.total, stats.unique, stats.unique_percent
            )?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn write_largest_pages(out: &mut impl Write, report: &CrawlReport) -> Result<()> {
    let mut by_size: Vec<&PageRecord> = report.pages.iter().filter(|r| r.byte_size > 0).collect();
    by_size.sort_by(|a, b| b.byte_size.cmp(&a.byte_size).then_with(|| a.address.cmp(&b.address)));

    writeln!(out, "## Largest responses")?;
    writeln!(out)?;
    if by_size.is_empty() {
        writeln!(out, "No sized responses recorded.")?;
    } else {
        for record in by_size.iter().take(5) {
            writeln!(
                out,
                "- {} ({}, {})",
                record.address,
                size_suffix(record.byte_size, 1),
                if record.content_type.is_empty() {
                    "unknown type"
                } else {
                    &record.content_type
                }
            )?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn write_error_pages(out: &mut impl Write, report: &CrawlReport) -> Result<()> {
    let errors: Vec<&PageRecord> = report
        .pages
        .iter()
        .filter(|r| !r.status.starts_with('2'))
        .collect();

    writeln!(out, "## Pages with errors")?;
    writeln!(out)?;
    if errors.is_empty() {
        writeln!(out, "None.")?;
    } else {
        for record in errors {
            let label = if record.status.is_empty() {
                "unknown"
            } else {
                &record.status
            };
            writeln!(out, "- {} — {}", record.address, label)?;
        }
    }
    Ok(())
}
