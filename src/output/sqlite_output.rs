//! SQLite export of the crawl result table

use crate::crawler::CrawlReport;
use crate::store::PageRecord;
use crate::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS crawl_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    base_url TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    visited_pages INTEGER NOT NULL,
    pages_to_visit INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES crawl_runs(id),
    address TEXT NOT NULL,
    status TEXT NOT NULL,
    content_type TEXT NOT NULL,
    byte_size INTEGER NOT NULL,
    title TEXT,
    title_char_length INTEGER,
    title_pixel_width INTEGER,
    title_count INTEGER NOT NULL,
    meta_description TEXT,
    description_char_length INTEGER,
    description_pixel_width INTEGER,
    description_count INTEGER NOT NULL,
    heading_one TEXT,
    heading_one_count INTEGER NOT NULL,
    heading_two TEXT,
    heading_two_count INTEGER NOT NULL,
    inlinks_total INTEGER,
    inlinks_unique INTEGER,
    inlinks_unique_percent TEXT
);

CREATE INDEX IF NOT EXISTS idx_pages_run ON pages(run_id);
CREATE INDEX IF NOT EXISTS idx_pages_address ON pages(address);
";

/// Writes the finished crawl into a SQLite database
///
/// Appends one `crawl_runs` row and one `pages` row per result record.
/// Repeated element values (multiple titles, headings) are flattened to the
/// first occurrence plus a count column, which is what the diagnostics need:
/// the interesting signal in "three titles" is the three.
pub fn export_sqlite(
    path: &Path,
    report: &CrawlReport,
    base_url: &str,
    config_hash: &str,
    started_at: DateTime<Utc>,
) -> Result<i64> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO crawl_runs
            (base_url, config_hash, started_at, finished_at, visited_pages, pages_to_visit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            base_url,
            config_hash,
            started_at.to_rfc3339(),
            Utc::now().to_rfc3339(),
            report.visited_pages,
            report.pages_to_visit,
        ],
    )?;
    let run_id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO pages (
                run_id, address, status, content_type, byte_size,
                title, title_char_length, title_pixel_width, title_count,
                meta_description, description_char_length, description_pixel_width,
                description_count,
                heading_one, heading_one_count, heading_two, heading_two_count,
                inlinks_total, inlinks_unique, inlinks_unique_percent
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                      ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        )?;

        for record in &report.pages {
            insert_page(&mut stmt, run_id, record)?;
        }
    }

    tx.commit()?;
    tracing::info!(run_id, rows = report.pages.len(), "exported crawl to SQLite");
    Ok(run_id)
}

fn insert_page(stmt: &mut rusqlite::Statement<'_>, run_id: i64, record: &PageRecord) -> Result<()> {
    let first_title = record.titles.first();
    let first_desc = record.meta_descriptions.first();
    let first_h1 = record.headings_one.first();
    let first_h2 = record.headings_two.first();
    let inlinks = record.inlinks.as_ref();

    stmt.execute(params![
        run_id,
        record.address,
        record.status,
        record.content_type,
        record.byte_size,
        first_title.map(|t| t.text.as_str()),
        first_title.map(|t| t.char_length),
        first_title.map(|t| t.pixel_width),
        record.titles.len() as i64,
        first_desc.map(|d| d.text.as_str()),
        first_desc.map(|d| d.char_length),
        first_desc.map(|d| d.pixel_width),
        record.meta_descriptions.len() as i64,
        first_h1.map(|h| h.text.as_str()),
        record.headings_one.len() as i64,
        first_h2.map(|h| h.text.as_str()),
        record.headings_two.len() as i64,
        inlinks.map(|s| s.total),
        inlinks.map(|s| s.unique),
        inlinks.map(|s| s.unique_percent.as_str()),
    ])?;

    Ok(())
}
