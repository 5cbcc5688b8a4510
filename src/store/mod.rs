//! The result store: one row per fetched URL
//!
//! Rows are appended concurrently by fetch tasks and backfilled once with
//! inlink statistics during finalization, mirroring the tabular result view
//! the crawl feeds.

use std::sync::Mutex;

/// A `<title>` element with its measured lengths
#[derive(Debug, Clone, PartialEq)]
pub struct PageTitle {
    pub text: String,
    /// Length in characters
    pub char_length: u32,
    /// Estimated rendered width in pixels
    pub pixel_width: u32,
}

/// A `<meta name="description">` element with its measured lengths
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetaDescription {
    pub text: String,
    pub char_length: u32,
    pub pixel_width: u32,
}

/// An `<h1>` or `<h2>` element
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeading {
    pub text: String,
    pub char_length: u32,
}

/// Inlink statistics backfilled during finalization
#[derive(Debug, Clone, PartialEq)]
pub struct InlinkStats {
    /// Total number of inlinks pointing at this page
    pub total: u64,
    /// Number of distinct referrer pages
    pub unique: u64,
    /// `unique / total * 100`, formatted to two decimal places
    pub unique_percent: String,
}

/// One row of the crawl result table
///
/// Created when a fetch completes (successfully or with a classified error),
/// written once, never deleted during a crawl. `inlinks` stays `None` until
/// the finalization pass.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub address: String,
    /// Status label: `"200"`, `"404"`, `"Undefined"`, `"Malformed"`, ...
    pub status: String,
    pub content_type: String,
    pub byte_size: u64,
    pub titles: Vec<PageTitle>,
    pub meta_descriptions: Vec<PageMetaDescription>,
    pub headings_one: Vec<PageHeading>,
    pub headings_two: Vec<PageHeading>,
    pub inlinks: Option<InlinkStats>,
}

impl PageRecord {
    /// A bare record carrying only an address; fields are filled in as the
    /// fetch outcome and extraction dictate
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            status: String::new(),
            content_type: String::new(),
            byte_size: 0,
            titles: Vec::new(),
            meta_descriptions: Vec::new(),
            headings_one: Vec::new(),
            headings_two: Vec::new(),
            inlinks: None,
        }
    }
}

/// Shared result store with serialized appends
///
/// Arbitrarily many fetch tasks append concurrently; the mutex guarantees
/// appends are neither lost nor duplicated. Lookup by address is a linear
/// scan, matching the row-set the original fed its table view from.
#[derive(Debug, Default)]
pub struct PageStore {
    rows: Mutex<Vec<PageRecord>>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one finished page row
    pub fn append(&self, record: PageRecord) {
        self.rows.lock().unwrap().push(record);
    }

    /// Number of rows recorded so far
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes inlink statistics into the row for `address`
    ///
    /// Returns false when no row matches, which happens for targets that were
    /// linked to but never produced a record; callers skip those silently.
    pub fn set_inlink_stats(&self, address: &str, stats: InlinkStats) -> bool {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.address == address) {
            Some(row) => {
                row.inlinks = Some(stats);
                true
            }
            None => false,
        }
    }

    /// Clones the current rows out of the store
    pub fn snapshot(&self) -> Vec<PageRecord> {
        self.rows.lock().unwrap().clone()
    }
}
