//! Crawl engine
//!
//! Orchestrates the whole crawl: dispatches one concurrent task per
//! discovered URL, classifies pages as internal or external, recurses into
//! internal pages within the depth limit, feeds the inlink ledger and the
//! result store, and runs the finalization pass exactly once after the last
//! task drains.

use crate::config::Config;
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::scheduler::Scheduler;
use crate::inlinks::InlinkLedger;
use crate::status::{check_record, LogReporter, StatusReporter};
use crate::store::{InlinkStats, PageRecord, PageStore};
use crate::url::{host_of, is_internal, normalize_link, path_depth};
use crate::{GaugeError, UrlError};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// An absolute URL accepted for fetching, with the hop depth it was
/// discovered at
///
/// Created when a link survives normalization and deduplication; consumed by
/// exactly one fetch task. The hop depth is diagnostic only; the depth
/// *limit* is applied to path segments (see [`path_depth`]).
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub url: Url,
    pub depth: u32,
}

/// Final outcome of a crawl
#[derive(Debug)]
pub struct CrawlReport {
    /// Every result row, in completion order
    pub pages: Vec<PageRecord>,
    /// Pages that finished processing
    pub visited_pages: u64,
    /// URLs that were accepted for fetching (frontier estimate)
    pub pages_to_visit: u64,
}

/// Requests cancellation of a running crawl
///
/// Cheap to clone, callable from any thread at any time, before the crawl
/// starts or after it finishes. Setting it twice is harmless.
#[derive(Clone)]
pub struct AbortHandle {
    cancelled: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Signals the crawl to stop taking on new work
    ///
    /// In-flight fetches drain naturally; tasks that have not started yet
    /// release their slot without fetching.
    pub fn abort(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// The crawl engine; single use
pub struct CrawlEngine {
    inner: Arc<EngineInner>,
}

impl std::fmt::Debug for CrawlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlEngine").finish_non_exhaustive()
    }
}

struct EngineInner {
    config: Config,
    client: Client,
    base_url: Url,
    base_host: String,
    scheduler: Scheduler,
    inlinks: InlinkLedger,
    store: PageStore,
    status: Arc<dyn StatusReporter>,
    cancelled: Arc<AtomicBool>,
}

/// Decrements the in-flight count when a task ends, however it ends
struct InFlightGuard {
    inner: Arc<EngineInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.scheduler.task_finished();
    }
}

impl CrawlEngine {
    /// Creates an engine reporting through `tracing`
    pub fn new(config: Config, base_url: Url) -> Result<Self, GaugeError> {
        Self::with_reporter(config, base_url, Arc::new(LogReporter))
    }

    /// Creates an engine with a custom status reporter
    pub fn with_reporter(
        config: Config,
        base_url: Url,
        status: Arc<dyn StatusReporter>,
    ) -> Result<Self, GaugeError> {
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(base_url.scheme().to_string()).into());
        }
        let base_host = host_of(&base_url).ok_or(UrlError::MissingHost)?;

        let client = build_http_client(&config.user_agent)?;
        let scheduler = Scheduler::new(config.crawler.max_concurrent_fetches as usize);

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                client,
                base_url,
                base_host,
                scheduler,
                inlinks: InlinkLedger::new(),
                store: PageStore::new(),
                status,
                cancelled: Arc::new(AtomicBool::new(false)),
            }),
        })
    }

    /// Handle for aborting this crawl from elsewhere
    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle {
            cancelled: Arc::clone(&self.inner.cancelled),
        }
    }

    /// Runs the crawl to completion and returns the report
    ///
    /// Seeds the base URL at depth 0, waits for every task to drain, then
    /// runs the inlink finalization pass and signals the reporter. Per-page
    /// failures are classified into their records and never surface here.
    pub async fn run(self) -> CrawlReport {
        tracing::info!(base = %self.inner.base_url, "starting crawl");

        let base = CrawlTarget {
            url: self.inner.base_url.clone(),
            depth: 0,
        };
        EngineInner::dispatch(&self.inner, base);

        self.inner.scheduler.wait_idle().await;

        self.inner.finalize_inlinks();
        self.inner.status.crawl_finished();

        let (visited_pages, pages_to_visit) = self.inner.scheduler.counters();
        tracing::info!(visited_pages, pages_to_visit, "crawl complete");

        CrawlReport {
            pages: self.inner.store.snapshot(),
            visited_pages,
            pages_to_visit,
        }
    }
}

impl EngineInner {
    /// Admits a target into the crawl and spawns its fetch task
    ///
    /// The visited-set insert decides dispatch; the in-flight count is bumped
    /// here, before the spawn, so drain detection always sees the child
    /// before the parent finishes.
    fn dispatch(inner: &Arc<Self>, target: CrawlTarget) {
        if !inner.scheduler.admit(target.url.as_str()) {
            return;
        }

        inner.scheduler.task_started();
        let guard = InFlightGuard {
            inner: Arc::clone(inner),
        };

        let inner = Arc::clone(inner);
        tokio::spawn(async move {
            let _guard = guard;
            Self::process_page(&inner, target).await;
        });
    }

    /// One page task: acquire a slot, fetch, record, recurse
    async fn process_page(inner: &Arc<Self>, target: CrawlTarget) {
        let permit = match inner.scheduler.acquire().await {
            Some(permit) => permit,
            None => return,
        };
        inner
            .status
            .concurrency_status(inner.scheduler.active_fetches());

        // Cancellation is checked once, after slot acquisition and before
        // any I/O; a cancelled task's only job is to give the slot back.
        let cancelled = inner.cancelled.load(Ordering::SeqCst);
        if !cancelled {
            Self::handle_page(inner, &target).await;
        } else {
            tracing::debug!(url = %target.url, "cancelled before fetch");
        }

        drop(permit);
        inner
            .status
            .concurrency_status(inner.scheduler.active_fetches());

        if !cancelled {
            let visited = inner.scheduler.record_visited();
            let (_, pages_to_visit) = inner.scheduler.counters();
            inner.status.progress(visited, pages_to_visit);
        }
    }

    /// Fetches one page and turns the outcome into a result row
    async fn handle_page(inner: &Arc<Self>, target: &CrawlTarget) {
        let address = target.url.to_string();
        let outcome = fetch_url(&inner.client, target.url.as_str()).await;
        let internal = is_internal(&inner.base_host, &target.url);

        let mut record = PageRecord::new(&address);
        record.status = outcome.status_label();

        if let FetchOutcome::Success {
            content_type,
            byte_size,
            body,
            ..
        } = outcome
        {
            record.content_type = content_type;
            record.byte_size = byte_size;

            if internal {
                let extracted = extract_page(&body);

                // Stop following links below the depth limit; the page
                // itself is still recorded.
                if path_depth(&target.url) as u32 <= inner.config.crawler.max_depth {
                    Self::follow_links(inner, &address, &extracted.links, target.depth);
                } else {
                    tracing::debug!(url = %address, "depth limit reached, links not followed");
                }

                record.titles = extracted.titles;
                record.meta_descriptions = extracted.meta_descriptions;
                record.headings_one = extracted.headings_one;
                record.headings_two = extracted.headings_two;
            }
            // External pages keep only address/status/size metadata and are
            // never recursed into.
        }

        if internal {
            check_record(&record, &inner.config.thresholds, &*inner.status);
        }

        inner.store.append(record);
    }

    /// Normalizes each discovered href, records internal edges, dispatches
    fn follow_links(inner: &Arc<Self>, source_address: &str, links: &[String], depth: u32) {
        for raw in links {
            let resolved = match normalize_link(&inner.base_url, raw, source_address) {
                Some(url) => url,
                None => continue,
            };

            if is_internal(&inner.base_host, &resolved) {
                inner.inlinks.record(source_address, resolved.as_str());
            }

            Self::dispatch(
                inner,
                CrawlTarget {
                    url: resolved,
                    depth: depth + 1,
                },
            );
        }
    }

    /// The one-shot aggregation pass run after drain
    fn finalize_inlinks(&self) {
        for (target, entry) in self.inlinks.snapshot() {
            let total = entry.total;
            let unique = entry.referrers.len() as u64;
            let percent = (unique as f64 / total as f64) * 100.0;

            let stats = InlinkStats {
                total,
                unique,
                unique_percent: format!("{:.2}", percent),
            };

            if !self.store.set_inlink_stats(&target, stats) {
                // Linked-to but never fetched; the result table skips it.
                tracing::debug!(url = %target, "no result row for inlink target");
            }
        }
    }
}
