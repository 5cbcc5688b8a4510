//! Concurrency scheduler
//!
//! Owns the pieces that make the crawl safe to run wide open: the visited
//! set (at-most-once dispatch), the admission semaphore (at most `C` fetches
//! in flight), the in-flight task counter that drives drain detection, and
//! the progress counters.
//!
//! The in-flight counter is incremented at dispatch time, before the task is
//! spawned, and decremented only when the task has fully completed. A parent
//! task dispatches all of its children before it finishes, so the counter
//! can never dip to zero while undiscovered work still exists; that is
//! what lets `wait_idle` use a notify instead of the original fixed-interval
//! poll.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

/// Admission gate and shared crawl accounting
#[derive(Debug)]
pub struct Scheduler {
    /// Global semaphore bounding simultaneous fetches
    semaphore: Arc<Semaphore>,

    /// Number of permits the semaphore was created with
    permits: usize,

    /// URLs already dispatched; insertion decides dispatch
    visited: Mutex<HashSet<String>>,

    /// Dispatched-but-not-completed task count
    in_flight: AtomicUsize,

    /// Woken when `in_flight` reaches zero
    drained: Notify,

    /// Completed (non-cancelled) page tasks
    visited_pages: AtomicU64,

    /// URLs accepted into the visited set; a frontier-size estimate only
    pages_to_visit: AtomicU64,
}

impl Scheduler {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            permits: max_concurrent,
            visited: Mutex::new(HashSet::new()),
            in_flight: AtomicUsize::new(0),
            drained: Notify::new(),
            visited_pages: AtomicU64::new(0),
            pages_to_visit: AtomicU64::new(0),
        }
    }

    /// Decides whether `address` gets dispatched
    ///
    /// Check-and-insert under one lock: of any number of concurrent
    /// discoveries of the same URL, exactly one caller sees `true`. The
    /// frontier estimate is bumped for that caller only.
    pub fn admit(&self, address: &str) -> bool {
        let mut visited = self.visited.lock().unwrap();
        if !visited.insert(address.to_string()) {
            return false;
        }
        drop(visited);

        self.pages_to_visit.fetch_add(1, Ordering::SeqCst);
        true
    }

    /// Waits for a free fetch slot
    ///
    /// The permit is the slot: dropping it releases the slot no matter how
    /// the task ends.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.semaphore.clone().acquire_owned().await.ok()
    }

    /// Number of fetch slots currently held
    pub fn active_fetches(&self) -> usize {
        self.permits - self.semaphore.available_permits()
    }

    /// Marks one task as dispatched; call before spawning it
    pub fn task_started(&self) {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
    }

    /// Marks one task as fully completed
    pub fn task_finished(&self) {
        if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Dispatched-but-not-completed task count
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Blocks until every dispatched task has completed
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.drained.notified();
            if self.in_flight.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Counts one completed page; returns the new visited total
    pub fn record_visited(&self) -> u64 {
        self.visited_pages.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current `(visited_pages, pages_to_visit)` counters
    pub fn counters(&self) -> (u64, u64) {
        (
            self.visited_pages.load(Ordering::SeqCst),
            self.pages_to_visit.load(Ordering::SeqCst),
        )
    }
}
