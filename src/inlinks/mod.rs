//! Inlink aggregation: per-target totals and unique referrer sets

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Counters for one link target
///
/// `referrers.len() <= total` always holds: the total counts every
/// occurrence of an edge, the set deduplicates source pages.
#[derive(Debug, Default, Clone)]
pub struct InlinkEntry {
    pub total: u64,
    pub referrers: HashSet<String>,
}

/// Per-target inlink ledger, shared across all fetch tasks
///
/// Entries are created lazily on first reference to a target and updated by
/// every concurrent task that discovers a link to it. One mutex serializes
/// updates per logical operation; no mutation spans more than one entry.
#[derive(Debug, Default)]
pub struct InlinkLedger {
    entries: Mutex<HashMap<String, InlinkEntry>>,
}

impl InlinkLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one discovered edge from `referrer` to `target`
    ///
    /// Called at discovery time, once per occurrence; repeated links from the
    /// same referrer raise the total but not the unique count.
    pub fn record(&self, referrer: &str, target: &str) {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.entry(target.to_string()).or_default();
        entry.total += 1;
        entry.referrers.insert(referrer.to_string());
    }

    /// Number of targets with at least one recorded inlink
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clones the ledger out for the finalization pass
    pub fn snapshot(&self) -> Vec<(String, InlinkEntry)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_referrers_two_unique() {
        let ledger = InlinkLedger::new();
        ledger.record("http://root.com/x", "http://root.com/a");
        ledger.record("http://root.com/y", "http://root.com/a");

        let snapshot = ledger.snapshot();
        let (_, entry) = snapshot
            .iter()
            .find(|(t, _)| t == "http://root.com/a")
            .unwrap();
        assert_eq!(entry.total, 2);
        assert_eq!(entry.referrers.len(), 2);
    }

    #[test]
    fn test_repeat_link_dedupes_referrer() {
        let ledger = InlinkLedger::new();
        ledger.record("http://root.com/x", "http://root.com/a");
        ledger.record("http://root.com/x", "http://root.com/a");

        let snapshot = ledger.snapshot();
        let (_, entry) = snapshot
            .iter()
            .find(|(t, _)| t == "http://root.com/a")
            .unwrap();
        assert_eq!(entry.total, 2);
        assert_eq!(entry.referrers.len(), 1);
    }

    #[test]
    fn test_entries_created_lazily() {
        let ledger = InlinkLedger::new();
        assert!(ledger.is_empty());

        ledger.record("http://root.com/", "http://root.com/a");
        ledger.record("http://root.com/", "http://root.com/b");
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_unique_never_exceeds_total() {
        let ledger = InlinkLedger::new();
        let referrers = ["r1", "r2", "r1", "r3", "r2", "r1"];
        for referrer in referrers {
            ledger.record(referrer, "http://root.com/target");
        }

        for (_, entry) in ledger.snapshot() {
            assert!(entry.referrers.len() as u64 <= entry.total);
        }
    }

    #[test]
    fn test_concurrent_updates() {
        use std::sync::Arc;

        let ledger = Arc::new(InlinkLedger::new());
        let mut handles = Vec::new();
        for i in 0..4 {
            let ledger = Arc::clone(&ledger);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    ledger.record(&format!("http://root.com/ref{}", i), "http://root.com/hot");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = ledger.snapshot();
        let (_, entry) = snapshot
            .iter()
            .find(|(t, _)| t == "http://root.com/hot")
            .unwrap();
        assert_eq!(entry.total, 400);
        assert_eq!(entry.referrers.len(), 4);
    }
}
