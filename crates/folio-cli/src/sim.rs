//! Synthetic items and access plans for scans.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_cache::{CachedItem, LoadError};
use rand::{Rng, SeedableRng};

use crate::cli::args::Pattern;

/// Per-item load/unload counts shared by every item of a scan. Outlives the
/// cache, so counts can be read after `free`.
#[derive(Debug)]
pub struct SimLedger {
    loads: Vec<AtomicU32>,
    unloads: Vec<AtomicU32>,
    failures: AtomicU64,
}

impl SimLedger {
    pub fn new(items: usize) -> Self {
        Self {
            loads: (0..items).map(|_| AtomicU32::new(0)).collect(),
            unloads: (0..items).map(|_| AtomicU32::new(0)).collect(),
            failures: AtomicU64::new(0),
        }
    }

    pub fn total_loads(&self) -> u64 {
        sum(&self.loads)
    }

    pub fn total_unloads(&self) -> u64 {
        sum(&self.unloads)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Items that were materialized more than once.
    pub fn reloaded(&self) -> usize {
        self.loads
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) > 1)
            .count()
    }

    pub fn all_unloaded(&self) -> bool {
        self.unloads.iter().all(|c| c.load(Ordering::Relaxed) > 0)
    }
}

fn sum(counts: &[AtomicU32]) -> u64 {
    counts
        .iter()
        .map(|c| u64::from(c.load(Ordering::Relaxed)))
        .sum()
}

/// An item whose load sleeps for a fixed time and may be rigged to fail.
pub struct SimItem {
    index: usize,
    delay: Duration,
    fail: bool,
    loaded: AtomicBool,
    ledger: Arc<SimLedger>,
}

#[async_trait]
impl CachedItem for SimItem {
    async fn load(&self) -> Result<(), LoadError> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            self.ledger.failures.fetch_add(1, Ordering::Relaxed);
            return Err(LoadError::Undecodable {
                item: format!("sim-{:06}", self.index),
                reason: "rigged to fail".into(),
            });
        }
        self.loaded.store(true, Ordering::Release);
        self.ledger.loads[self.index].fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn unload(&self) {
        self.loaded.store(false, Ordering::Release);
        self.ledger.unloads[self.index].fetch_add(1, Ordering::Relaxed);
    }
}

/// Build `count` items sharing `ledger`. With `fail_every = Some(n)`, items
/// `n-1, 2n-1, ...` fail to load.
pub fn items(
    count: usize,
    delay: Duration,
    fail_every: Option<usize>,
    ledger: &Arc<SimLedger>,
) -> Vec<SimItem> {
    (0..count)
        .map(|index| SimItem {
            index,
            delay,
            fail: fail_every.is_some_and(|n| n > 0 && (index + 1) % n == 0),
            loaded: AtomicBool::new(false),
            ledger: Arc::clone(ledger),
        })
        .collect()
}

/// Indices visited by a point-access pattern. `Screens` walks windows instead
/// and has no point plan.
pub fn access_plan(pattern: Pattern, items: usize, accesses: usize, seed: u64) -> Vec<usize> {
    if items == 0 {
        return Vec::new();
    }
    match pattern {
        Pattern::Sequential => (0..items).cycle().take(accesses).collect(),
        Pattern::Reverse => (0..items).rev().cycle().take(accesses).collect(),
        Pattern::Random => {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            (0..accesses).map(|_| rng.gen_range(0..items)).collect()
        }
        Pattern::Screens => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_and_reverse_plans_wrap() {
        assert_eq!(access_plan(Pattern::Sequential, 3, 5, 0), vec![0, 1, 2, 0, 1]);
        assert_eq!(access_plan(Pattern::Reverse, 3, 4, 0), vec![2, 1, 0, 2]);
    }

    #[test]
    fn test_random_plan_is_seeded() {
        let a = access_plan(Pattern::Random, 100, 50, 7);
        let b = access_plan(Pattern::Random, 100, 50, 7);
        assert_eq!(a, b);
        assert!(a.iter().all(|&i| i < 100));
    }

    #[test]
    fn test_empty_collection_has_no_plan() {
        assert!(access_plan(Pattern::Random, 0, 10, 1).is_empty());
    }

    #[test]
    fn test_fail_every_marks_items() {
        let ledger = Arc::new(SimLedger::new(9));
        let items = items(9, Duration::ZERO, Some(3), &ledger);
        let failing: Vec<usize> = items.iter().filter(|i| i.fail).map(|i| i.index).collect();
        assert_eq!(failing, vec![2, 5, 8]);
    }

    #[tokio::test]
    async fn test_load_is_idempotent_and_counted() {
        let ledger = Arc::new(SimLedger::new(2));
        let items = items(2, Duration::ZERO, Some(2), &ledger);

        items[0].load().await.unwrap();
        items[0].load().await.unwrap();
        assert!(items[1].load().await.is_err());
        items[0].unload().await;
        items[0].load().await.unwrap();

        assert_eq!(ledger.total_loads(), 2);
        assert_eq!(ledger.failures(), 1);
        assert_eq!(ledger.reloaded(), 1);
        assert_eq!(ledger.total_unloads(), 1);
        assert!(!ledger.all_unloaded());
    }
}
