//! Tracking of page loads in progress.

use std::collections::BTreeMap;

use tokio::sync::oneshot;
use tracing::trace;

/// A request to the coordinator for a page.
#[derive(Debug)]
pub(crate) struct Request {
    /// The page number to load.
    pub(crate) page: usize,
    /// Notified with the page number once it is resident. `None` for prefetches.
    pub(crate) reply: Option<oneshot::Sender<usize>>,
}

impl Request {
    pub(crate) fn prefetch(page: usize) -> Self {
        Self { page, reply: None }
    }

    pub(crate) fn fetch(page: usize) -> (Self, oneshot::Receiver<usize>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                page,
                reply: Some(tx),
            },
            rx,
        )
    }
}

/// Active page loads and the requesters waiting on each.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    waiters: BTreeMap<usize, Vec<oneshot::Sender<usize>>>,
}

impl InFlight {
    pub(crate) fn is_active(&self, page: usize) -> bool {
        self.waiters.contains_key(&page)
    }

    /// Pages with a load in progress, ascending.
    pub(crate) fn pages(&self) -> Vec<usize> {
        self.waiters.keys().copied().collect()
    }

    /// Track `request`. Returns true when no load of the page is in progress
    /// yet; the caller must then start exactly one.
    pub(crate) fn track(&mut self, request: Request) -> bool {
        let Request { page, reply } = request;
        match self.waiters.get_mut(&page) {
            Some(pending) => {
                pending.extend(reply);
                trace!(page, waiting = pending.len(), "joined in-flight page load");
                false
            }
            None => {
                self.waiters.insert(page, reply.into_iter().collect());
                true
            }
        }
    }

    /// Stop tracking `page` and notify everyone waiting on it.
    ///
    /// # Panics
    ///
    /// If `page` is not being tracked.
    pub(crate) fn done(&mut self, page: usize) {
        let Some(pending) = self.waiters.remove(&page) else {
            panic!("cache: ready page {page} not in progress");
        };
        for reply in pending {
            // The requester may have given up waiting.
            let _ = reply.send(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_request_starts_load() {
        let mut inflight = InFlight::default();
        assert!(!inflight.is_active(3));
        assert!(inflight.track(Request::prefetch(3)));
        assert!(inflight.is_active(3));
        assert!(!inflight.track(Request::prefetch(3)));
        assert_eq!(inflight.pages(), vec![3]);
    }

    #[test]
    fn test_done_notifies_all_waiters() {
        let mut inflight = InFlight::default();
        let (first, mut rx1) = Request::fetch(2);
        let (second, mut rx2) = Request::fetch(2);
        assert!(inflight.track(first));
        assert!(!inflight.track(Request::prefetch(2)));
        assert!(!inflight.track(second));

        inflight.done(2);
        assert!(!inflight.is_active(2));
        assert_eq!(rx1.try_recv().unwrap(), 2);
        assert_eq!(rx2.try_recv().unwrap(), 2);
    }

    #[test]
    fn test_done_skips_dropped_waiters() {
        let mut inflight = InFlight::default();
        let (req, rx) = Request::fetch(7);
        inflight.track(req);
        drop(rx);
        inflight.done(7);
        assert!(inflight.pages().is_empty());
    }

    #[test]
    fn test_pages_are_independent() {
        let mut inflight = InFlight::default();
        assert!(inflight.track(Request::prefetch(1)));
        assert!(inflight.track(Request::prefetch(4)));
        inflight.done(1);
        assert!(inflight.is_active(4));
    }

    #[test]
    #[should_panic(expected = "ready page 9 not in progress")]
    fn test_done_without_tracking_panics() {
        let mut inflight = InFlight::default();
        inflight.done(9);
    }
}
