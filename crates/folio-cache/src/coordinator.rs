//! The task that owns cache state.
//!
//! Every change to the resident set and the in-flight map happens on the
//! coordinator task, in mailbox order. Callers talk to it through [`Message`];
//! page workers report back through a second, internal mailbox.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::inflight::{InFlight, Request};
use crate::item::CachedItem;
use crate::page::PageLayout;
use crate::resident::ResidentPages;
use crate::worker;

/// Messages accepted by the coordinator.
#[derive(Debug)]
pub(crate) enum Message {
    Fetch(Request),
    Stats(oneshot::Sender<CacheStats>),
}

/// Snapshot of the coordinator's bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Resident pages, in residency order.
    pub resident_pages: Vec<usize>,
    /// Pages with a load in progress, ascending.
    pub in_flight: Vec<usize>,
    /// Page loads started.
    pub pages_loaded: u64,
    /// Pages evicted from the resident set.
    pub pages_evicted: u64,
    /// Requests answered from the resident set.
    pub hits: u64,
    /// Requests that joined a load already in progress.
    pub dedup_joins: u64,
}

pub(crate) struct Coordinator<E> {
    items: Arc<[E]>,
    layout: PageLayout,
    resident: ResidentPages,
    inflight: InFlight,
    diagnostics: Diagnostics,
    ready_tx: mpsc::UnboundedSender<usize>,
    stats: CacheStats,
}

impl<E: CachedItem> Coordinator<E> {
    pub(crate) fn new(
        items: Arc<[E]>,
        layout: PageLayout,
        capacity: usize,
        diagnostics: Diagnostics,
        ready_tx: mpsc::UnboundedSender<usize>,
    ) -> Self {
        Self {
            items,
            layout,
            resident: ResidentPages::new(capacity),
            inflight: InFlight::default(),
            diagnostics,
            ready_tx,
            stats: CacheStats::default(),
        }
    }

    /// Serve requests until every request sender is dropped.
    pub(crate) async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<Message>,
        mut ready: mpsc::UnboundedReceiver<usize>,
    ) {
        loop {
            tokio::select! {
                msg = requests.recv() => match msg {
                    Some(Message::Fetch(req)) => self.on_request(req),
                    Some(Message::Stats(reply)) => {
                        let _ = reply.send(self.snapshot());
                    }
                    None => break,
                },
                // `self.ready_tx` keeps this mailbox open.
                Some(page) = ready.recv() => self.on_ready(page),
            }
        }
        debug!(in_flight = ?self.inflight.pages(), "cache coordinator stopped");
    }

    fn on_request(&mut self, req: Request) {
        if self.resident.contains(req.page) {
            self.stats.hits += 1;
            if let Some(reply) = req.reply {
                let _ = reply.send(req.page);
            }
            return;
        }

        let page = req.page;
        if self.inflight.track(req) {
            self.stats.pages_loaded += 1;
            self.spawn_load(page);
        } else {
            self.stats.dedup_joins += 1;
        }
    }

    fn on_ready(&mut self, page: usize) {
        assert!(
            self.inflight.is_active(page),
            "cache: ready page {page} not in progress"
        );

        if let Some(evicted) = self.resident.add(page) {
            self.stats.pages_evicted += 1;
            self.diagnostics.page_evicted(evicted);
            worker::unload_page(&self.items, self.layout, evicted);
        }
        self.diagnostics
            .resident(self.resident.pages(), self.resident.capacity());
        self.inflight.done(page);
    }

    fn spawn_load(&self, page: usize) {
        let items = Arc::clone(&self.items);
        let layout = self.layout;
        let diagnostics = self.diagnostics.clone();
        let ready = self.ready_tx.clone();
        tokio::spawn(async move {
            let start = Instant::now();
            worker::load_page(items, layout, page).await;
            diagnostics.page_loaded(page, start.elapsed());
            // Fails only once the coordinator has stopped.
            let _ = ready.send(page);
        });
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            resident_pages: self.resident.pages().to_vec(),
            in_flight: self.inflight.pages(),
            ..self.stats.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counted {
        loads: AtomicUsize,
    }

    #[async_trait]
    impl CachedItem for Counted {
        async fn load(&self) -> Result<(), LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn unload(&self) {}
    }

    fn coordinator(len: usize) -> (Coordinator<Counted>, mpsc::UnboundedReceiver<usize>) {
        let items: Arc<[Counted]> = (0..len).map(|_| Counted::default()).collect();
        let layout = PageLayout::new(len, 2);
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let diagnostics = Diagnostics::new("test", len, 2, false);
        (
            Coordinator::new(items, layout, 5, diagnostics, ready_tx),
            ready_rx,
        )
    }

    #[test]
    #[should_panic(expected = "ready page 3 not in progress")]
    fn test_ready_for_untracked_page_panics() {
        let (mut coordinator, _ready) = coordinator(10);
        coordinator.on_ready(3);
    }

    #[tokio::test]
    async fn test_request_lifecycle() {
        let (mut coordinator, mut ready) = coordinator(10);

        let (req, mut reply) = Request::fetch(1);
        coordinator.on_request(req);
        coordinator.on_request(Request::prefetch(1));
        assert_eq!(coordinator.snapshot().in_flight, vec![1]);

        let page = ready.recv().await.unwrap();
        assert_eq!(page, 1);
        assert_eq!(coordinator.items[2].loads.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.items[3].loads.load(Ordering::SeqCst), 1);

        coordinator.on_ready(page);
        assert_eq!(reply.try_recv().unwrap(), 1);

        let (req, mut reply) = Request::fetch(1);
        coordinator.on_request(req);
        assert_eq!(reply.try_recv().unwrap(), 1);

        let stats = coordinator.snapshot();
        assert_eq!(stats.resident_pages, vec![1]);
        assert!(stats.in_flight.is_empty());
        assert_eq!(stats.pages_loaded, 1);
        assert_eq!(stats.dedup_joins, 1);
        assert_eq!(stats.hits, 1);
    }
}
