//! Paged cache facade.
//!
//! The item collection is split into pages of `page_size` items. Accessing an
//! item loads its page and asks for the neighbouring pages in the background;
//! at most `capacity` pages stay loaded.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::config::CacheConfig;
use crate::coordinator::{CacheStats, Coordinator, Message};
use crate::diagnostics::Diagnostics;
use crate::error::{CacheError, CacheResult};
use crate::inflight::Request;
use crate::item::CachedItem;
use crate::page::PageLayout;
use crate::slice::CachedSlice;
use crate::worker;

/// A [`CachedSlice`] that loads and evicts whole pages of items.
///
/// Must be created inside a tokio runtime: a coordinator task is spawned at
/// construction and runs until [`free`](Self::free) or drop. Dropping the cache
/// without `free` stops the coordinator but leaves loaded items loaded.
pub struct PagedCache<E: CachedItem> {
    name: String,
    items: Arc<[E]>,
    layout: PageLayout,
    requests: mpsc::UnboundedSender<Message>,
    runtime: Handle,
}

impl<E: CachedItem> PagedCache<E> {
    /// Create a cache over `items` and start its coordinator.
    pub fn new(items: Vec<E>, config: CacheConfig) -> CacheResult<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| CacheError::NoRuntime)?;

        let items: Arc<[E]> = items.into();
        let layout = PageLayout::new(items.len(), config.page_size);
        let diagnostics = Diagnostics::new(
            &config.name,
            layout.len(),
            layout.page_size(),
            config.verbose,
        );
        diagnostics.created(layout.page_count());

        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let coordinator = Coordinator::new(
            Arc::clone(&items),
            layout,
            config.capacity,
            diagnostics,
            ready_tx,
        );
        runtime.spawn(coordinator.run(requests_rx, ready_rx));

        Ok(Self {
            name: config.name,
            items,
            layout,
            requests: requests_tx,
            runtime,
        })
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_size(&self) -> usize {
        self.layout.page_size()
    }

    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }

    /// Return the item at `index` once its page is loaded.
    ///
    /// The previous and next pages are requested in the background. Returns
    /// `Ok(None)` without touching the cache when `index` is out of range.
    pub async fn at(&self, index: usize) -> CacheResult<Option<&E>> {
        let Some(item) = self.items.get(index) else {
            return Ok(None);
        };

        let page = self.layout.page_of(index);
        if let Some(prev) = page.checked_sub(1) {
            self.fetch_later(prev)?;
        }
        self.fetch_later(page + 1)?;
        self.fetch_now(page).await?;
        Ok(Some(item))
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot of the resident pages, loads in progress and counters.
    pub async fn stats(&self) -> CacheResult<CacheStats> {
        let (tx, rx) = oneshot::channel();
        self.send(Message::Stats(tx))?;
        rx.await.map_err(|_| CacheError::Stopped)
    }

    /// Stop the coordinator and unload every item in the background.
    ///
    /// Loads already in progress are not awaited; an item whose page was still
    /// loading may finish loading after its unload was issued.
    pub fn free(self) {
        let Self {
            items,
            requests,
            runtime,
            ..
        } = self;
        drop(requests);
        let _guard = runtime.enter();
        worker::unload_all(&items);
    }

    /// Request a page and wait until it is resident.
    async fn fetch_now(&self, page: usize) -> CacheResult<()> {
        let (req, done) = Request::fetch(page);
        self.send(Message::Fetch(req))?;
        done.await.map(|_| ()).map_err(|_| CacheError::Stopped)
    }

    /// Request a page to be loaded in the background. Pages past the end are
    /// ignored.
    fn fetch_later(&self, page: usize) -> CacheResult<()> {
        if !self.layout.has_page(page) {
            return Ok(());
        }
        self.send(Message::Fetch(Request::prefetch(page)))
    }

    fn send(&self, msg: Message) -> CacheResult<()> {
        self.requests.send(msg).map_err(|_| CacheError::Stopped)
    }
}

#[async_trait]
impl<E: CachedItem> CachedSlice for PagedCache<E> {
    type Item = E;

    async fn at(&self, index: usize) -> CacheResult<Option<&E>> {
        PagedCache::at(self, index).await
    }

    fn len(&self) -> usize {
        PagedCache::len(self)
    }

    fn free(self) {
        PagedCache::free(self)
    }
}

impl<E: CachedItem> std::fmt::Debug for PagedCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedCache")
            .field("name", &self.name)
            .field("len", &self.layout.len())
            .field("page_size", &self.layout.page_size())
            .finish()
    }
}
