use std::time::Duration;

use tracing::info;

/// Page load/evict/timing lines, emitted only when the cache is verbose.
#[derive(Debug, Clone)]
pub(crate) struct Diagnostics {
    name: String,
    items: usize,
    page_size: usize,
    enabled: bool,
}

impl Diagnostics {
    pub(crate) fn new(name: &str, items: usize, page_size: usize, enabled: bool) -> Self {
        Self {
            name: name.to_string(),
            items,
            page_size,
            enabled,
        }
    }

    pub(crate) fn created(&self, pages: usize) {
        if self.enabled {
            info!(
                cache = %self.name,
                items = self.items,
                page_size = self.page_size,
                pages,
                "cache created"
            );
        }
    }

    pub(crate) fn page_loaded(&self, page: usize, elapsed: Duration) {
        if self.enabled {
            info!(
                cache = %self.name,
                items = self.items,
                page_size = self.page_size,
                page,
                ?elapsed,
                "load page"
            );
        }
    }

    pub(crate) fn page_evicted(&self, page: usize) {
        if self.enabled {
            info!(
                cache = %self.name,
                items = self.items,
                page_size = self.page_size,
                page,
                "evicted page"
            );
        }
    }

    pub(crate) fn resident(&self, pages: &[usize], capacity: usize) {
        if self.enabled {
            info!(
                cache = %self.name,
                items = self.items,
                page_size = self.page_size,
                ?pages,
                capacity,
                "resident pages"
            );
        }
    }
}
