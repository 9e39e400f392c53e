//! Bookkeeping of resident pages.
//!
//! Access is mostly sequential (paging forward and back through a listing), so
//! eviction keeps a window of page numbers around recent activity instead of
//! tracking recency. When a page is inserted into a full set it is placed
//! among the resident pages by number: landing in the upper half drops the
//! smallest page, landing in the lower half drops the largest. Random access
//! defeats this; that is accepted.

/// Fixed-capacity set of resident page numbers.
#[derive(Debug, Clone)]
pub(crate) struct ResidentPages {
    pages: Vec<usize>,
    capacity: usize,
}

impl ResidentPages {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            pages: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub(crate) fn contains(&self, page: usize) -> bool {
        self.pages.contains(&page)
    }

    pub(crate) fn pages(&self) -> &[usize] {
        &self.pages
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add `page`, returning the page evicted to make room for it.
    pub(crate) fn add(&mut self, page: usize) -> Option<usize> {
        if self.contains(page) {
            return None;
        }

        self.pages.push(page);
        if self.pages.len() <= self.capacity {
            return None;
        }

        self.pages.sort_unstable();
        let i = self
            .pages
            .binary_search(&page)
            .unwrap_or_else(|_| unreachable!("page {page} was just inserted"));
        // i >= C - i - 1, without underflow
        let evicted = if 2 * i + 1 >= self.capacity {
            self.pages.remove(0)
        } else {
            self.pages.remove(self.capacity)
        };
        Some(evicted)
    }
}
