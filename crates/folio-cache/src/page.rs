use std::ops::Range;

/// Splits `len` items into pages of `page_size` items. The last page may be
/// short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageLayout {
    len: usize,
    page_size: usize,
}

impl PageLayout {
    /// `page_size` must be positive; callers validate it first.
    pub(crate) fn new(len: usize, page_size: usize) -> Self {
        debug_assert!(page_size > 0);
        Self { len, page_size }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn page_count(&self) -> usize {
        self.len.div_ceil(self.page_size)
    }

    pub(crate) fn page_of(&self, index: usize) -> usize {
        index / self.page_size
    }

    pub(crate) fn has_page(&self, page: usize) -> bool {
        page < self.page_count()
    }

    /// Item indices of `page`. Empty for pages past the end.
    pub(crate) fn items(&self, page: usize) -> Range<usize> {
        let begin = page.saturating_mul(self.page_size).min(self.len);
        let end = begin.saturating_add(self.page_size).min(self.len);
        begin..end
    }
}
