//! The indexed-access abstraction the presentation layer holds, and range
//! iteration on top of it.

use async_trait::async_trait;
use futures::stream::{self, Stream};
use tracing::warn;

use crate::error::CacheResult;
use crate::item::CachedItem;

/// An ordered collection of [`CachedItem`]s that keeps some of them loaded.
#[async_trait]
pub trait CachedSlice: Send + Sync {
    type Item: CachedItem;

    /// Return the item at `index`, loaded. `Ok(None)` when `index` is out of
    /// range.
    async fn at(&self, index: usize) -> CacheResult<Option<&Self::Item>>;

    /// Number of items in the slice.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear the cache and unload every item. The slice cannot be used after this.
    fn free(self)
    where
        Self: Sized;
}

/// Lazily yield the items in `[from, to)`, in order.
///
/// Each item is fetched with [`CachedSlice::at`] only when the stream is
/// polled for it. The stream ends at `to`, at the first index out of range, or
/// at the first error. Calling `get` again walks the range from `from` anew.
pub fn get<C>(cache: &C, from: usize, to: usize) -> impl Stream<Item = &C::Item> + '_
where
    C: CachedSlice + ?Sized,
{
    stream::unfold(from, move |index| async move {
        if index >= to {
            return None;
        }
        match cache.at(index).await {
            Ok(Some(item)) => Some((item, index + 1)),
            Ok(None) => None,
            Err(e) => {
                warn!(index, error = %e, "stopping range iteration");
                None
            }
        }
    })
}
