//! Per-page load and unload.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::item::CachedItem;
use crate::page::PageLayout;

/// Load every item of `page` concurrently and wait for all of them.
///
/// Individual failures are logged and dropped: the page counts as loaded once
/// every `load` has returned.
pub(crate) async fn load_page<E: CachedItem>(items: Arc<[E]>, layout: PageLayout, page: usize) {
    let mut join_set = JoinSet::new();
    for index in layout.items(page) {
        let items = Arc::clone(&items);
        join_set.spawn(async move { (index, items[index].load().await) });
    }

    while let Some(res) = join_set.join_next().await {
        match res {
            Ok((_, Ok(()))) => {}
            Ok((index, Err(e))) => debug!(page, index, error = %e, "item load failed"),
            Err(e) => debug!(page, error = %e, "item load task failed"),
        }
    }
}

/// Unload every item of `page` in the background.
pub(crate) fn unload_page<E: CachedItem>(items: &Arc<[E]>, layout: PageLayout, page: usize) {
    for index in layout.items(page) {
        spawn_unload(items, index);
    }
}

/// Unload every item in the background.
pub(crate) fn unload_all<E: CachedItem>(items: &Arc<[E]>) {
    for index in 0..items.len() {
        spawn_unload(items, index);
    }
}

fn spawn_unload<E: CachedItem>(items: &Arc<[E]>, index: usize) {
    let items = Arc::clone(items);
    tokio::spawn(async move { items[index].unload().await });
}
