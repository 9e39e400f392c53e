use async_trait::async_trait;

use crate::error::LoadError;

/// Anything that can be lazily loaded and unloaded.
///
/// Items are shared between the caller and the cache's background tasks, so
/// both operations take `&self`; implementors keep their loaded state behind
/// their own interior mutability.
#[async_trait]
pub trait CachedItem: Send + Sync + 'static {
    /// Load the item and prepare it for use.
    ///
    /// Must be idempotent once it has succeeded and safe to retry after a
    /// failure.
    async fn load(&self) -> Result<(), LoadError>;

    /// Release the resources of the item. Safe to call on an item that is not
    /// loaded. To use the item again the caller must call [`load`](Self::load).
    async fn unload(&self);
}
