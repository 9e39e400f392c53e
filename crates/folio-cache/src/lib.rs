//! Paged, prefetching cache for lazily loaded item collections.
//!
//! A [`PagedCache`] sits between a large ordered collection of
//! [`CachedItem`]s and a consumer that reads them by index, one screenful at a
//! time:
//!
//! - accessing an item loads the page around it and prefetches its neighbours
//! - at most `capacity` pages stay resident; the rest are unloaded
//! - a page is never loaded twice at once, and concurrent readers of the same
//!   page wait on a single load
//!
//! All cache state is owned by a single coordinator task; readers and page
//! workers only exchange messages with it.
//!
//! # Quick Start
//!
//! ```no_run
//! use async_trait::async_trait;
//! use folio_cache::{get, CacheConfig, CachedItem, LoadError, PagedCache};
//! use futures::StreamExt;
//!
//! struct Thumbnail {
//!     path: String,
//! }
//!
//! #[async_trait]
//! impl CachedItem for Thumbnail {
//!     async fn load(&self) -> Result<(), LoadError> {
//!         Ok(())
//!     }
//!
//!     async fn unload(&self) {}
//! }
//!
//! # async fn example() -> anyhow::Result<()> {
//! let thumbs = (0..1000)
//!     .map(|i| Thumbnail { path: format!("img/{i:04}.png") })
//!     .collect();
//! let cache = PagedCache::new(thumbs, CacheConfig::new("icons", 24))?;
//!
//! // One screenful.
//! let screen: Vec<_> = get(&cache, 48, 72).collect().await;
//! println!("showing {} from {}", screen.len(), screen[0].path);
//!
//! cache.free();
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! See [`CacheConfig`]; [`CacheConfig::from_env`] reads `FOLIO_*` variables.

mod cache;
pub mod config;
mod coordinator;
mod diagnostics;
pub mod error;
mod inflight;
mod item;
mod page;
mod resident;
mod slice;
mod worker;

pub use cache::PagedCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY, DEFAULT_PAGE_SIZE};
pub use coordinator::CacheStats;
pub use error::{CacheError, CacheResult, LoadError};
pub use item::CachedItem;
pub use slice::{get, CachedSlice};
