//! Scan report.
//!
//! Schema: folio-scan-v1. Fields may be added within v1; renames or removals
//! bump the version.

use folio_cache::CacheStats;
use serde::Serialize;

use crate::cli::args::Pattern;

pub const SCHEMA_VERSION: &str = "folio-scan-v1";

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub schema_version: String,
    pub cache_name: String,
    pub pattern: Pattern,
    pub items: usize,
    pub page_size: usize,
    pub capacity: usize,
    pub pages: usize,
    /// Item accesses made through the cache.
    pub accesses: usize,
    pub elapsed_ms: u64,
    /// Coordinator counters taken just before the cache was freed.
    pub cache: CacheStats,
    pub items_loaded: u64,
    pub items_unloaded: u64,
    pub load_failures: u64,
    /// Items materialized more than once (evicted, then needed again).
    pub reloaded_items: usize,
    /// Whether every item saw an unload before the unload timeout.
    pub all_unloaded: bool,
}
