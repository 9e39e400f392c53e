//! Cache configuration.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `FOLIO_CACHE_NAME` | Name used in diagnostics (default: `cache`) |
//! | `FOLIO_PAGE_SIZE` | Items per page (default: 16) |
//! | `FOLIO_CACHE_CAPACITY` | Resident pages kept before eviction (default: 5) |
//! | `FOLIO_CACHE_VERBOSE` | Log page loads, evictions and timings (`1`/`true`) |

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Default number of resident pages.
pub const DEFAULT_CAPACITY: usize = 5;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 16;

/// Smallest capacity for which the eviction rule never evicts the page it is
/// inserting.
pub const MIN_CAPACITY: usize = 2;

/// Configuration for a [`PagedCache`](crate::PagedCache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Name used in diagnostics.
    pub name: String,

    /// Number of items per page. Must be positive.
    pub page_size: usize,

    /// Maximum number of resident pages.
    pub capacity: usize,

    /// Emit page load/evict/timing lines at `info`.
    pub verbose: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            page_size: DEFAULT_PAGE_SIZE,
            capacity: DEFAULT_CAPACITY,
            verbose: false,
        }
    }
}

fn default_name() -> String {
    "cache".to_string()
}

impl CacheConfig {
    /// Create a configuration with the given name and page size.
    pub fn new(name: impl Into<String>, page_size: usize) -> Self {
        Self {
            name: name.into(),
            page_size,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: std::env::var("FOLIO_CACHE_NAME").unwrap_or(defaults.name),
            page_size: std::env::var("FOLIO_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_size),
            capacity: std::env::var("FOLIO_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            verbose: std::env::var("FOLIO_CACHE_VERBOSE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.verbose),
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the number of resident pages.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Enable or disable verbose diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the configuration can back a cache.
    pub fn validate(&self) -> CacheResult<()> {
        if self.page_size == 0 {
            return Err(CacheError::InvalidConfig {
                message: "page_size must be greater than zero".into(),
            });
        }
        if self.capacity < MIN_CAPACITY {
            return Err(CacheError::InvalidConfig {
                message: format!(
                    "capacity must be at least {}, got {}",
                    MIN_CAPACITY, self.capacity
                ),
            });
        }
        Ok(())
    }
}
