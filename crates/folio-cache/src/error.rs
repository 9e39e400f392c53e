//! Error types for the paged cache.

/// Failure to materialize a single item.
///
/// Items raise this from [`CachedItem::load`](crate::CachedItem::load). The
/// cache itself never surfaces it: page bookkeeping only cares that every load
/// returned, not whether it succeeded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The backing resource does not exist.
    #[error("item not found: {item}")]
    Missing { item: String },

    /// The backing resource exists but could not be read.
    #[error("failed to read {item}: {source}")]
    Unreadable {
        item: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource was read but its contents are not usable.
    #[error("failed to decode {item}: {reason}")]
    Undecodable { item: String, reason: String },
}

/// Cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Configuration rejected by [`CacheConfig::validate`](crate::CacheConfig::validate).
    #[error("invalid cache configuration: {message}")]
    InvalidConfig { message: String },

    /// The cache was created outside a tokio runtime.
    #[error("paged cache requires a running tokio runtime")]
    NoRuntime,

    /// The coordinator task is gone and can no longer answer requests.
    #[error("cache coordinator stopped")]
    Stopped,
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::Undecodable {
            item: "photos/0001.png".into(),
            reason: "bad header".into(),
        };
        assert_eq!(err.to_string(), "failed to decode photos/0001.png: bad header");

        let err = LoadError::Unreadable {
            item: "photos/0002.png".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().starts_with("failed to read photos/0002.png"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
