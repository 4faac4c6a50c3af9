//! Errors a refresh cache surfaces to its supervisor.

use passport_common::{ConfigError, FetchError};
use thiserror::Error;

/// Conditions under which a cache cannot do anything useful.
///
/// Ordinary fetch failures never show up here; they are logged and the
/// previous snapshot is kept.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache '{cache}' is misconfigured: {source}")]
    Config {
        cache: String,
        #[source]
        source: ConfigError,
    },

    /// The provider rejected the very first fetch, so there is nothing to fall back on.
    #[error("Cache '{cache}' has no data and the provider rejected the first fetch: {source}")]
    FirstFetchRejected {
        cache: String,
        #[source]
        source: FetchError,
    },

    #[error("Refresh task for cache '{cache}' panicked")]
    TaskPanicked { cache: String },
}

impl CacheError {
    pub fn cache(&self) -> &str {
        match self {
            CacheError::Config { cache, .. }
            | CacheError::FirstFetchRejected { cache, .. }
            | CacheError::TaskPanicked { cache } => cache,
        }
    }
}
