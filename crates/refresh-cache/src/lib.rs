//! Periodic external-data cache.
//!
//! A [`RefreshCache`] holds the last good snapshot fetched through a
//! [`Provider`] and refreshes it in the background. Reads never touch the
//! network and never fail.

pub mod cache;
pub mod error;
pub mod provider;
pub mod snapshot;

pub use cache::{RefreshCache, RefreshOptions, RefreshOutcome, RefreshTask};
pub use error::CacheError;
pub use provider::Provider;
pub use snapshot::Snapshot;
