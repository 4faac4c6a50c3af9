//! Immutable snapshot published by a refresh cache.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The last successfully fetched value and when it was obtained.
///
/// A snapshot is built completely before it is published, so readers only
/// ever see a whole value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<T> {
    pub value: T,
    /// `None` until the first successful fetch
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T: Default> Snapshot<T> {
    /// The zero snapshot a cache starts with.
    pub fn empty() -> Self {
        Self {
            value: T::default(),
            fetched_at: None,
        }
    }
}

impl<T> Snapshot<T> {
    pub fn populated(value: T, fetched_at: DateTime<Utc>) -> Self {
        Self {
            value,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn is_populated(&self) -> bool {
        self.fetched_at.is_some()
    }

    /// Seconds since the snapshot was fetched.
    pub fn age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.fetched_at.map(|t| (now - t).num_seconds())
    }
}
