//! Snapshot cache kept fresh by a background refresh task.
//!
//! Each cache instance has:
//! - One published snapshot behind a `watch` channel (readers never wait)
//! - One background task refreshing on a fixed interval
//! - A coalescing refresh trigger (at most one pending request)
//!
//! Fetch failures keep the previous snapshot. The only failure that stops
//! the task is a provider rejecting the first fetch while nothing has been
//! published yet; it is returned through [`RefreshTask`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use metrics::{counter, gauge, histogram};
use passport_common::{ConfigError, FetchError};
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use crate::error::CacheError;
use crate::provider::Provider;
use crate::snapshot::Snapshot;

/// Longest accepted refresh interval.
const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Scheduling settings for one cache.
#[derive(Debug, Clone, Copy)]
pub struct RefreshOptions {
    /// Time between scheduled refreshes
    pub interval: Duration,
    /// Upper bound on a single provider fetch
    pub fetch_timeout: Duration,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl RefreshOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::Invalid {
                setting: "interval",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.interval > MAX_INTERVAL {
            return Err(ConfigError::Invalid {
                setting: "interval",
                message: format!("must be at most {} seconds", MAX_INTERVAL.as_secs()),
            });
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                setting: "fetch_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of a non-fatal refresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A new snapshot was published.
    Updated,
    /// The fetch failed and the previous snapshot was kept.
    Kept(FetchError),
}

struct Shared<T: Clone + Default + Send + Sync + 'static> {
    name: String,
    provider: Box<dyn Provider<Output = T>>,
    options: RefreshOptions,
    snapshot: watch::Sender<Arc<Snapshot<T>>>,
    wake: Notify,
    /// Serializes writers; readers never touch it.
    refresh_lock: Mutex<()>,
}

/// Handle to a refresh cache. Cheap to clone; all clones share one snapshot.
pub struct RefreshCache<T: Clone + Default + Send + Sync + 'static> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Default + Send + Sync + 'static> Clone for RefreshCache<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> RefreshCache<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    /// Validate the provider and options and build an empty cache.
    ///
    /// Nothing is fetched until [`RefreshCache::start`] is called.
    pub fn new<P>(name: impl Into<String>, provider: P, options: RefreshOptions) -> Result<Self, CacheError>
    where
        P: Provider<Output = T>,
    {
        let name = name.into();

        if let Err(source) = provider.validate().and_then(|_| options.validate()) {
            return Err(CacheError::Config { cache: name, source });
        }

        info!(
            cache = %name,
            provider = %provider.name(),
            interval_secs = options.interval.as_secs(),
            fetch_timeout_secs = options.fetch_timeout.as_secs(),
            "Initializing refresh cache"
        );

        let (snapshot, _) = watch::channel(Arc::new(Snapshot::empty()));

        Ok(Self {
            shared: Arc::new(Shared {
                name,
                provider: Box::new(provider),
                options,
                snapshot,
                wake: Notify::new(),
                refresh_lock: Mutex::new(()),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Current value, or `T::default()` before the first successful fetch.
    pub fn read(&self) -> T {
        self.shared.snapshot.borrow().value.clone()
    }

    /// Current snapshot including its fetch timestamp.
    pub fn snapshot(&self) -> Arc<Snapshot<T>> {
        self.shared.snapshot.borrow().clone()
    }

    pub fn is_populated(&self) -> bool {
        self.shared.snapshot.borrow().is_populated()
    }

    /// Receiver notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot<T>>> {
        self.shared.snapshot.subscribe()
    }

    /// Ask the background task to refresh as soon as it can.
    ///
    /// Never waits. Requests made while one is already pending collapse into it.
    pub fn trigger_refresh(&self) {
        debug!(cache = %self.shared.name, "Refresh requested");
        self.shared.wake.notify_one();
    }

    /// Fetch once and publish the result if it succeeded.
    ///
    /// Returns `Err` only when the provider rejects a fetch while no
    /// snapshot has ever been published.
    #[instrument(skip(self), fields(cache = %self.shared.name))]
    pub async fn refresh_once(&self) -> Result<RefreshOutcome, CacheError> {
        let shared = &self.shared;
        let _guard = shared.refresh_lock.lock().await;

        let started = Instant::now();
        let result = match tokio::time::timeout(shared.options.fetch_timeout, shared.provider.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout),
        };
        let elapsed = started.elapsed();

        histogram!("passport_refresh_duration_seconds", "cache" => shared.name.clone())
            .record(elapsed.as_secs_f64());

        match result {
            Ok(value) => {
                let fetched_at = Utc::now();
                shared
                    .snapshot
                    .send_replace(Arc::new(Snapshot::populated(value, fetched_at)));

                counter!("passport_refresh_total", "cache" => shared.name.clone(), "outcome" => "updated")
                    .increment(1);
                gauge!("passport_last_success_timestamp_seconds", "cache" => shared.name.clone())
                    .set(fetched_at.timestamp() as f64);

                debug!(elapsed_ms = elapsed.as_millis() as u64, "Snapshot updated");
                Ok(RefreshOutcome::Updated)
            }
            Err(e) if e.is_provider() && !self.is_populated() => {
                counter!("passport_refresh_total", "cache" => shared.name.clone(), "outcome" => "fatal")
                    .increment(1);
                error!(error = %e, "Provider rejected the first fetch, no data to fall back on");
                Err(CacheError::FirstFetchRejected {
                    cache: shared.name.clone(),
                    source: e,
                })
            }
            Err(e) => {
                counter!("passport_refresh_total", "cache" => shared.name.clone(), "outcome" => e.kind())
                    .increment(1);
                warn!(
                    error = %e,
                    kind = e.kind(),
                    populated = self.is_populated(),
                    "Refresh failed, keeping previous snapshot"
                );
                Ok(RefreshOutcome::Kept(e))
            }
        }
    }

    /// Spawn the background refresh task.
    ///
    /// The first refresh runs immediately, then on every interval tick and
    /// on every (coalesced) trigger.
    pub fn start(&self) -> RefreshTask {
        let cache = self.clone();
        let handle = tokio::spawn(async move { cache.run().await });
        RefreshTask {
            cache: self.shared.name.clone(),
            handle,
        }
    }

    async fn run(self) -> Result<(), CacheError> {
        let mut ticker = tokio::time::interval(self.shared.options.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(cache = %self.shared.name, "Starting refresh loop");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    debug!(cache = %self.shared.name, "Scheduled refresh");
                }
                _ = self.shared.wake.notified() => {
                    debug!(cache = %self.shared.name, "Triggered refresh");
                }
            }

            self.refresh_once().await?;
        }
    }
}

/// Supervisor side of a running cache.
///
/// The task only ends on its own with a fatal [`CacheError`]; the
/// supervising code decides what that means for the process.
pub struct RefreshTask {
    cache: String,
    handle: JoinHandle<Result<(), CacheError>>,
}

impl RefreshTask {
    pub fn cache(&self) -> &str {
        &self.cache
    }

    /// Wait for the task to stop and report why.
    pub async fn join(self) -> Result<(), CacheError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(_) => Err(CacheError::TaskPanicked { cache: self.cache }),
        }
    }

    /// Abandon the task. There is no state to flush.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
