//! Application state shared by the HTTP handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use passport_common::{SiteStatus, WeatherReading};
use passport_providers::{build_client, uptime_provider, weather_provider};
use refresh_cache::{CacheError, RefreshCache, RefreshOptions, RefreshTask};
use tracing::info;

use crate::config::{Config, SearchSettings};

pub type WeatherCache = RefreshCache<WeatherReading>;
pub type UptimeCache = RefreshCache<Vec<SiteStatus>>;

/// Caches for the enabled widgets plus static page settings.
///
/// Handlers only read from here; the caches are filled by their own tasks.
pub struct AppState {
    pub search: SearchSettings,
    pub weather: Option<WeatherCache>,
    pub uptime: Option<UptimeCache>,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build a cache for every enabled widget. Nothing is fetched yet.
    pub fn from_config(config: &Config) -> Result<Self, CacheError> {
        let client = build_client(config.fetch_timeout).map_err(|source| CacheError::Config {
            cache: "http".to_string(),
            source,
        })?;

        let weather = match &config.weather {
            Some(widget) => {
                info!(
                    provider = %widget.settings.provider,
                    units = %widget.settings.units,
                    interval_secs = widget.interval.as_secs(),
                    "Weather widget enabled"
                );
                let provider = weather_provider(widget.settings.clone(), client.clone());
                Some(RefreshCache::new(
                    "weather",
                    provider,
                    RefreshOptions {
                        interval: widget.interval,
                        fetch_timeout: config.fetch_timeout,
                    },
                )?)
            }
            None => None,
        };

        let uptime = match &config.uptime {
            Some(widget) => {
                info!(
                    provider = %widget.settings.provider,
                    interval_secs = widget.interval.as_secs(),
                    "Uptime widget enabled"
                );
                let provider = uptime_provider(widget.settings.clone(), client);
                Some(RefreshCache::new(
                    "uptime",
                    provider,
                    RefreshOptions {
                        interval: widget.interval,
                        fetch_timeout: config.fetch_timeout,
                    },
                )?)
            }
            None => None,
        };

        Ok(Self {
            search: config.search.clone(),
            weather,
            uptime,
            prometheus: None,
        })
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Spawn the refresh task of every enabled cache.
    pub fn start_caches(&self) -> Vec<RefreshTask> {
        let mut tasks = Vec::new();
        if let Some(weather) = &self.weather {
            tasks.push(weather.start());
        }
        if let Some(uptime) = &self.uptime {
            tasks.push(uptime.start());
        }
        tasks
    }

    /// Request an out-of-band refresh on every enabled cache.
    pub fn trigger_refresh(&self) -> Vec<&str> {
        let mut triggered = Vec::new();
        if let Some(weather) = &self.weather {
            weather.trigger_refresh();
            triggered.push(weather.name());
        }
        if let Some(uptime) = &self.uptime {
            uptime.trigger_refresh();
            triggered.push(uptime.name());
        }
        triggered
    }
}
