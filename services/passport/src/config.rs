//! Service configuration.
//!
//! Everything comes from the command line or the environment (a `.env` file
//! is loaded first by `main`). Older variable names from before the provider
//! split are still accepted behind `PASSPORT_ENABLE_WEATHER` and
//! `PASSPORT_ENABLE_UPTIME`.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use passport_common::{ConfigError, Units};
use passport_providers::{UptimeProviderKind, UptimeSettings, WeatherProviderKind, WeatherSettings};
use tracing::warn;

const DEFAULT_WEATHER_INTERVAL_MINS: u64 = 15;
const DEFAULT_UPTIME_INTERVAL_SECS: u64 = 300;

#[derive(Parser, Debug, Clone)]
#[command(name = "passport")]
#[command(about = "Start page with cached weather and uptime widgets")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "PASSPORT_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: String,

    /// Log level
    #[arg(long, env = "PASSPORT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "PASSPORT_LOG_JSON")]
    pub log_json: bool,

    /// Search provider URL used by the search box
    #[arg(long, env = "PASSPORT_SEARCH_PROVIDER", default_value = "")]
    pub search_provider: String,

    /// Query parameter the search provider expects
    #[arg(long, env = "PASSPORT_SEARCH_PROVIDER_QUERY_PARAM", default_value = "q")]
    pub search_query_param: String,

    /// Upper bound for a single provider request, in seconds
    #[arg(long, env = "PASSPORT_FETCH_TIMEOUT", default_value = "10")]
    pub fetch_timeout: u64,

    // ---- Weather ----
    /// Weather API key; the weather widget is enabled when set
    #[arg(long, env = "PASSPORT_WEATHER_API_KEY")]
    pub weather_api_key: Option<String>,

    #[arg(long, env = "WEATHER_PROVIDER")]
    pub weather_provider: Option<String>,

    /// metric, imperial or standard
    #[arg(long, env = "WEATHER_TEMP_UNITS")]
    pub weather_temp_units: Option<String>,

    #[arg(long, env = "WEATHER_LAT", allow_negative_numbers = true)]
    pub weather_lat: Option<f64>,

    #[arg(long, env = "WEATHER_LON", allow_negative_numbers = true)]
    pub weather_lon: Option<f64>,

    /// Minutes between weather refreshes
    #[arg(long, env = "WEATHER_UPDATE_INTERVAL", allow_negative_numbers = true)]
    pub weather_update_interval: Option<i64>,

    /// Override the weather provider's API root
    #[arg(long, env = "WEATHER_API_BASE_URL")]
    pub weather_base_url: Option<String>,

    // ---- Uptime ----
    /// Uptime API key; the uptime widget is enabled when set
    #[arg(long, env = "PASSPORT_UPTIME_API_KEY")]
    pub uptime_api_key: Option<String>,

    /// uptimerobot or betteruptime
    #[arg(long, env = "UPTIME_PROVIDER")]
    pub uptime_provider: Option<String>,

    /// Seconds between uptime refreshes
    #[arg(long, env = "UPTIME_UPDATE_INTERVAL", allow_negative_numbers = true)]
    pub uptime_update_interval: Option<i64>,

    /// Override the uptime provider's API root
    #[arg(long, env = "UPTIME_API_BASE_URL")]
    pub uptime_base_url: Option<String>,

    // ---- Deprecated ----
    #[arg(long, env = "PASSPORT_ENABLE_WEATHER", hide = true)]
    pub enable_weather: bool,

    #[arg(long, env = "OPENWEATHER_PROVIDER", hide = true)]
    pub openweather_provider: Option<String>,

    #[arg(long, env = "OPENWEATHER_API_KEY", hide = true)]
    pub openweather_api_key: Option<String>,

    #[arg(long, env = "OPENWEATHER_TEMP_UNITS", hide = true)]
    pub openweather_temp_units: Option<String>,

    #[arg(long, env = "OPENWEATHER_LAT", hide = true, allow_negative_numbers = true)]
    pub openweather_lat: Option<f64>,

    #[arg(long, env = "OPENWEATHER_LON", hide = true, allow_negative_numbers = true)]
    pub openweather_lon: Option<f64>,

    #[arg(long, env = "OPENWEATHER_UPDATE_INTERVAL", hide = true, allow_negative_numbers = true)]
    pub openweather_update_interval: Option<i64>,

    #[arg(long, env = "PASSPORT_ENABLE_UPTIME", hide = true)]
    pub enable_uptime: bool,

    #[arg(long, env = "UPTIMEROBOT_API_KEY", hide = true)]
    pub uptimerobot_api_key: Option<String>,

    #[arg(long, env = "UPTIMEROBOT_UPDATE_INTERVAL", hide = true, allow_negative_numbers = true)]
    pub uptimerobot_update_interval: Option<i64>,
}

/// Search box settings, passed through to the page as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSettings {
    pub url: String,
    pub query_param: String,
}

#[derive(Debug, Clone)]
pub struct WeatherWidget {
    pub settings: WeatherSettings,
    pub interval: Duration,
}

#[derive(Debug, Clone)]
pub struct UptimeWidget {
    pub settings: UptimeSettings,
    pub interval: Duration,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub search: SearchSettings,
    pub fetch_timeout: Duration,
    /// `None` when the weather widget is disabled
    pub weather: Option<WeatherWidget>,
    /// `None` when the uptime widget is disabled
    pub uptime: Option<UptimeWidget>,
}

impl Args {
    /// Validate and resolve into a [`Config`], applying defaults and
    /// deprecated fallbacks.
    pub fn resolve(self) -> Result<Config, ConfigError> {
        let listen = self.listen.parse().map_err(|e| ConfigError::Invalid {
            setting: "PASSPORT_LISTEN",
            message: format!("{}: {}", self.listen, e),
        })?;

        if self.fetch_timeout == 0 {
            return Err(ConfigError::Invalid {
                setting: "PASSPORT_FETCH_TIMEOUT",
                message: "must be at least one second".to_string(),
            });
        }

        Ok(Config {
            listen,
            search: SearchSettings {
                url: self.search_provider.clone(),
                query_param: self.search_query_param.clone(),
            },
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            weather: self.weather()?,
            uptime: self.uptime()?,
        })
    }

    fn weather(&self) -> Result<Option<WeatherWidget>, ConfigError> {
        if let Some(api_key) = present(&self.weather_api_key) {
            let widget = WeatherWidget {
                settings: WeatherSettings {
                    provider: parse_or_default::<WeatherProviderKind>(&self.weather_provider)?,
                    api_key,
                    units: parse_or_default::<Units>(&self.weather_temp_units)?,
                    lat: self.weather_lat,
                    lon: self.weather_lon,
                    base_url: self.weather_base_url.clone(),
                },
                interval: minutes_or_default(self.weather_update_interval, "WEATHER_UPDATE_INTERVAL")?,
            };
            return Ok(Some(widget));
        }

        if !self.enable_weather {
            return Ok(None);
        }

        warn!("Deprecated weather settings in use, switch to PASSPORT_WEATHER_API_KEY and WEATHER_*");

        let api_key =
            present(&self.openweather_api_key).ok_or(ConfigError::Missing("OPENWEATHER_API_KEY"))?;

        Ok(Some(WeatherWidget {
            settings: WeatherSettings {
                provider: parse_or_default::<WeatherProviderKind>(&self.openweather_provider)?,
                api_key,
                units: parse_or_default::<Units>(&self.openweather_temp_units)?,
                lat: self.openweather_lat,
                lon: self.openweather_lon,
                base_url: self.weather_base_url.clone(),
            },
            interval: minutes_or_default(
                self.openweather_update_interval,
                "OPENWEATHER_UPDATE_INTERVAL",
            )?,
        }))
    }

    fn uptime(&self) -> Result<Option<UptimeWidget>, ConfigError> {
        if let Some(api_key) = present(&self.uptime_api_key) {
            return Ok(Some(UptimeWidget {
                settings: UptimeSettings {
                    provider: parse_or_default::<UptimeProviderKind>(&self.uptime_provider)?,
                    api_key,
                    base_url: self.uptime_base_url.clone(),
                },
                interval: seconds_or_default(self.uptime_update_interval),
            }));
        }

        if !self.enable_uptime {
            return Ok(None);
        }

        warn!("Deprecated uptime settings in use, switch to PASSPORT_UPTIME_API_KEY and UPTIME_*");

        let api_key =
            present(&self.uptimerobot_api_key).ok_or(ConfigError::Missing("UPTIMEROBOT_API_KEY"))?;

        // The old settings only ever supported UptimeRobot
        Ok(Some(UptimeWidget {
            settings: UptimeSettings {
                provider: UptimeProviderKind::UptimeRobot,
                api_key,
                base_url: self.uptime_base_url.clone(),
            },
            interval: seconds_or_default(self.uptimerobot_update_interval),
        }))
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_or_default<T>(value: &Option<String>) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ConfigError> + Default,
{
    match present(value) {
        Some(v) => v.parse(),
        None => Ok(T::default()),
    }
}

fn minutes_or_default(value: Option<i64>, setting: &'static str) -> Result<Duration, ConfigError> {
    match value {
        Some(mins) if mins >= 1 => (mins as u64)
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Invalid {
                setting,
                message: format!("{} minutes is out of range", mins),
            }),
        _ => Ok(Duration::from_secs(DEFAULT_WEATHER_INTERVAL_MINS * 60)),
    }
}

fn seconds_or_default(value: Option<i64>) -> Duration {
    match value {
        Some(secs) if secs >= 1 => Duration::from_secs(secs as u64),
        _ => Duration::from_secs(DEFAULT_UPTIME_INTERVAL_SECS),
    }
}
