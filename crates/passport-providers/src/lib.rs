//! Provider strategies feeding the passport refresh caches.
//!
//! - Weather: OpenWeatherMap current conditions
//! - Uptime: UptimeRobot and Better Stack monitor lists
//!
//! Each strategy performs its own request and normalization and implements
//! [`refresh_cache::Provider`]; scheduling and failure policy live in the cache.

pub mod client;
pub mod uptime;
pub mod weather;

pub use client::build_client;
pub use uptime::{uptime_provider, BetterUptime, UptimeProviderKind, UptimeRobot, UptimeSettings};
pub use weather::{weather_provider, OpenWeatherMap, WeatherProviderKind, WeatherSettings};
