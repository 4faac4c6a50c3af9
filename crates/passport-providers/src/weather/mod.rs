//! Weather provider strategies.

mod openweathermap;

use std::fmt;
use std::str::FromStr;

use passport_common::{ConfigError, Units, WeatherReading};
use refresh_cache::Provider;
use reqwest::Client;

pub use openweathermap::OpenWeatherMap;

/// Supported weather backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeatherProviderKind {
    #[default]
    OpenWeatherMap,
}

impl FromStr for WeatherProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "openweathermap" => Ok(WeatherProviderKind::OpenWeatherMap),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for WeatherProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherProviderKind::OpenWeatherMap => f.write_str("openweathermap"),
        }
    }
}

/// Static weather settings, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct WeatherSettings {
    pub provider: WeatherProviderKind,
    pub api_key: String,
    pub units: Units,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Override for the provider's API root, e.g. a caching proxy
    pub base_url: Option<String>,
}

/// Build the configured weather strategy.
pub fn weather_provider(
    settings: WeatherSettings,
    client: Client,
) -> Box<dyn Provider<Output = WeatherReading>> {
    match settings.provider {
        WeatherProviderKind::OpenWeatherMap => Box::new(OpenWeatherMap::new(settings, client)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(
            "OpenWeatherMap".parse::<WeatherProviderKind>().unwrap(),
            WeatherProviderKind::OpenWeatherMap
        );
        assert_eq!(
            "weatherapi".parse::<WeatherProviderKind>().unwrap_err(),
            ConfigError::UnsupportedProvider("weatherapi".to_string())
        );
    }
}
