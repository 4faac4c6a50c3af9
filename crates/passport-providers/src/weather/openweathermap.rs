//! OpenWeatherMap current-weather strategy.

use async_trait::async_trait;
use passport_common::{ConfigError, FetchError, WeatherReading};
use refresh_cache::Provider;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::WeatherSettings;
use crate::client::{self, Fetched};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    main: Option<Measurements>,
    /// Numeric on success, sometimes a numeric string on errors
    #[serde(default)]
    cod: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(rename = "main")]
    name: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct Measurements {
    temp: f64,
}

/// Fetches current conditions for a fixed coordinate.
pub struct OpenWeatherMap {
    client: Client,
    base_url: String,
    settings: WeatherSettings,
}

impl OpenWeatherMap {
    pub fn new(settings: WeatherSettings, client: Client) -> Self {
        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            settings,
        }
    }
}

#[async_trait]
impl Provider for OpenWeatherMap {
    type Output = WeatherReading;

    fn name(&self) -> &str {
        "openweathermap"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("weather API key"));
        }

        let lat = self.settings.lat.ok_or(ConfigError::Missing("weather latitude"))?;
        let lon = self.settings.lon.ok_or(ConfigError::Missing("weather longitude"))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(ConfigError::Invalid {
                setting: "weather latitude",
                message: format!("{} is outside -90..90", lat),
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ConfigError::Invalid {
                setting: "weather longitude",
                message: format!("{} is outside -180..180", lon),
            });
        }

        Ok(())
    }

    #[instrument(skip(self), fields(provider = "openweathermap"))]
    async fn fetch(&self) -> Result<WeatherReading, FetchError> {
        // validate() guarantees both are present
        let lat = self.settings.lat.unwrap_or_default();
        let lon = self.settings.lon.unwrap_or_default();

        let request = self
            .client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.settings.api_key.clone()),
                ("units", self.settings.units.to_string()),
            ]);

        let fetched = client::send(request).await?;
        normalize(&fetched)
    }
}

fn normalize(fetched: &Fetched) -> Result<WeatherReading, FetchError> {
    let response: CurrentWeather = fetched.json()?;

    let code = match response.cod.as_ref() {
        Some(value) => parse_code(value),
        None => return Err(FetchError::Decode("missing field `cod`".to_string())),
    };

    if code != Some(200) {
        let message = match response.message {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "no message".to_string(),
        };
        return Err(FetchError::Provider { code, message });
    }

    let condition = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Decode("empty `weather` list".to_string()))?;
    let main = response
        .main
        .ok_or_else(|| FetchError::Decode("missing field `main`".to_string()))?;

    Ok(WeatherReading {
        temperature: main.temp,
        description: condition.name,
        icon: condition.icon,
    })
}

fn parse_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use passport_common::Units;
    use reqwest::StatusCode;

    fn fetched(status: u16, body: &str) -> Fetched {
        Fetched {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from(body.to_string()),
        }
    }

    fn settings() -> WeatherSettings {
        WeatherSettings {
            api_key: "key".to_string(),
            units: Units::Metric,
            lat: Some(52.52),
            lon: Some(13.40),
            ..WeatherSettings::default()
        }
    }

    #[test]
    fn test_normalize_success() {
        let body = r#"{
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "main": {"temp": 18.3, "feels_like": 17.9},
            "cod": 200
        }"#;
        let reading = normalize(&fetched(200, body)).unwrap();
        assert_eq!(reading.description, "Clouds");
        assert_eq!(reading.icon, "04d");
        assert!((reading.temperature - 18.3).abs() < 1e-9);
    }

    #[test]
    fn test_first_condition_wins() {
        let body = r#"{
            "weather": [{"main": "Rain", "icon": "10n"}, {"main": "Mist", "icon": "50n"}],
            "main": {"temp": 4.0},
            "cod": 200
        }"#;
        let reading = normalize(&fetched(200, body)).unwrap();
        assert_eq!(reading.description, "Rain");
    }

    #[test]
    fn test_bad_key_is_provider_error() {
        let body = r#"{"cod": 401, "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."}"#;
        let err = normalize(&fetched(401, body)).unwrap_err();
        match err {
            FetchError::Provider { code, message } => {
                assert_eq!(code, Some(401));
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_string_code_is_understood() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        let err = normalize(&fetched(404, body)).unwrap_err();
        assert_eq!(
            err,
            FetchError::Provider {
                code: Some(404),
                message: "city not found".to_string()
            }
        );
    }

    #[test]
    fn test_ok_status_with_error_code_is_provider_error() {
        let body = r#"{"cod": 429, "message": "rate limited"}"#;
        assert!(normalize(&fetched(200, body)).unwrap_err().is_provider());
    }

    #[test]
    fn test_empty_weather_list_is_decode_error() {
        let body = r#"{"weather": [], "main": {"temp": 1.0}, "cod": 200}"#;
        assert_eq!(normalize(&fetched(200, body)).unwrap_err().kind(), "decode");
    }

    #[test]
    fn test_missing_code_is_decode_error() {
        let body = r#"{"weather": [{"main": "Clear", "icon": "01d"}], "main": {"temp": 1.0}}"#;
        assert_eq!(normalize(&fetched(200, body)).unwrap_err().kind(), "decode");
    }

    #[test]
    fn test_validate_requires_key_and_coordinates() {
        let client = Client::new();

        assert!(OpenWeatherMap::new(settings(), client.clone()).validate().is_ok());

        let no_key = WeatherSettings {
            api_key: " ".to_string(),
            ..settings()
        };
        assert_eq!(
            OpenWeatherMap::new(no_key, client.clone()).validate(),
            Err(ConfigError::Missing("weather API key"))
        );

        let no_lat = WeatherSettings {
            lat: None,
            ..settings()
        };
        assert_eq!(
            OpenWeatherMap::new(no_lat, client.clone()).validate(),
            Err(ConfigError::Missing("weather latitude"))
        );

        let bad_lon = WeatherSettings {
            lon: Some(200.0),
            ..settings()
        };
        assert!(matches!(
            OpenWeatherMap::new(bad_lon, client).validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
