//! Mapping from provider icon ids to the icon set bundled with the start page.

use serde::Serialize;

/// Icon kinds the page knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    MostlyCloudyDay,
    MostlyCloudyNight,
    LightRain,
    Rain,
    Thunder,
    Snow,
    Mist,
}

impl WeatherIcon {
    /// Resolve an OpenWeatherMap icon id (e.g. "10n").
    ///
    /// Unknown ids, including the empty id of an unpopulated reading, have no icon.
    pub fn from_icon_id(id: &str) -> Option<Self> {
        let icon = match id {
            "01d" => WeatherIcon::ClearDay,
            "01n" => WeatherIcon::ClearNight,
            "02d" | "03d" => WeatherIcon::PartlyCloudyDay,
            "02n" | "03n" => WeatherIcon::PartlyCloudyNight,
            "04d" => WeatherIcon::MostlyCloudyDay,
            "04n" => WeatherIcon::MostlyCloudyNight,
            "09d" | "09n" => WeatherIcon::LightRain,
            "10d" | "10n" => WeatherIcon::Rain,
            "11d" | "11n" => WeatherIcon::Thunder,
            "13d" | "13n" => WeatherIcon::Snow,
            "50d" | "50n" => WeatherIcon::Mist,
            _ => return None,
        };
        Some(icon)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::ClearDay => "clear-day",
            WeatherIcon::ClearNight => "clear-night",
            WeatherIcon::PartlyCloudyDay => "partly-cloudy-day",
            WeatherIcon::PartlyCloudyNight => "partly-cloudy-night",
            WeatherIcon::MostlyCloudyDay => "mostly-cloudy-day",
            WeatherIcon::MostlyCloudyNight => "mostly-cloudy-night",
            WeatherIcon::LightRain => "light-rain",
            WeatherIcon::Rain => "rain",
            WeatherIcon::Thunder => "thunder",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Mist => "mist",
        }
    }
}
