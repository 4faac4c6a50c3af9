//! Page model assembled from the widget caches.

use passport_common::{SiteStatus, WeatherIcon, WeatherReading};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchBlock {
    pub url: String,
    pub query_param: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherBlock {
    pub temp: f64,
    pub description: String,
    /// `None` until a reading with a known icon id arrives
    pub icon: Option<WeatherIcon>,
}

impl From<WeatherReading> for WeatherBlock {
    fn from(reading: WeatherReading) -> Self {
        Self {
            icon: WeatherIcon::from_icon_id(&reading.icon),
            temp: reading.temperature,
            description: reading.description,
        }
    }
}

/// Everything the start page needs besides the user's links.
///
/// Widget blocks are present exactly when the widget is configured; before
/// the first successful fetch they hold default values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageModel {
    pub search: SearchBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<Vec<SiteStatus>>,
}

impl PageModel {
    pub fn build(state: &AppState) -> Self {
        Self {
            search: SearchBlock {
                url: state.search.url.clone(),
                query_param: state.search.query_param.clone(),
            },
            weather: state.weather.as_ref().map(|cache| cache.read().into()),
            uptime: state.uptime.as_ref().map(|cache| cache.read()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_block_resolves_icon() {
        let block: WeatherBlock = WeatherReading {
            temperature: 21.0,
            description: "Clear".to_string(),
            icon: "01n".to_string(),
        }
        .into();

        assert_eq!(block.icon, Some(WeatherIcon::ClearNight));
        assert_eq!(block.description, "Clear");
    }

    #[test]
    fn test_unpopulated_reading_has_no_icon() {
        let block: WeatherBlock = WeatherReading::default().into();
        assert_eq!(block.icon, None);
        assert_eq!(block.temp, 0.0);
    }

    #[test]
    fn test_disabled_widgets_are_omitted() {
        let page = PageModel {
            search: SearchBlock {
                url: "https://duckduckgo.com".to_string(),
                query_param: "q".to_string(),
            },
            weather: None,
            uptime: None,
        };

        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("weather").is_none());
        assert!(json.get("uptime").is_none());
        assert_eq!(json["search"]["query_param"], "q");
    }
}
