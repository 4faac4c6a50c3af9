//! Canonical widget data shared by the providers and the read path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Current conditions, normalized from whichever weather provider is in use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    /// Short condition text, e.g. "Clouds"
    pub description: String,
    /// Provider icon id, e.g. "04d"
    pub icon: String,
}

/// One monitored site as shown on the start page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStatus {
    pub name: String,
    pub url: String,
    pub up: bool,
}

/// Sort sites by display name so providers with unspecified ordering render
/// the same way on every refresh.
pub fn sort_sites(sites: &mut [SiteStatus]) {
    sites.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Temperature units understood by the weather provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            other => Err(ConfigError::Invalid {
                setting: "WEATHER_TEMP_UNITS",
                message: format!("unknown units '{}'", other),
            }),
        }
    }
}
