//! Uptime-monitor provider strategies.
//!
//! Both backends normalize into a name-sorted `Vec<SiteStatus>`; UptimeRobot
//! happens to sort its monitors, Better Stack does not.

mod betteruptime;
mod uptimerobot;

use std::fmt;
use std::str::FromStr;

use passport_common::{ConfigError, SiteStatus};
use refresh_cache::Provider;
use reqwest::Client;

pub use betteruptime::BetterUptime;
pub use uptimerobot::UptimeRobot;

/// Supported uptime backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UptimeProviderKind {
    #[default]
    UptimeRobot,
    BetterUptime,
}

impl FromStr for UptimeProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "uptimerobot" => Ok(UptimeProviderKind::UptimeRobot),
            "betteruptime" | "betterstack" => Ok(UptimeProviderKind::BetterUptime),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for UptimeProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UptimeProviderKind::UptimeRobot => f.write_str("uptimerobot"),
            UptimeProviderKind::BetterUptime => f.write_str("betteruptime"),
        }
    }
}

/// Static uptime settings, fixed at startup.
#[derive(Debug, Clone, Default)]
pub struct UptimeSettings {
    pub provider: UptimeProviderKind,
    pub api_key: String,
    /// Override for the provider's API root
    pub base_url: Option<String>,
}

impl UptimeSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("uptime API key"));
        }
        Ok(())
    }

    fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }
}

/// Build the configured uptime strategy.
pub fn uptime_provider(
    settings: UptimeSettings,
    client: Client,
) -> Box<dyn Provider<Output = Vec<SiteStatus>>> {
    match settings.provider {
        UptimeProviderKind::UptimeRobot => Box::new(UptimeRobot::new(settings, client)),
        UptimeProviderKind::BetterUptime => Box::new(BetterUptime::new(settings, client)),
    }
}
