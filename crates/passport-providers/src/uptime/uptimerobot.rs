//! UptimeRobot v2 `getMonitors` strategy.

use async_trait::async_trait;
use passport_common::{sort_sites, ConfigError, FetchError, SiteStatus};
use refresh_cache::Provider;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::UptimeSettings;
use crate::client::{self, Fetched};

const DEFAULT_BASE_URL: &str = "https://api.uptimerobot.com";

/// UptimeRobot monitor status code for "up".
const STATUS_UP: i64 = 2;

#[derive(Debug, Deserialize)]
struct GetMonitorsResponse {
    #[serde(default)]
    stat: Option<String>,
    #[serde(default)]
    monitors: Vec<Monitor>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Monitor {
    friendly_name: String,
    #[serde(default)]
    url: String,
    status: i64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct UptimeRobot {
    client: Client,
    base_url: String,
    settings: UptimeSettings,
}

impl UptimeRobot {
    pub fn new(settings: UptimeSettings, client: Client) -> Self {
        Self {
            client,
            base_url: settings.base_url_or(DEFAULT_BASE_URL),
            settings,
        }
    }
}

#[async_trait]
impl Provider for UptimeRobot {
    type Output = Vec<SiteStatus>;

    fn name(&self) -> &str {
        "uptimerobot"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()
    }

    #[instrument(skip(self), fields(provider = "uptimerobot"))]
    async fn fetch(&self) -> Result<Vec<SiteStatus>, FetchError> {
        let request = self
            .client
            .post(format!("{}/v2/getMonitors", self.base_url))
            .form(&[
                ("api_key", self.settings.api_key.as_str()),
                ("format", "json"),
            ]);

        let fetched = client::send(request).await?;
        normalize(&fetched)
    }
}

fn normalize(fetched: &Fetched) -> Result<Vec<SiteStatus>, FetchError> {
    let response: GetMonitorsResponse = fetched.json()?;

    if response.stat.as_deref() == Some("fail") {
        let message = response
            .error
            .map(|e| {
                e.message
                    .or(e.kind)
                    .unwrap_or_else(|| "request failed".to_string())
            })
            .unwrap_or_else(|| "request failed".to_string());
        return Err(FetchError::Provider {
            code: None,
            message,
        });
    }

    if let Some(e) = client::status_error(fetched.status) {
        return Err(e);
    }

    let mut sites: Vec<SiteStatus> = response
        .monitors
        .into_iter()
        .map(|m| SiteStatus {
            name: m.friendly_name,
            url: m.url,
            up: m.status == STATUS_UP,
        })
        .collect();

    sort_sites(&mut sites);
    Ok(sites)
}
