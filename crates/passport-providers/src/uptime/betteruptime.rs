//! Better Stack (formerly BetterUptime) monitors strategy.

use async_trait::async_trait;
use passport_common::{sort_sites, ConfigError, FetchError, SiteStatus};
use refresh_cache::Provider;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};

use super::UptimeSettings;
use crate::client::{self, Fetched};

const DEFAULT_BASE_URL: &str = "https://uptime.betterstack.com";

/// Upper bound on followed `pagination.next` links.
const MAX_PAGES: usize = 20;

#[derive(Debug, Deserialize)]
struct MonitorsPage {
    #[serde(default)]
    data: Vec<Monitor>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Monitor {
    attributes: Attributes,
}

#[derive(Debug, Deserialize)]
struct Attributes {
    pronounceable_name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Value,
}

pub struct BetterUptime {
    client: Client,
    base_url: String,
    settings: UptimeSettings,
}

impl BetterUptime {
    pub fn new(settings: UptimeSettings, client: Client) -> Self {
        Self {
            client,
            base_url: settings.base_url_or(DEFAULT_BASE_URL),
            settings,
        }
    }
}

#[async_trait]
impl Provider for BetterUptime {
    type Output = Vec<SiteStatus>;

    fn name(&self) -> &str {
        "betteruptime"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()
    }

    #[instrument(skip(self), fields(provider = "betteruptime"))]
    async fn fetch(&self) -> Result<Vec<SiteStatus>, FetchError> {
        let mut sites = Vec::new();
        let mut next = Some(format!("{}/api/v2/monitors", self.base_url));
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                warn!(pages, "Stopped following monitor pages");
                break;
            }
            pages += 1;

            let request = self.client.get(url).bearer_auth(&self.settings.api_key);
            let page = decode_page(&client::send(request).await?)?;

            sites.extend(page.data.into_iter().map(|m| SiteStatus {
                name: m.attributes.pronounceable_name,
                url: m.attributes.url,
                up: m.attributes.status == "up",
            }));
            next = page.pagination.and_then(|p| p.next);
        }

        sort_sites(&mut sites);
        Ok(sites)
    }
}

fn decode_page(fetched: &Fetched) -> Result<MonitorsPage, FetchError> {
    if let Some(status_err) = client::status_error(fetched.status) {
        // Prefer the API's own message when it sent one
        return Err(match (serde_json::from_slice::<ErrorBody>(&fetched.body), status_err) {
            (Ok(body), FetchError::Provider { code, .. }) => FetchError::Provider {
                code,
                message: match body.errors {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            },
            (_, status_err) => status_err,
        });
    }

    fetched.json()
}
