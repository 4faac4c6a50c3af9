//! Shared HTTP plumbing for the provider strategies.

use std::time::Duration;

use bytes::Bytes;
use passport_common::{ConfigError, FetchError};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("passport/", env!("CARGO_PKG_VERSION"));

/// Build the client used by every provider.
///
/// The client-level timeout bounds connect + transfer; the cache applies its
/// own timeout around the whole fetch as well.
pub fn build_client(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ConfigError::Invalid {
            setting: "http client",
            message: e.to_string(),
        })
}

/// Raw upstream answer: status plus the complete body.
#[derive(Debug, Clone)]
pub(crate) struct Fetched {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Fetched {
    /// Decode the body as JSON.
    ///
    /// When the body is not the expected shape, a failing HTTP status is the
    /// more useful error, so it takes precedence over the decode error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| status_error(self.status).unwrap_or_else(|| FetchError::Decode(e.to_string())))
    }
}

/// Send a request and read the full body.
pub(crate) async fn send(request: RequestBuilder) -> Result<Fetched, FetchError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;

    debug!(status = %status, bytes = body.len(), "Upstream responded");

    Ok(Fetched { status, body })
}

/// Map a failing HTTP status to a fetch error.
///
/// Authentication and rate-limit statuses mean the provider refused us;
/// everything else is treated like a transport hiccup.
pub(crate) fn status_error(status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            Some(FetchError::Provider {
                code: Some(i64::from(status.as_u16())),
                message: status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string(),
            })
        }
        _ => Some(FetchError::Status {
            status: status.as_u16(),
        }),
    }
}

// Strip the URL: query strings carry API keys.
fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        ok: bool,
    }

    fn fetched(status: u16, body: &'static str) -> Fetched {
        Fetched {
            status: StatusCode::from_u16(status).unwrap(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[test]
    fn test_json_decodes_success_body() {
        let probe: Probe = fetched(200, r#"{"ok": true}"#).json().unwrap();
        assert!(probe.ok);
    }

    #[test]
    fn test_malformed_success_body_is_decode_error() {
        let err = fetched(200, "<html>").json::<Probe>().unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_malformed_error_body_reports_status() {
        let err = fetched(502, "Bad Gateway").json::<Probe>().unwrap_err();
        assert_eq!(err, FetchError::Status { status: 502 });
    }

    #[test]
    fn test_auth_and_rate_limit_statuses_are_provider_errors() {
        for status in [401u16, 403, 429] {
            let err = status_error(StatusCode::from_u16(status).unwrap()).unwrap();
            assert!(err.is_provider(), "status {}", status);
        }
        assert!(status_error(StatusCode::OK).is_none());
        assert!(!status_error(StatusCode::INTERNAL_SERVER_ERROR)
            .unwrap()
            .is_provider());
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
