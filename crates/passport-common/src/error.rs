//! Error types shared by the passport widget services.

use thiserror::Error;

/// Result type alias for upstream fetches.
pub type FetchResult<T> = Result<T, FetchError>;

/// Invalid or missing provider configuration.
///
/// Always fatal: raised while the caches are being constructed, before any
/// background task is started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for '{setting}': {message}")]
    Invalid {
        setting: &'static str,
        message: String,
    },

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// Failure of a single fetch against an upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    // === Transport Errors ===
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    // === Payload Errors ===
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),

    /// The upstream answered, but its payload reports an application error
    /// (bad API key, rate limit, unknown location).
    #[error("Provider rejected the request (code {code:?}): {message}")]
    Provider { code: Option<i64>, message: String },
}

impl FetchError {
    /// Whether the provider itself reported the failure.
    pub fn is_provider(&self) -> bool {
        matches!(self, FetchError::Provider { .. })
    }

    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::Timeout => "timeout",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
            FetchError::Provider { .. } => "provider",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
