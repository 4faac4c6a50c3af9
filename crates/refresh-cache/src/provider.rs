//! Strategy interface implemented once per upstream provider.

use async_trait::async_trait;
use passport_common::{ConfigError, FetchResult};

/// Fetches and normalizes one provider's data.
///
/// The cache owns scheduling, timeouts and failure policy; an implementation
/// only talks to its upstream and maps the response into `Output`.
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Canonical value stored in the cache. `Default` is the value served
    /// before the first successful fetch.
    type Output: Clone + Default + Send + Sync + 'static;

    /// Provider identifier used in logs, e.g. "openweathermap".
    fn name(&self) -> &str;

    /// Check credentials and endpoint settings before anything is spawned.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Perform one upstream request and normalize the response.
    async fn fetch(&self) -> FetchResult<Self::Output>;
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for Box<P> {
    type Output = P::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        (**self).validate()
    }

    async fn fetch(&self) -> FetchResult<Self::Output> {
        (**self).fetch().await
    }
}
