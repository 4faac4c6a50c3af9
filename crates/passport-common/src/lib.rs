//! Common types shared across the passport widget services.

pub mod error;
pub mod icon;
pub mod model;

pub use error::{ConfigError, FetchError, FetchResult};
pub use icon::WeatherIcon;
pub use model::{sort_sites, SiteStatus, Units, WeatherReading};
