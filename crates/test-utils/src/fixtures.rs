//! Canned provider payloads.
//!
//! Bodies are trimmed copies of real responses, keeping the fields the
//! providers read plus a few they must ignore.

/// OpenWeatherMap `/data/2.5/weather` bodies.
pub mod openweathermap {
    /// Successful reading: 18.3 degrees, "Clouds", icon 04d
    pub const CLOUDY: &str = r#"{
        "coord": {"lon": 13.4, "lat": 52.52},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "base": "stations",
        "main": {"temp": 18.3, "feels_like": 17.9, "pressure": 1016, "humidity": 62},
        "name": "Berlin",
        "cod": 200
    }"#;

    /// Successful reading: -2.5 degrees, "Snow", icon 13n
    pub const SNOW: &str = r#"{
        "weather": [{"id": 601, "main": "Snow", "description": "snow", "icon": "13n"}],
        "main": {"temp": -2.5},
        "cod": 200
    }"#;

    /// Rejected key, served with HTTP 401
    pub const INVALID_KEY: &str = r#"{"cod": 401, "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."}"#;

    /// Unknown location, `cod` as a string
    pub const NOT_FOUND: &str = r#"{"cod": "404", "message": "city not found"}"#;
}

/// UptimeRobot `/v2/getMonitors` bodies.
pub mod uptimerobot {
    /// Three monitors, deliberately not in name order
    pub const MONITORS: &str = r#"{
        "stat": "ok",
        "pagination": {"offset": 0, "limit": 50, "total": 3},
        "monitors": [
            {"id": 777, "friendly_name": "Nextcloud", "url": "https://cloud.example.com", "type": 1, "status": 2},
            {"id": 778, "friendly_name": "Gitea", "url": "https://git.example.com", "type": 1, "status": 9},
            {"id": 779, "friendly_name": "Jellyfin", "url": "https://media.example.com", "type": 1, "status": 0}
        ]
    }"#;

    pub const INVALID_KEY: &str = r#"{
        "stat": "fail",
        "error": {"type": "invalid_parameter", "parameter_name": "api_key", "passed_value": "nope", "message": "api_key not found."}
    }"#;
}

/// Better Stack `/api/v2/monitors` bodies.
pub mod betteruptime {
    /// Unordered page with no next link
    pub const MONITORS: &str = r#"{
        "data": [
            {"id": "1", "type": "monitor", "attributes": {"url": "https://status.example.com", "pronounceable_name": "Status page", "monitor_type": "status", "status": "up"}},
            {"id": "2", "type": "monitor", "attributes": {"url": "https://api.example.com", "pronounceable_name": "API", "monitor_type": "status", "status": "down"}},
            {"id": "3", "type": "monitor", "attributes": {"url": "https://blog.example.com", "pronounceable_name": "Blog", "monitor_type": "status", "status": "paused"}}
        ],
        "pagination": {"first": null, "last": null, "prev": null, "next": null}
    }"#;

    /// First page of two; `{next}` is replaced with the second page URL
    pub const PAGE_ONE: &str = r#"{
        "data": [
            {"id": "10", "type": "monitor", "attributes": {"url": "https://zeta.example.com", "pronounceable_name": "Zeta", "status": "up"}}
        ],
        "pagination": {"next": "{next}"}
    }"#;

    pub const PAGE_TWO: &str = r#"{
        "data": [
            {"id": "11", "type": "monitor", "attributes": {"url": "https://alpha.example.com", "pronounceable_name": "Alpha", "status": "up"}}
        ],
        "pagination": {"next": null}
    }"#;

    pub const UNAUTHORIZED: &str = r#"{"errors": "Invalid Team API token."}"#;
}
