//! Tests for the provider icon id mapping.

use passport_common::WeatherIcon;

// ============================================================================
// Day / night pairs
// ============================================================================

#[test]
fn test_clear_sky_day_and_night() {
    assert_eq!(WeatherIcon::from_icon_id("01d"), Some(WeatherIcon::ClearDay));
    assert_eq!(WeatherIcon::from_icon_id("01n"), Some(WeatherIcon::ClearNight));
}

#[test]
fn test_few_and_scattered_clouds_share_icon() {
    assert_eq!(
        WeatherIcon::from_icon_id("02d"),
        WeatherIcon::from_icon_id("03d")
    );
    assert_eq!(
        WeatherIcon::from_icon_id("02n"),
        Some(WeatherIcon::PartlyCloudyNight)
    );
    assert_eq!(
        WeatherIcon::from_icon_id("03n"),
        Some(WeatherIcon::PartlyCloudyNight)
    );
}

#[test]
fn test_broken_clouds() {
    assert_eq!(
        WeatherIcon::from_icon_id("04d"),
        Some(WeatherIcon::MostlyCloudyDay)
    );
    assert_eq!(
        WeatherIcon::from_icon_id("04n"),
        Some(WeatherIcon::MostlyCloudyNight)
    );
}

// ============================================================================
// Precipitation ignores time of day
// ============================================================================

#[test]
fn test_precipitation_icons() {
    for (ids, expected) in [
        (["09d", "09n"], WeatherIcon::LightRain),
        (["10d", "10n"], WeatherIcon::Rain),
        (["11d", "11n"], WeatherIcon::Thunder),
        (["13d", "13n"], WeatherIcon::Snow),
        (["50d", "50n"], WeatherIcon::Mist),
    ] {
        for id in ids {
            assert_eq!(WeatherIcon::from_icon_id(id), Some(expected), "id {}", id);
        }
    }
}

// ============================================================================
// Unknown ids
// ============================================================================

#[test]
fn test_unknown_ids_have_no_icon() {
    assert_eq!(WeatherIcon::from_icon_id(""), None);
    assert_eq!(WeatherIcon::from_icon_id("99d"), None);
    assert_eq!(WeatherIcon::from_icon_id("01"), None);
}

#[test]
fn test_serialized_name_matches_as_str() {
    let json = serde_json::to_string(&WeatherIcon::PartlyCloudyNight).unwrap();
    assert_eq!(json, "\"partly-cloudy-night\"");
    assert_eq!(WeatherIcon::PartlyCloudyNight.as_str(), "partly-cloudy-night");
}
