use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair.
///
/// Accepts the provider's `{"lat", "lon"}` shape as well as `{"lat", "lng"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLong {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,
}

impl LatLong {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}

/// What to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text place. `country_name` is a display name from the country table.
    ByName {
        city_name: String,
        state_code: String,
        country_name: String,
    },
    ByCoordinates(LatLong),
}

impl LocationQuery {
    pub fn by_name(
        city_name: impl Into<String>,
        state_code: impl Into<String>,
        country_name: impl Into<String>,
    ) -> Self {
        Self::ByName {
            city_name: city_name.into(),
            state_code: state_code.into(),
            country_name: country_name.into(),
        }
    }

    pub fn by_coordinates(position: LatLong) -> Self {
        Self::ByCoordinates(position)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSys {
    /// Missing for coordinates outside any country (open sea).
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCondition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMain {
    /// Kelvin.
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderClouds {
    pub all: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderWind {
    /// Metres per second (provider default units).
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPrecipitation {
    #[serde(rename = "1h")]
    pub last_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub last_three_hours: Option<f64>,
}

/// The provider's current-weather payload. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResponse {
    pub name: String,
    pub sys: ProviderSys,
    pub coord: LatLong,
    pub weather: Vec<ProviderCondition>,
    pub main: ProviderMain,
    /// Metres. Not always reported.
    pub visibility: Option<u32>,
    pub clouds: ProviderClouds,
    pub wind: ProviderWind,
    pub rain: Option<ProviderPrecipitation>,
    pub snow: Option<ProviderPrecipitation>,
    /// Unix timestamp of the observation.
    pub dt: Option<i64>,
}

/// Outcome of one provider call whose transport succeeded.
#[derive(Debug, Clone)]
pub enum ProviderReply {
    Weather(Box<ProviderResponse>),
    /// The provider answered `cod: "404"`.
    NotFound { message: String },
    /// Any other error-shaped payload (bad key, bad coordinates, quota...).
    Rejected { code: String, message: String },
}

/// Application-level weather record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedWeather {
    pub city_name: String,
    /// `None` when the provider reported no country or an unknown code.
    pub country_name: Option<String>,
    /// Raw ISO code as reported by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    pub lat_long: LatLong,
    pub main: String,
    pub description: String,
    pub temperature_in_celsius: f64,
    pub humidity_percentage: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_in_meters: Option<u32>,
    pub cloud_percentage: u8,
    pub wind_speed_in_meters_per_second: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_volume_from_last_hour_in_millimeters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_volume_from_last_hour_in_millimeters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

const MILES_PER_HOUR_PER_METER_PER_SECOND: f64 = 2.236_936;

impl NormalizedWeather {
    pub fn wind_speed_in_miles_per_hour(&self) -> f64 {
        self.wind_speed_in_meters_per_second * MILES_PER_HOUR_PER_METER_PER_SECOND
    }

    /// Country name for display, falling back to the raw code.
    pub fn country_label(&self) -> &str {
        self.country_name
            .as_deref()
            .or(self.country_code.as_deref())
            .unwrap_or("unknown country")
    }
}
