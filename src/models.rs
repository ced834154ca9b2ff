//! Core data model: coordinates, places and the wire shapes built from them.
//!
//! Everything here is transient. Values are constructed per request from
//! provider output and dropped once the response is serialized.

use serde::{Deserialize, Serialize};

use crate::NearcastError;

/// Kind tag a place directory attaches to city-like results. Providers map
/// their own type vocabulary onto this normalized tag so the pipeline never
/// matches on provider-specific strings.
pub const LOCALITY_KIND: &str = "locality";

/// A validated geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, NearcastError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(NearcastError::validation(
                "Coordinates must be finite numbers",
            ));
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(NearcastError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(NearcastError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// A place as returned by a geocoding or place-directory provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub name: String,
    /// Resolved country name, "Unknown" when the provider gave none.
    pub country: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,
    /// Normalized kind tags (e.g. [`LOCALITY_KIND`]); empty for providers
    /// that carry no type information.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<String>,
}

impl Place {
    pub fn new(name: impl Into<String>, country: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            coordinate,
            timezone: None,
            population: None,
            kinds: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    #[must_use]
    pub fn is_locality(&self) -> bool {
        self.has_kind(LOCALITY_KIND)
    }
}

/// A place with its great-circle distance from the origin of a ranking call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlace {
    #[serde(flatten)]
    pub place: Place,
    pub distance_km: f64,
}

/// A ranked place decorated with a live weather snapshot. `current` is null
/// when the weather upstream has no live reading, never omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPlace {
    #[serde(flatten)]
    pub place: RankedPlace,
    pub current: Option<CurrentWeather>,
}

/// Live weather snapshot for a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in °C
    pub temperature: f64,
    /// Wind speed in km/h
    pub windspeed: f64,
    /// Observation timestamp, passed through from the upstream verbatim
    pub time: String,
}

/// One day of the short-term forecast. Fields are null when the upstream
/// omits the series for that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub time: String,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
}

/// Forecast for one coordinate as returned by the weather collaborator.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub timezone: Option<String>,
    pub current: Option<CurrentWeather>,
    pub daily: Vec<DailyForecast>,
}

/// The primary weather response: forecast for the origin plus weather-
/// annotated neighboring cities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherBundle {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub current: Option<CurrentWeather>,
    pub daily: Vec<DailyForecast>,
    pub nearby: Vec<EnrichedPlace>,
}

/// Opaque reference to a directory entry, resolved to a full [`Place`]
/// through a details lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRef {
    pub id: String,
}
