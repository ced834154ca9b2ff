//! Open-Meteo geocoding client: forward name search plus a synthetic
//! reverse lookup (Open-Meteo has no reverse endpoint).

use async_trait::async_trait;
use reqwest::Client;

use crate::Result;
use crate::error::NearcastError;
use crate::models::{Coordinate, Place};

pub const OPEN_METEO_GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";

/// Geocoding capability consumed by the orchestrator.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward search: places matching a free-text name.
    async fn search_by_name(
        &self,
        text: &str,
        max_count: u8,
        language: &str,
    ) -> Result<Vec<Place>>;

    /// Places at or near a coordinate.
    async fn reverse_lookup(
        &self,
        coordinate: Coordinate,
        max_count: u8,
        language: &str,
    ) -> Result<Vec<Place>>;
}

/// Geocoder backed by the Open-Meteo geocoding API (no API key).
pub struct OpenMeteoGeocoder {
    client: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn search_by_name(
        &self,
        text: &str,
        max_count: u8,
        language: &str,
    ) -> Result<Vec<Place>> {
        let url = format!(
            "{}/search?name={}&count={}&language={}&format=json",
            self.base_url,
            urlencoding::encode(text),
            max_count,
            language
        );
        tracing::debug!("Geocoding '{text}'");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(NearcastError::upstream(format!(
                "Open-Meteo geocoding returned status {}",
                response.status()
            )));
        }

        let body: openmeteo::GeocodingResponse = response.json().await?;
        let places: Vec<Place> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(openmeteo::GeocodingResult::into_place)
            .collect();

        if places.is_empty() {
            tracing::debug!("No geocoding results for '{text}'");
        }
        Ok(places)
    }

    async fn reverse_lookup(
        &self,
        coordinate: Coordinate,
        _max_count: u8,
        _language: &str,
    ) -> Result<Vec<Place>> {
        // Open-Meteo has no reverse geocoding endpoint; return a single
        // coordinate-named place so callers can still label the origin.
        let name = format!("{:.4}, {:.4}", coordinate.latitude, coordinate.longitude);
        Ok(vec![Place::new(name, "Unknown", coordinate)])
    }
}

/// `OpenMeteo` geocoding API response structures
mod openmeteo {
    use serde::Deserialize;

    use crate::models::{Coordinate, Place};

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
        pub timezone: Option<String>,
        pub population: Option<u64>,
    }

    impl GeocodingResult {
        /// Convert one provider record, discarding entries whose
        /// coordinates fail validation.
        pub fn into_place(self) -> Option<Place> {
            let coordinate = Coordinate::new(self.latitude, self.longitude).ok()?;
            Some(Place {
                name: self.name,
                country: self.country.unwrap_or_else(|| "Unknown".to_string()),
                coordinate,
                timezone: self.timezone,
                population: self.population,
                kinds: Vec::new(),
            })
        }
    }
}
