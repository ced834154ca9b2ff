//! Google Places client: nearby locality search plus the details lookup
//! that resolves a candidate's authoritative name and country.

use async_trait::async_trait;
use reqwest::Client;

use crate::Result;
use crate::error::NearcastError;
use crate::models::{Coordinate, Place, PlaceRef};

pub const GOOGLE_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Place-directory capability consumed by the orchestrator: a cheap
/// reference search followed by per-reference detail resolution.
#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    /// References to places of `kind` within `radius_meters` of the
    /// coordinate. The kind filter is applied provider-side.
    async fn nearby_search(
        &self,
        coordinate: Coordinate,
        radius_meters: u32,
        kind: &str,
    ) -> Result<Vec<PlaceRef>>;

    /// Resolve a reference into a full place with authoritative name,
    /// country and kind tags.
    async fn details(&self, place_ref: &PlaceRef) -> Result<Place>;
}

/// Directory backed by the Google Places API. The API key is injected at
/// construction; a missing key surfaces as a call-time configuration
/// error so keyless deployments degrade instead of failing at startup.
pub struct GooglePlaces {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GooglePlaces {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| NearcastError::config("GOOGLE_MAPS_API_KEY is not set"))
    }
}

#[async_trait]
impl PlaceDirectory for GooglePlaces {
    async fn nearby_search(
        &self,
        coordinate: Coordinate,
        radius_meters: u32,
        kind: &str,
    ) -> Result<Vec<PlaceRef>> {
        let url = format!(
            "{}/nearbysearch/json?location={},{}&radius={}&type={}&key={}",
            self.base_url,
            coordinate.latitude,
            coordinate.longitude,
            radius_meters,
            kind,
            self.api_key()?
        );
        tracing::debug!(
            "Nearby search at {:.4},{:.4} radius {radius_meters}m",
            coordinate.latitude,
            coordinate.longitude
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(NearcastError::upstream(format!(
                "Places nearby search returned status {}",
                response.status()
            )));
        }

        let body: google::NearbyResponse = response.json().await?;
        match body.status.as_str() {
            "OK" => Ok(body
                .results
                .into_iter()
                .map(|result| PlaceRef {
                    id: result.place_id,
                })
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(NearcastError::upstream(format!(
                "Nearby search failed with status {status}: {}",
                body.error_message.unwrap_or_default()
            ))),
        }
    }

    async fn details(&self, place_ref: &PlaceRef) -> Result<Place> {
        let url = format!(
            "{}/details/json?place_id={}&fields=address_component,geometry,name,type&key={}",
            self.base_url,
            urlencoding::encode(&place_ref.id),
            self.api_key()?
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(NearcastError::upstream(format!(
                "Place details returned status {}",
                response.status()
            )));
        }

        let body: google::DetailsResponse = response.json().await?;
        if body.status != "OK" {
            return Err(NearcastError::upstream(format!(
                "Place details failed with status {}: {}",
                body.status,
                body.error_message.unwrap_or_default()
            )));
        }

        let details = body
            .result
            .ok_or_else(|| NearcastError::upstream("Place details response had no result"))?;
        details.into_place()
    }
}

/// Resolve a country from a structured address-component breakdown:
/// prefer the long-form name, fall back to the short code, default to
/// "Unknown" when no country-typed component is present.
#[must_use]
pub fn country_from_components(components: &[google::AddressComponent]) -> String {
    components
        .iter()
        .find(|component| component.types.iter().any(|t| t == "country"))
        .and_then(|component| {
            component
                .long_name
                .clone()
                .or_else(|| component.short_name.clone())
        })
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Google Places API response structures
pub mod google {
    use serde::Deserialize;

    use crate::Result;
    use crate::models::{Coordinate, Place};

    #[derive(Debug, Deserialize)]
    pub struct NearbyResponse {
        pub status: String,
        #[serde(default)]
        pub results: Vec<NearbyResult>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct NearbyResult {
        pub place_id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct DetailsResponse {
        pub status: String,
        pub result: Option<PlaceDetails>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PlaceDetails {
        pub name: String,
        pub geometry: Geometry,
        #[serde(default)]
        pub address_components: Vec<AddressComponent>,
        #[serde(default)]
        pub types: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: LatLng,
    }

    #[derive(Debug, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct AddressComponent {
        pub long_name: Option<String>,
        pub short_name: Option<String>,
        #[serde(default)]
        pub types: Vec<String>,
    }

    impl PlaceDetails {
        pub fn into_place(self) -> Result<Place> {
            let coordinate = Coordinate::new(self.geometry.location.lat, self.geometry.location.lng)?;
            let country = super::country_from_components(&self.address_components);
            Ok(Place {
                name: self.name,
                country,
                coordinate,
                timezone: None,
                population: None,
                kinds: normalize_kinds(self.types),
            })
        }
    }

    /// Google's `types` already use "locality" for city-like entries, so
    /// normalization is a passthrough today; other directories map their
    /// vocabulary here.
    fn normalize_kinds(types: Vec<String>) -> Vec<String> {
        types
    }
}
