//! Aggregation orchestrator: composes the geocoding, place-directory and
//! weather collaborators with the candidate pipeline into the four
//! operations the HTTP shell exposes.

use std::sync::Arc;

use futures::future;
use tracing::{info, warn};

use crate::Result;
use crate::error::NearcastError;
use crate::geocoding::Geocoder;
use crate::models::{
    Coordinate, EnrichedPlace, LOCALITY_KIND, Place, RankedPlace, WeatherBundle,
};
use crate::pipeline;
use crate::places::PlaceDirectory;
use crate::weather::WeatherSource;

/// Neighbors attached to the primary weather response.
const NEIGHBOR_LIMIT: usize = 3;
/// Entries in the same-country city listing.
const COUNTRY_CITY_LIMIT: usize = 6;
/// Entries in a free-text nearby search.
const NEARBY_SEARCH_LIMIT: usize = 6;
/// Distance cap for free-text nearby search.
const NEARBY_SEARCH_MAX_KM: f64 = 800.0;
/// Radius for locality candidate collection.
const CITY_SEARCH_RADIUS_M: u32 = 50_000;
/// Result count for forward geocoding in the search endpoint.
const SEARCH_RESULT_COUNT: u8 = 5;
/// Result count for forward geocoding in the nearby-search endpoint.
const NEARBY_GEOCODE_COUNT: u8 = 10;
/// Details lookups are issued for twice the requested result budget so
/// non-locality entries can be filtered out without starving the list.
const DETAILS_FANOUT_FACTOR: usize = 2;

const LANGUAGE: &str = "en";

/// Orchestrator over the three collaborator capabilities.
pub struct Aggregator {
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlaceDirectory>,
    weather: Arc<dyn WeatherSource>,
}

impl Aggregator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlaceDirectory>,
        weather: Arc<dyn WeatherSource>,
    ) -> Self {
        Self {
            geocoder,
            places,
            weather,
        }
    }

    /// Forward geocoding for the search box.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Place>> {
        let query = non_empty(query, "query")?;
        info!("Searching locations for '{query}'");
        self.geocoder
            .search_by_name(query, SEARCH_RESULT_COUNT, LANGUAGE)
            .await
    }

    /// Forecast for the origin plus up to three weather-annotated
    /// neighboring cities. Any failure on the neighbor branch degrades to
    /// an empty neighbor list on an otherwise successful response.
    pub async fn weather_bundle(&self, origin: Coordinate) -> Result<WeatherBundle> {
        info!(
            "Building weather bundle for {:.4},{:.4}",
            origin.latitude, origin.longitude
        );
        let forecast = self.weather.forecast(origin).await?;

        let nearby = match self.neighbors(origin).await {
            Ok(neighbors) => neighbors,
            Err(e) => {
                warn!("Nearby lookup failed, serving bundle without neighbors: {e}");
                Vec::new()
            }
        };

        Ok(WeatherBundle {
            latitude: origin.latitude,
            longitude: origin.longitude,
            timezone: forecast.timezone,
            current: forecast.current,
            daily: forecast.daily,
            nearby,
        })
    }

    /// Same-country city listing around the origin. No weather enrichment.
    pub async fn country_cities(&self, origin: Coordinate) -> Result<Vec<RankedPlace>> {
        info!(
            "Listing cities around {:.4},{:.4}",
            origin.latitude, origin.longitude
        );
        let candidates = self
            .locality_candidates(origin, COUNTRY_CITY_LIMIT)
            .await?;
        // Candidates are already bounded by the directory's search radius,
        // so no distance cap here.
        Ok(pipeline::rank(candidates, origin, None, COUNTRY_CITY_LIMIT))
    }

    /// Free-text search constrained to a country and an 800 km radius
    /// around the origin. No weather enrichment.
    pub async fn nearby_search(
        &self,
        origin: Coordinate,
        country: &str,
        query: &str,
    ) -> Result<Vec<RankedPlace>> {
        let country = non_empty(country, "country")?;
        let query = non_empty(query, "query")?;
        info!("Nearby search for '{query}' in {country}");

        let candidates = self
            .geocoder
            .search_by_name(query, NEARBY_GEOCODE_COUNT, LANGUAGE)
            .await?;

        let wanted = country.to_lowercase();
        let in_country: Vec<Place> = candidates
            .into_iter()
            .filter(|place| place.country.to_lowercase() == wanted)
            .collect();

        let deduped = pipeline::dedupe(in_country, origin);
        Ok(pipeline::rank(
            deduped,
            origin,
            Some(NEARBY_SEARCH_MAX_KM),
            NEARBY_SEARCH_LIMIT,
        ))
    }

    /// Neighbor branch of the weather bundle: locality candidates, dedupe
    /// against the origin, rank to the top three, enrich with live weather.
    async fn neighbors(&self, origin: Coordinate) -> Result<Vec<EnrichedPlace>> {
        let candidates = self.locality_candidates(origin, NEIGHBOR_LIMIT).await?;
        let deduped = pipeline::dedupe(candidates, origin);
        let ranked = pipeline::rank(deduped, origin, None, NEIGHBOR_LIMIT);
        Ok(pipeline::enrich(ranked, self.weather.as_ref()).await)
    }

    /// City-like places near the origin: one reference search, then a
    /// concurrent details fan-out over at most `2 × max_results` entries,
    /// keeping only results the directory tags as localities.
    async fn locality_candidates(
        &self,
        origin: Coordinate,
        max_results: usize,
    ) -> Result<Vec<Place>> {
        let refs = self
            .places
            .nearby_search(origin, CITY_SEARCH_RADIUS_M, LOCALITY_KIND)
            .await?;

        let budget = max_results.max(max_results * DETAILS_FANOUT_FACTOR);
        let lookups = refs
            .iter()
            .take(budget)
            .map(|place_ref| self.places.details(place_ref));
        let resolved = future::try_join_all(lookups).await?;

        Ok(resolved
            .into_iter()
            .filter(Place::is_locality)
            .collect())
    }
}

fn non_empty<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NearcastError::validation(format!(
            "Parameter \"{field}\" must not be empty"
        )));
    }
    Ok(trimmed)
}
