//! HTTP API: query parsing, error mapping and the axum router.
//!
//! This layer stays thin — it turns query strings into validated inputs,
//! hands them to the [`Aggregator`] and serializes whatever comes back.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregator::Aggregator;
use crate::error::NearcastError;
use crate::models::{Coordinate, Place, RankedPlace, WeatherBundle};

pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/weather", get(weather))
        .route("/country-cities", get(country_cities))
        .route("/nearby-search", get(nearby_search))
        .with_state(aggregator)
}

/// Error wrapper that maps the taxonomy onto HTTP statuses: validation
/// failures become 400 with the specific message, everything else becomes
/// 502 with a generic one. Upstream detail is logged here, at the single
/// point where errors leave the service.
struct ApiError(NearcastError);

impl From<NearcastError> for ApiError {
    fn from(err: NearcastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            tracing::error!("Request failed: {}", self.0);
            StatusCode::BAD_GATEWAY
        };
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

#[derive(Serialize)]
struct Results<T> {
    results: Vec<T>,
}

#[derive(Deserialize)]
struct SearchParams {
    query: Option<String>,
}

#[derive(Deserialize)]
struct CoordinateParams {
    lat: Option<String>,
    lon: Option<String>,
}

#[derive(Deserialize)]
struct NearbySearchParams {
    lat: Option<String>,
    lon: Option<String>,
    country: Option<String>,
    query: Option<String>,
}

async fn search(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Results<Place>>, ApiError> {
    let query = params.query.as_deref().unwrap_or_default();
    let results = aggregator.search_by_name(query).await?;
    Ok(Json(Results { results }))
}

async fn weather(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<WeatherBundle>, ApiError> {
    let origin = parse_coordinate(params.lat.as_deref(), params.lon.as_deref())?;
    let bundle = aggregator.weather_bundle(origin).await?;
    Ok(Json(bundle))
}

async fn country_cities(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<CoordinateParams>,
) -> Result<Json<Results<RankedPlace>>, ApiError> {
    let origin = parse_coordinate(params.lat.as_deref(), params.lon.as_deref())?;
    let results = aggregator.country_cities(origin).await?;
    Ok(Json(Results { results }))
}

async fn nearby_search(
    State(aggregator): State<Arc<Aggregator>>,
    Query(params): Query<NearbySearchParams>,
) -> Result<Json<Results<RankedPlace>>, ApiError> {
    let origin = parse_coordinate(params.lat.as_deref(), params.lon.as_deref())?;
    let country = params.country.as_deref().unwrap_or_default();
    let query = params.query.as_deref().unwrap_or_default();
    let results = aggregator.nearby_search(origin, country, query).await?;
    Ok(Json(Results { results }))
}

/// Parse a numeric query parameter. Missing values and non-numeric text
/// are both validation errors; no upstream call happens after either.
fn parse_number(value: Option<&str>, name: &str) -> Result<f64, NearcastError> {
    let raw = value
        .ok_or_else(|| NearcastError::validation(format!("Missing parameter \"{name}\"")))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| NearcastError::validation(format!("Invalid numeric parameter \"{name}\"")))
}

fn parse_coordinate(lat: Option<&str>, lon: Option<&str>) -> Result<Coordinate, NearcastError> {
    let latitude = parse_number(lat, "lat")?;
    let longitude = parse_number(lon, "lon")?;
    Coordinate::new(latitude, longitude)
}
