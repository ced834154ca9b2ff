use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use nearcast::aggregator::Aggregator;
use nearcast::config::NearcastConfig;
use nearcast::geocoding::OpenMeteoGeocoder;
use nearcast::places::GooglePlaces;
use nearcast::weather::OpenMeteoWeather;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = NearcastConfig::from_env().context("Failed to load configuration")?;

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("nearcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let geocoder = OpenMeteoGeocoder::new(client.clone(), config.geocoding_base_url.clone());
    let places = GooglePlaces::new(
        client.clone(),
        config.places_base_url.clone(),
        config.google_maps_api_key.clone(),
    );
    let weather = OpenMeteoWeather::new(client, config.weather_base_url.clone());

    let aggregator = Arc::new(Aggregator::new(
        Arc::new(geocoder),
        Arc::new(places),
        Arc::new(weather),
    ));

    nearcast::web::run(&config, aggregator).await
}
