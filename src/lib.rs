//! `nearcast` - weather and nearby-city lookup service
//!
//! Locates places by name, fetches their current and short-term forecast,
//! and surfaces nearby cities annotated with live weather and distance.
//! The core is the candidate pipeline in [`pipeline`]: dedupe, rank,
//! enrich. Everything around it is a thin I/O shell over three upstream
//! collaborators (geocoding, place directory, weather).

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod models;
pub mod pipeline;
pub mod places;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use aggregator::Aggregator;
pub use config::NearcastConfig;
pub use error::NearcastError;
pub use geocoding::{Geocoder, OpenMeteoGeocoder};
pub use models::{
    Coordinate, CurrentWeather, DailyForecast, EnrichedPlace, Forecast, Place, PlaceRef,
    RankedPlace, WeatherBundle,
};
pub use places::{GooglePlaces, PlaceDirectory};
pub use weather::{OpenMeteoWeather, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, NearcastError>;
