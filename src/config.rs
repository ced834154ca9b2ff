//! Service configuration, read once from the process environment at
//! startup and injected into the collaborator constructors. Nothing else
//! in the crate reads environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STATIC_DIR: &str = "public";

/// Runtime configuration for the service.
#[derive(Debug, Clone)]
pub struct NearcastConfig {
    /// Port the HTTP server binds to
    pub port: u16,
    /// Google Places API key; optional, place-directory lookups degrade
    /// without it
    pub google_maps_api_key: Option<String>,
    /// Deadline applied to every upstream call
    pub http_timeout: Duration,
    /// Directory served for non-API routes
    pub static_dir: String,
    /// Open-Meteo geocoding base URL
    pub geocoding_base_url: String,
    /// Open-Meteo forecast base URL
    pub weather_base_url: String,
    /// Google Places base URL
    pub places_base_url: String,
}

impl Default for NearcastConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            google_maps_api_key: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            geocoding_base_url: crate::geocoding::OPEN_METEO_GEOCODING_BASE_URL.to_string(),
            weather_base_url: crate::weather::OPEN_METEO_BASE_URL.to_string(),
            places_base_url: crate::places::GOOGLE_PLACES_BASE_URL.to_string(),
        }
    }
}

impl NearcastConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(port) = env::var("PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }

        if let Ok(timeout) = env::var("HTTP_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .with_context(|| format!("Invalid HTTP_TIMEOUT_SECS value: {timeout}"))?;
            config.http_timeout = Duration::from_secs(secs);
        }

        config.google_maps_api_key = env::var("GOOGLE_MAPS_API_KEY").ok().filter(|k| !k.is_empty());

        if let Ok(dir) = env::var("STATIC_DIR") {
            config.static_dir = dir;
        }

        Ok(config)
    }
}
