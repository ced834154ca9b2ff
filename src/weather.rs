//! Open-Meteo forecast client.

use async_trait::async_trait;
use reqwest::Client;

use crate::Result;
use crate::error::NearcastError;
use crate::models::{Coordinate, CurrentWeather, DailyForecast, Forecast};

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Live-weather capability consumed by the pipeline and orchestrator.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Current conditions plus the short-term daily forecast.
    async fn forecast(&self, coordinate: Coordinate) -> Result<Forecast>;

    /// Current conditions only; `None` when the upstream has no live
    /// reading for the coordinate.
    async fn current_weather(&self, coordinate: Coordinate) -> Result<Option<CurrentWeather>>;
}

/// Weather client backed by the Open-Meteo forecast API (no API key).
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<openmeteo::ForecastResponse> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(NearcastError::upstream(format!(
                "Open-Meteo forecast returned status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoWeather {
    async fn forecast(&self, coordinate: Coordinate) -> Result<Forecast> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&timezone=auto&current_weather=true&daily=temperature_2m_max,temperature_2m_min,precipitation_sum",
            self.base_url, coordinate.latitude, coordinate.longitude
        );
        tracing::debug!("Fetching forecast: {url}");

        let response = self.fetch(&url).await?;
        Ok(Forecast {
            timezone: response.timezone,
            current: response.current_weather.map(CurrentWeather::from),
            daily: response.daily.map(openmeteo::DailyData::into_days).unwrap_or_default(),
        })
    }

    async fn current_weather(&self, coordinate: Coordinate) -> Result<Option<CurrentWeather>> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&timezone=auto&current_weather=true",
            self.base_url, coordinate.latitude, coordinate.longitude
        );
        tracing::debug!("Fetching current weather: {url}");

        let response = self.fetch(&url).await?;
        Ok(response.current_weather.map(CurrentWeather::from))
    }
}

/// `OpenMeteo` forecast API response structures
mod openmeteo {
    use serde::Deserialize;

    use crate::models::{CurrentWeather, DailyForecast};

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub timezone: Option<String>,
        pub current_weather: Option<CurrentWeatherData>,
        pub daily: Option<DailyData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeatherData {
        pub temperature: f64,
        pub windspeed: f64,
        pub time: String,
    }

    impl From<CurrentWeatherData> for CurrentWeather {
        fn from(data: CurrentWeatherData) -> Self {
            Self {
                temperature: data.temperature,
                windspeed: data.windspeed,
                time: data.time,
            }
        }
    }

    /// Daily series come back as parallel arrays keyed by `time`.
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Option<Vec<Option<f64>>>,
        #[serde(rename = "precipitation_sum")]
        pub precipitation_sum: Option<Vec<Option<f64>>>,
    }

    impl DailyData {
        fn series_at(series: &Option<Vec<Option<f64>>>, idx: usize) -> Option<f64> {
            series.as_ref().and_then(|values| values.get(idx).copied().flatten())
        }

        /// Zip the parallel arrays into one record per day.
        pub fn into_days(self) -> Vec<DailyForecast> {
            self.time
                .iter()
                .enumerate()
                .map(|(idx, time)| DailyForecast {
                    time: time.clone(),
                    temperature_max: Self::series_at(&self.temperature_max, idx),
                    temperature_min: Self::series_at(&self.temperature_min, idx),
                    precipitation_sum: Self::series_at(&self.precipitation_sum, idx),
                })
                .collect()
        }
    }
}
