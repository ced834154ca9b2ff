//! Integration tests for the provider clients using wiremock HTTP mocks.

use nearcast::geocoding::{Geocoder, OpenMeteoGeocoder};
use nearcast::models::{Coordinate, PlaceRef};
use nearcast::places::{GooglePlaces, PlaceDirectory};
use nearcast::weather::{OpenMeteoWeather, WeatherSource};
use nearcast::NearcastError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).expect("test coordinate should be valid")
}

#[tokio::test]
async fn geocoder_parses_search_results() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "results": [
            {
                "name": "Busan",
                "latitude": 35.1796,
                "longitude": 129.0756,
                "country": "South Korea",
                "timezone": "Asia/Seoul",
                "population": 3_678_555
            },
            {
                "name": "Busan-myeon",
                "latitude": 36.9,
                "longitude": 127.4
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Busan"))
        .and(query_param("count", "5"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::new(reqwest::Client::new(), server.uri());
    let places = geocoder
        .search_by_name("Busan", 5, "en")
        .await
        .expect("should parse results");

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].name, "Busan");
    assert_eq!(places[0].country, "South Korea");
    assert_eq!(places[0].timezone.as_deref(), Some("Asia/Seoul"));
    assert_eq!(places[0].population, Some(3_678_555));
    // Records without a country default to "Unknown".
    assert_eq!(places[1].country, "Unknown");
}

#[tokio::test]
async fn geocoder_treats_missing_results_as_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.5
        })))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::new(reqwest::Client::new(), server.uri());
    let places = geocoder.search_by_name("Xyzzy", 5, "en").await.unwrap();
    assert!(places.is_empty());
}

#[tokio::test]
async fn geocoder_surfaces_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let geocoder = OpenMeteoGeocoder::new(reqwest::Client::new(), server.uri());
    let err = geocoder.search_by_name("Busan", 5, "en").await.unwrap_err();
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn geocoder_reverse_lookup_is_synthetic() {
    // No server: the reverse lookup never issues a request.
    let geocoder = OpenMeteoGeocoder::new(reqwest::Client::new(), "http://127.0.0.1:9");
    let places = geocoder
        .reverse_lookup(coord(46.8182, 8.2275), 1, "en")
        .await
        .unwrap();

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "46.8182, 8.2275");
    assert_eq!(places[0].country, "Unknown");
}

fn test_directory(base_url: &str) -> GooglePlaces {
    GooglePlaces::new(reqwest::Client::new(), base_url, Some("test-key".to_string()))
}

#[tokio::test]
async fn nearby_search_returns_refs() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "results": [
            { "place_id": "p1", "name": "Seongnam" },
            { "place_id": "p2", "name": "Incheon" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("radius", "50000"))
        .and(query_param("type", "locality"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let directory = test_directory(&server.uri());
    let refs = directory
        .nearby_search(coord(37.5665, 126.978), 50_000, "locality")
        .await
        .unwrap();

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].id, "p1");
}

#[tokio::test]
async fn nearby_search_zero_results_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let directory = test_directory(&server.uri());
    let refs = directory
        .nearby_search(coord(0.0, 0.0), 50_000, "locality")
        .await
        .unwrap();
    assert!(refs.is_empty());
}

#[tokio::test]
async fn nearby_search_error_status_is_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        })))
        .mount(&server)
        .await;

    let directory = test_directory(&server.uri());
    let err = directory
        .nearby_search(coord(0.0, 0.0), 50_000, "locality")
        .await
        .unwrap_err();
    assert!(matches!(err, NearcastError::Upstream { .. }));
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let directory = GooglePlaces::new(reqwest::Client::new(), "http://127.0.0.1:9", None);
    let err = directory
        .nearby_search(coord(0.0, 0.0), 50_000, "locality")
        .await
        .unwrap_err();
    assert!(matches!(err, NearcastError::Config { .. }));
}

#[tokio::test]
async fn details_resolves_country_and_kinds() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "OK",
        "result": {
            "name": "Seongnam-si",
            "geometry": { "location": { "lat": 37.42, "lng": 127.1265 } },
            "address_components": [
                { "long_name": "Gyeonggi-do", "short_name": "Gyeonggi-do",
                  "types": ["administrative_area_level_1", "political"] },
                { "long_name": "South Korea", "short_name": "KR",
                  "types": ["country", "political"] }
            ],
            "types": ["locality", "political"]
        }
    });

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "p1"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let directory = test_directory(&server.uri());
    let place = directory
        .details(&PlaceRef {
            id: "p1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(place.name, "Seongnam-si");
    assert_eq!(place.country, "South Korea");
    assert!(place.is_locality());
    assert_eq!(place.coordinate.latitude, 37.42);
}

#[tokio::test]
async fn details_error_status_is_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "NOT_FOUND"
        })))
        .mount(&server)
        .await;

    let directory = test_directory(&server.uri());
    let err = directory
        .details(&PlaceRef {
            id: "gone".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, NearcastError::Upstream { .. }));
}

#[tokio::test]
async fn forecast_parses_current_and_daily() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "timezone": "Asia/Seoul",
        "current_weather": {
            "temperature": 27.3,
            "windspeed": 11.2,
            "time": "2026-08-26T09:00"
        },
        "daily": {
            "time": ["2026-08-26", "2026-08-27"],
            "temperature_2m_max": [29.1, 27.8],
            "temperature_2m_min": [22.0, 21.4],
            "precipitation_sum": [0.0, 4.2]
        }
    });

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("timezone", "auto"))
        .and(query_param("current_weather", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let weather = OpenMeteoWeather::new(reqwest::Client::new(), server.uri());
    let forecast = weather.forecast(coord(37.5665, 126.978)).await.unwrap();

    assert_eq!(forecast.timezone.as_deref(), Some("Asia/Seoul"));
    let current = forecast.current.expect("current weather present");
    assert_eq!(current.temperature, 27.3);
    assert_eq!(current.time, "2026-08-26T09:00");
    assert_eq!(forecast.daily.len(), 2);
    assert_eq!(forecast.daily[1].precipitation_sum, Some(4.2));
}

#[tokio::test]
async fn forecast_without_live_reading_yields_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timezone": "UTC"
        })))
        .mount(&server)
        .await;

    let weather = OpenMeteoWeather::new(reqwest::Client::new(), server.uri());
    let forecast = weather.forecast(coord(0.0, 0.0)).await.unwrap();
    assert!(forecast.current.is_none());
    assert!(forecast.daily.is_empty());

    let current = weather.current_weather(coord(0.0, 0.0)).await.unwrap();
    assert!(current.is_none());
}
