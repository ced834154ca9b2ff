//! The candidate pipeline: dedupe raw provider results, rank them by
//! great-circle distance under a budget, and fan out live-weather
//! enrichment over the survivors.
//!
//! Stages are pure over their inputs and run strictly in sequence; only
//! enrichment performs I/O.

use std::collections::HashSet;

use futures::future;
use tracing::warn;

use crate::geo;
use crate::models::{Coordinate, EnrichedPlace, Place, RankedPlace};
use crate::weather::WeatherSource;

/// Collapse near-identical candidates and drop entries matching the origin.
///
/// Single forward pass, first occurrence wins: a candidate is dropped when
/// its 2-decimal dedup key was already seen or when it sits within 0.01°
/// of the origin on both axes. Relative order of survivors is preserved.
#[must_use]
pub fn dedupe(candidates: Vec<Place>, origin: Coordinate) -> Vec<Place> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| {
            if geo::is_origin_adjacent(candidate.coordinate, origin) {
                return false;
            }
            seen.insert(geo::dedup_key(candidate.coordinate))
        })
        .collect()
}

/// Rank candidates by ascending distance from `origin`.
///
/// Drops entries beyond `max_distance_km` when a cap is given, sorts the
/// remainder with a stable sort (ties keep the provider's relevance
/// order), and truncates to `limit`. Output distances form a
/// non-decreasing sequence.
#[must_use]
pub fn rank(
    candidates: Vec<Place>,
    origin: Coordinate,
    max_distance_km: Option<f64>,
    limit: usize,
) -> Vec<RankedPlace> {
    let mut ranked: Vec<RankedPlace> = candidates
        .into_iter()
        .map(|place| {
            let distance_km = geo::distance_km(origin, place.coordinate);
            RankedPlace { place, distance_km }
        })
        .filter(|entry| max_distance_km.is_none_or(|max| entry.distance_km <= max))
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(limit);
    ranked
}

/// Attach a live weather snapshot to every ranked place.
///
/// One concurrent lookup per place; results are merged back by positional
/// index, so completion order never reorders the output. The batch is
/// all-or-nothing: if any single lookup fails the whole result collapses
/// to an empty list rather than a partially-enriched one.
pub async fn enrich(places: Vec<RankedPlace>, weather: &dyn WeatherSource) -> Vec<EnrichedPlace> {
    if places.is_empty() {
        return Vec::new();
    }

    let lookups = places
        .iter()
        .map(|entry| weather.current_weather(entry.place.coordinate));

    match future::try_join_all(lookups).await {
        Ok(snapshots) => places
            .into_iter()
            .zip(snapshots)
            .map(|(place, current)| EnrichedPlace { place, current })
            .collect(),
        Err(e) => {
            warn!("Neighbor weather enrichment failed, dropping batch: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NearcastError;
    use crate::models::{CurrentWeather, Forecast};
    use async_trait::async_trait;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn place(name: &str, lat: f64, lon: f64) -> Place {
        Place::new(name, "South Korea", coord(lat, lon))
    }

    #[test]
    fn test_dedupe_drops_origin_and_near_duplicates() {
        let origin = coord(37.5665, 126.978);
        let candidates = vec![
            place("Seoul", 37.5665, 126.978),
            place("Seoul-adjacent", 37.5700, 126.9800),
            place("Busan", 35.1796, 129.0756),
            place("Busan-duplicate", 35.1797, 129.0757),
        ];

        let survivors = dedupe(candidates, origin);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].name, "Busan");
    }

    #[test]
    fn test_dedupe_preserves_order_of_survivors() {
        let origin = coord(0.0, 0.0);
        let candidates = vec![
            place("C", 10.0, 10.0),
            place("A", 20.0, 20.0),
            place("B", 30.0, 30.0),
        ];

        let survivors = dedupe(candidates, origin);
        let names: Vec<&str> = survivors.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_rank_distances_are_non_decreasing() {
        let origin = coord(37.5665, 126.978);
        let candidates = vec![
            place("Busan", 35.1796, 129.0756),
            place("Incheon", 37.4563, 126.7052),
            place("Jeju", 33.4996, 126.5312),
            place("Daejeon", 36.3504, 127.3845),
        ];

        let ranked = rank(candidates, origin, None, 10);
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km <= pair[1].distance_km);
        }
        assert_eq!(ranked[0].place.name, "Incheon");
    }

    #[test]
    fn test_rank_applies_distance_cap() {
        let origin = coord(37.5665, 126.978);
        let candidates = vec![
            place("Tokyo", 35.6762, 139.6503),
            place("Busan", 35.1796, 129.0756),
            place("Singapore", 1.3521, 103.8198),
        ];

        let ranked = rank(candidates, origin, Some(800.0), 10);
        assert!(ranked.iter().all(|r| r.distance_km <= 800.0));
        assert!(ranked.iter().any(|r| r.place.name == "Busan"));
        assert!(!ranked.iter().any(|r| r.place.name == "Singapore"));
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let origin = coord(0.0, 0.0);
        let candidates = (1..=8)
            .map(|i| place(&format!("p{i}"), f64::from(i), 0.0))
            .collect();

        let ranked = rank(candidates, origin, None, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].place.name, "p1");
    }

    #[test]
    fn test_rank_ties_keep_upstream_order() {
        let origin = coord(0.0, 0.0);
        // Same distance, opposite sides of the origin.
        let candidates = vec![place("east", 0.0, 1.0), place("west", 0.0, -1.0)];

        let ranked = rank(candidates, origin, None, 10);
        assert_eq!(ranked[0].place.name, "east");
        assert_eq!(ranked[1].place.name, "west");
    }

    /// Weather stub that fails for one configured latitude.
    struct StubWeather {
        fail_latitude: Option<f64>,
    }

    #[async_trait]
    impl WeatherSource for StubWeather {
        async fn forecast(&self, _coordinate: Coordinate) -> crate::Result<Forecast> {
            unreachable!("enrichment only issues current-weather lookups")
        }

        async fn current_weather(
            &self,
            coordinate: Coordinate,
        ) -> crate::Result<Option<CurrentWeather>> {
            if self.fail_latitude == Some(coordinate.latitude) {
                return Err(NearcastError::upstream("weather lookup failed"));
            }
            Ok(Some(CurrentWeather {
                temperature: coordinate.latitude,
                windspeed: 10.0,
                time: "2026-01-01T00:00".to_string(),
            }))
        }
    }

    fn ranked(name: &str, lat: f64) -> RankedPlace {
        RankedPlace {
            place: place(name, lat, 0.0),
            distance_km: lat,
        }
    }

    #[tokio::test]
    async fn test_enrich_merges_by_position() {
        let weather = StubWeather {
            fail_latitude: None,
        };
        let input = vec![ranked("a", 10.0), ranked("b", 20.0), ranked("c", 30.0)];

        let enriched = enrich(input, &weather).await;
        assert_eq!(enriched.len(), 3);
        // Snapshot temperature encodes the latitude, proving each place got
        // its own lookup result back.
        for entry in &enriched {
            assert_eq!(
                entry.current.as_ref().unwrap().temperature,
                entry.place.place.coordinate.latitude
            );
        }
        let names: Vec<&str> = enriched
            .iter()
            .map(|e| e.place.place.name.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_enrich_is_all_or_nothing() {
        // One failing lookup out of three erases the whole batch. This is
        // the documented contract, not N-1 partial successes.
        let weather = StubWeather {
            fail_latitude: Some(20.0),
        };
        let input = vec![ranked("a", 10.0), ranked("b", 20.0), ranked("c", 30.0)];

        let enriched = enrich(input, &weather).await;
        assert!(enriched.is_empty());
    }

    #[tokio::test]
    async fn test_enrich_empty_input() {
        let weather = StubWeather {
            fail_latitude: None,
        };
        assert!(enrich(Vec::new(), &weather).await.is_empty());
    }
}
