//! Great-circle distance and the coordinate predicates used by the
//! candidate pipeline.

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::Coordinate;

/// Two coordinates closer than this (per axis, in degrees) are treated as
/// the same location when filtering against the origin. Roughly 1.1 km at
/// the equator.
const ORIGIN_ADJACENCY_DEG: f64 = 0.01;

/// Great-circle distance in kilometers between two coordinates (haversine,
/// Earth radius 6371 km). Symmetric, zero for identical inputs.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let from = HaversineLocation {
        latitude: a.latitude,
        longitude: a.longitude,
    };
    let to = HaversineLocation {
        latitude: b.latitude,
        longitude: b.longitude,
    };
    distance(from, to, Units::Kilometers)
}

/// Coarse same-location test against the origin: both absolute differences
/// below 0.01°. This is intentionally not a metric distance — it narrows
/// toward the poles and does not wrap at the antimeridian — and is kept
/// distinct from [`distance_km`].
#[must_use]
pub fn is_origin_adjacent(candidate: Coordinate, origin: Coordinate) -> bool {
    (candidate.latitude - origin.latitude).abs() < ORIGIN_ADJACENCY_DEG
        && (candidate.longitude - origin.longitude).abs() < ORIGIN_ADJACENCY_DEG
}

/// Dedup key: coordinate rounded to 2 decimal places. Candidates sharing a
/// key collapse to the first occurrence.
#[must_use]
pub fn dedup_key(coordinate: Coordinate) -> String {
    format!("{:.2},{:.2}", coordinate.latitude, coordinate.longitude)
}
