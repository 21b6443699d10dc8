// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geodesic distance between GPS fixes.
//!
//! All distances use the WGS-84 ellipsoidal geodesic (Karney's algorithm via
//! the `geo` crate), not a spherical approximation: run totals are compared
//! against reference fixtures at full float precision, and haversine drifts
//! by several hundred meters over city-scale legs.

use geo::{Distance, Geodesic, Point};

/// Great-circle (geodesic) distance in meters between two
/// (latitude, longitude) pairs, in degrees.
pub fn distance_meters(from: (f64, f64), to: (f64, f64)) -> f64 {
    // geo points are (x, y) = (longitude, latitude)
    let a = Point::new(from.1, from.0);
    let b = Point::new(to.1, to.0);
    Geodesic.distance(a, b)
}

/// Geodesic distance in kilometers.
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    distance_meters(from, to) / 1000.0
}

/// Round to two decimal places (centimeter precision for meter values).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Latitude is valid in [-90, 90], inclusive.
pub fn in_latitude_range(latitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude)
}

/// Longitude is valid in [-180, 180], inclusive.
pub fn in_longitude_range(longitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude)
}
