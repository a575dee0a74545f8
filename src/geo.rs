// SPDX-License-Identifier: MIT

//! Coordinate types and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers (Haversine).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A coordinate pair with a human-readable place name (e.g. a home location).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

impl NamedLocation {
    pub fn coords(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Great-circle distance between two points in kilometers, via the
/// Haversine formula. Symmetric; zero for identical points; NaN inputs
/// propagate NaN.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
